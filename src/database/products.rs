// ABOUTME: Product catalog database operations
// ABOUTME: Products are presented by a domain's chatbot and cascade with the domain

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::domains::parse_uuid;
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Product;

impl Database {
    /// Create the products table
    pub(super) async fn migrate_products(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                domain_id TEXT NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                image TEXT NOT NULL,
                price_cents INTEGER NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_domain ON products(domain_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Add a product to a domain's catalog
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for negative prices and
    /// [`AppError::DomainNotFound`] when the domain does not exist.
    pub async fn create_product(
        &self,
        domain_id: Uuid,
        name: &str,
        image: &str,
        price_cents: i64,
    ) -> AppResult<Product> {
        if price_cents < 0 {
            return Err(AppError::invalid_input("product price must not be negative"));
        }

        let product = Product {
            id: Uuid::new_v4(),
            domain_id,
            name: name.to_owned(),
            image: image.to_owned(),
            price_cents,
            created_at: Utc::now(),
        };

        let result = sqlx::query(
            r"
            INSERT INTO products (id, domain_id, name, image, price_cents, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(product.id.to_string())
        .bind(domain_id.to_string())
        .bind(&product.name)
        .bind(&product.image)
        .bind(product.price_cents)
        .bind(product.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(product),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(AppError::DomainNotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All products in a domain's catalog, newest last
    pub async fn list_products(&self, domain_id: Uuid) -> AppResult<Vec<Product>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, image, price_cents, created_at
            FROM products
            WHERE domain_id = $1
            ORDER BY created_at
            ",
        )
        .bind(domain_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                Ok(Product {
                    id: parse_uuid(&id)?,
                    domain_id,
                    name: row.try_get("name")?,
                    image: row.try_get("image")?,
                    price_cents: row.try_get("price_cents")?,
                    created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
                })
            })
            .collect()
    }
}
