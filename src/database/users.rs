// ABOUTME: User and subscription database operations
// ABOUTME: Handles tenant registration and plan upgrades/downgrades

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{SubscriptionPlan, User};

impl Database {
    /// Create users and subscriptions tables
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                external_id TEXT UNIQUE NOT NULL,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Plan column is intentionally unchecked: legacy values parse
        // leniently to "no plan" instead of failing the row
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS subscriptions (
                user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                plan TEXT NOT NULL,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_external_id ON users(external_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Register a new tenant
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AlreadyExists`] when the external id is taken.
    pub async fn create_user(&self, user: &User) -> AppResult<()> {
        let result = sqlx::query(
            r"
            INSERT INTO users (id, external_id, full_name, email, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.external_id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::already_exists("user"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a tenant by its identity-provider id
    pub async fn get_user_by_external_id(&self, external_id: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, external_id, full_name, email, created_at FROM users WHERE external_id = $1",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Set or replace the tenant's subscription plan
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TenantNotFound`] when the user does not exist.
    pub async fn upsert_subscription(
        &self,
        user_id: Uuid,
        plan: SubscriptionPlan,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r"
            INSERT INTO subscriptions (user_id, plan, updated_at)
            VALUES ($1, $2, CURRENT_TIMESTAMP)
            ON CONFLICT (user_id) DO UPDATE SET
                plan = excluded.plan,
                updated_at = CURRENT_TIMESTAMP
            ",
        )
        .bind(user_id.to_string())
        .bind(plan.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(AppError::TenantNotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read the tenant's current plan, if any
    pub async fn get_subscription_plan(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<SubscriptionPlan>> {
        let row = sqlx::query("SELECT plan FROM subscriptions WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row
            .map(|r| r.try_get::<String, _>("plan"))
            .transpose()?
            .and_then(|plan| SubscriptionPlan::from_db_string(&plan)))
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> AppResult<User> {
    let id: String = row.try_get("id")?;
    Ok(User {
        id: Uuid::parse_str(&id)
            .map_err(|e| AppError::invalid_input(format!("corrupt user id in storage: {e}")))?,
        external_id: row.try_get("external_id")?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}
