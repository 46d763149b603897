// ABOUTME: Domain and chatbot database operations including the quota-checked insert
// ABOUTME: Implements the DomainStore seam the admission checker depends on

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::admission::{DomainAllowance, DomainInsert, DomainStore};
use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use crate::models::{ChatBot, Domain, DomainDetail, SubscriptionPlan};

impl Database {
    /// Create domains and chatbots tables
    pub(super) async fn migrate_domains(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS domains (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                icon TEXT NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (user_id, name)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS chatbots (
                id TEXT PRIMARY KEY,
                domain_id TEXT UNIQUE NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
                welcome_message TEXT NOT NULL,
                icon TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_domains_user_id ON domains(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all domains owned by a tenant
    pub async fn list_domains(&self, user_id: Uuid) -> AppResult<Vec<Domain>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, icon, created_at
            FROM domains
            WHERE user_id = $1
            ORDER BY created_at
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_domain).collect()
    }

    /// Fetch one domain with its chatbot, scoped to the owner
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DomainNotFound`] when the domain does not exist
    /// or belongs to another tenant.
    pub async fn get_domain(&self, user_id: Uuid, domain_id: Uuid) -> AppResult<DomainDetail> {
        let row = sqlx::query(
            r"
            SELECT d.id, d.user_id, d.name, d.icon, d.created_at,
                   c.id AS chatbot_id, c.welcome_message, c.icon AS chatbot_icon
            FROM domains d
            JOIN chatbots c ON c.domain_id = d.id
            WHERE d.id = $1 AND d.user_id = $2
            ",
        )
        .bind(domain_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::DomainNotFound)?;

        let domain = row_to_domain(&row)?;
        let chatbot_id: String = row.try_get("chatbot_id")?;
        let chatbot = ChatBot {
            id: parse_uuid(&chatbot_id)?,
            domain_id: domain.id,
            welcome_message: row.try_get("welcome_message")?,
            icon: row.try_get("chatbot_icon")?,
        };

        Ok(DomainDetail { domain, chatbot })
    }

    /// Rename a domain, keeping names unique per owner
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DomainNotFound`] for unknown or foreign domains,
    /// [`AppError::DuplicateName`] when the owner already uses the name.
    pub async fn rename_domain(
        &self,
        user_id: Uuid,
        domain_id: Uuid,
        new_name: &str,
    ) -> AppResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::invalid_input("domain name must not be empty"));
        }

        // UNIQUE (user_id, name) backstops the race between this check and
        // the update
        if self.domain_name_exists(user_id, new_name).await? {
            return Err(AppError::DuplicateName);
        }

        let result = sqlx::query("UPDATE domains SET name = $3 WHERE id = $1 AND user_id = $2")
            .bind(domain_id.to_string())
            .bind(user_id.to_string())
            .bind(new_name)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(AppError::DomainNotFound),
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::DuplicateName)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a domain and everything scoped to it (chatbot, helpdesk,
    /// filter questions, products cascade at the schema level)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DomainNotFound`] for unknown or foreign domains.
    pub async fn delete_domain(&self, user_id: Uuid, domain_id: Uuid) -> AppResult<()> {
        let done = sqlx::query("DELETE FROM domains WHERE id = $1 AND user_id = $2")
            .bind(domain_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        if done.rows_affected() == 0 {
            return Err(AppError::DomainNotFound);
        }

        tracing::info!(%user_id, %domain_id, "domain deleted");
        Ok(())
    }

    /// Update the chatbot greeting for a domain
    pub async fn update_welcome_message(&self, domain_id: Uuid, message: &str) -> AppResult<()> {
        let done = sqlx::query("UPDATE chatbots SET welcome_message = $2 WHERE domain_id = $1")
            .bind(domain_id.to_string())
            .bind(message)
            .execute(&self.pool)
            .await?;

        if done.rows_affected() == 0 {
            return Err(AppError::DomainNotFound);
        }
        Ok(())
    }

    /// Update the chatbot avatar for a domain
    pub async fn update_chatbot_icon(&self, domain_id: Uuid, icon: &str) -> AppResult<()> {
        let done = sqlx::query("UPDATE chatbots SET icon = $2 WHERE domain_id = $1")
            .bind(domain_id.to_string())
            .bind(icon)
            .execute(&self.pool)
            .await?;

        if done.rows_affected() == 0 {
            return Err(AppError::DomainNotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl DomainStore for Database {
    async fn domain_allowance(&self, external_id: &str) -> AppResult<Option<DomainAllowance>> {
        let row = sqlx::query(
            r"
            SELECT u.id AS user_id,
                   s.plan AS plan,
                   (SELECT COUNT(*) FROM domains d WHERE d.user_id = u.id) AS domain_count
            FROM users u
            LEFT JOIN subscriptions s ON s.user_id = u.id
            WHERE u.external_id = $1
            ",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user_id: String = row.try_get("user_id")?;
        let plan: Option<String> = row.try_get("plan")?;
        let domain_count: i64 = row.try_get("domain_count")?;

        Ok(Some(DomainAllowance {
            user_id: parse_uuid(&user_id)?,
            plan: plan.as_deref().and_then(SubscriptionPlan::from_db_string),
            domain_count: u32::try_from(domain_count)
                .map_err(|e| AppError::invalid_input(format!("corrupt domain count: {e}")))?,
        }))
    }

    async fn domain_name_exists(&self, user_id: Uuid, name: &str) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM domains WHERE user_id = $1 AND name = $2")
            .bind(user_id.to_string())
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn insert_domain_with_chatbot(
        &self,
        user_id: Uuid,
        name: &str,
        icon: &str,
        quota: u32,
    ) -> AppResult<DomainInsert> {
        let domain = Domain {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_owned(),
            icon: icon.to_owned(),
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        // The quota re-check lives inside the INSERT so two racing
        // admissions serialize on the write and at most `quota` rows
        // ever persist per tenant
        let inserted = sqlx::query(
            r"
            INSERT INTO domains (id, user_id, name, icon, created_at)
            SELECT $1, $2, $3, $4, $5
            WHERE (SELECT COUNT(*) FROM domains WHERE user_id = $2) < $6
            ",
        )
        .bind(domain.id.to_string())
        .bind(user_id.to_string())
        .bind(&domain.name)
        .bind(&domain.icon)
        .bind(domain.created_at)
        .bind(i64::from(quota))
        .execute(&mut *tx)
        .await;

        let inserted = match inserted {
            Ok(done) => done,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                // Concurrent creation of the same name
                tx.rollback().await?;
                return Err(AppError::DuplicateName);
            }
            Err(e) => return Err(e.into()),
        };

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(DomainInsert::QuotaReached);
        }

        sqlx::query(
            r"
            INSERT INTO chatbots (id, domain_id, welcome_message)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(domain.id.to_string())
        .bind(defaults::WELCOME_MESSAGE)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DomainInsert::Created(domain))
    }
}

pub(super) fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| AppError::invalid_input(format!("corrupt id in storage: {e}")))
}

fn row_to_domain(row: &sqlx::sqlite::SqliteRow) -> AppResult<Domain> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    Ok(Domain {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        name: row.try_get("name")?,
        icon: row.try_get("icon")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}
