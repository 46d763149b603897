// ABOUTME: Helpdesk Q&A and chat filter question database operations
// ABOUTME: Both resources are scoped to a domain and cascade with it

use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{FilterQuestion, HelpDeskQuestion};

impl Database {
    /// Create helpdesk and filter question tables
    pub(super) async fn migrate_helpdesk(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS helpdesk_questions (
                id TEXT PRIMARY KEY,
                domain_id TEXT NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
                question TEXT NOT NULL,
                answer TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS filter_questions (
                id TEXT PRIMARY KEY,
                domain_id TEXT NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
                question TEXT NOT NULL,
                answer TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_helpdesk_domain ON helpdesk_questions(domain_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_filter_questions_domain ON filter_questions(domain_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Add a helpdesk question/answer pair to a domain
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DomainNotFound`] when the domain does not exist.
    pub async fn create_helpdesk_question(
        &self,
        domain_id: Uuid,
        question: &str,
        answer: &str,
    ) -> AppResult<HelpDeskQuestion> {
        let entry = HelpDeskQuestion {
            id: Uuid::new_v4(),
            domain_id,
            question: question.to_owned(),
            answer: answer.to_owned(),
        };

        let result = sqlx::query(
            r"
            INSERT INTO helpdesk_questions (id, domain_id, question, answer)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(entry.id.to_string())
        .bind(domain_id.to_string())
        .bind(&entry.question)
        .bind(&entry.answer)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(entry),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(AppError::DomainNotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All helpdesk questions for a domain
    pub async fn list_helpdesk_questions(
        &self,
        domain_id: Uuid,
    ) -> AppResult<Vec<HelpDeskQuestion>> {
        let rows = sqlx::query(
            "SELECT id, question, answer FROM helpdesk_questions WHERE domain_id = $1",
        )
        .bind(domain_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                Ok(HelpDeskQuestion {
                    id: super::domains::parse_uuid(&id)?,
                    domain_id,
                    question: row.try_get("question")?,
                    answer: row.try_get("answer")?,
                })
            })
            .collect()
    }

    /// Add a qualifying filter question to a domain's chatbot flow
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DomainNotFound`] when the domain does not exist.
    pub async fn create_filter_question(
        &self,
        domain_id: Uuid,
        question: &str,
    ) -> AppResult<FilterQuestion> {
        let entry = FilterQuestion {
            id: Uuid::new_v4(),
            domain_id,
            question: question.to_owned(),
            answer: None,
        };

        let result = sqlx::query(
            "INSERT INTO filter_questions (id, domain_id, question) VALUES ($1, $2, $3)",
        )
        .bind(entry.id.to_string())
        .bind(domain_id.to_string())
        .bind(&entry.question)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(entry),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(AppError::DomainNotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All filter questions for a domain, alphabetized for stable display
    pub async fn list_filter_questions(&self, domain_id: Uuid) -> AppResult<Vec<FilterQuestion>> {
        let rows = sqlx::query(
            r"
            SELECT id, question, answer
            FROM filter_questions
            WHERE domain_id = $1
            ORDER BY question ASC
            ",
        )
        .bind(domain_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                Ok(FilterQuestion {
                    id: super::domains::parse_uuid(&id)?,
                    domain_id,
                    question: row.try_get("question")?,
                    answer: row.try_get("answer")?,
                })
            })
            .collect()
    }
}
