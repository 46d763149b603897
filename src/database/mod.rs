// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Database Management
//!
//! SQLite-backed storage for the Converso backend. Handles tenants,
//! subscriptions, domains with their chatbots, and the resources scoped to
//! a domain (helpdesk questions, filter questions, products). Migrations
//! run in-code at startup with `CREATE TABLE IF NOT EXISTS`.

mod domains;
mod helpdesk;
mod products;
mod users;

use std::str::FromStr;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Pool, Sqlite, SqlitePool};

use crate::errors::AppResult;

/// Storage handle for all persistence operations
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Foreign keys drive the chatbot/helpdesk/product cascades, so they
        // must be on for every connection in the pool
        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Pooled connections must see the same in-memory database
        if database_url.contains(":memory:") {
            options = options.shared_cache(true);
        }

        let pool = SqlitePool::connect_with(options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_domains().await?;
        self.migrate_helpdesk().await?;
        self.migrate_products().await?;

        Ok(())
    }
}
