// ABOUTME: Shared helpers for integration tests
// ABOUTME: Provides a file-backed scratch database and tenant fixtures

#![allow(dead_code)]

use converso::database::Database;
use converso::models::{SubscriptionPlan, User};
use tempfile::TempDir;

/// A migrated scratch database; the `TempDir` keeps the file alive
pub async fn test_database() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite:{}", dir.path().join("test.db").display());
    let db = Database::new(&url).await.expect("open test database");
    (dir, db)
}

/// Register a tenant, optionally with a subscription plan
pub async fn test_user(db: &Database, external_id: &str, plan: Option<SubscriptionPlan>) -> User {
    let user = User::new(
        external_id.to_owned(),
        "Test Tenant".to_owned(),
        format!("{external_id}@example.com"),
    );
    db.create_user(&user).await.expect("create user");
    if let Some(plan) = plan {
        db.upsert_subscription(user.id, plan)
            .await
            .expect("set plan");
    }
    user
}
