// ABOUTME: Integration tests for domain lifecycle and domain-scoped resources
// ABOUTME: Covers renames, owner-scoped deletes, cascades, and catalog scoping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Converso

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use converso::admission::try_create_domain;
use converso::errors::AppError;
use converso::models::{Domain, SubscriptionPlan};
use sqlx::Row;
use uuid::Uuid;

mod common;

async fn domain_for(
    db: &converso::database::Database,
    external_id: &str,
    name: &str,
) -> Domain {
    try_create_domain(db, external_id, name, "icon.png")
        .await
        .expect("create domain")
}

#[tokio::test]
async fn rename_succeeds_for_a_fresh_name() {
    let (_dir, db) = common::test_database().await;
    let user = common::test_user(&db, "idp_rename", Some(SubscriptionPlan::Pro)).await;
    let domain = domain_for(&db, "idp_rename", "old.com").await;

    db.rename_domain(user.id, domain.id, "new.com").await.unwrap();

    let detail = db.get_domain(user.id, domain.id).await.unwrap();
    assert_eq!(detail.domain.name, "new.com");
}

#[tokio::test]
async fn rename_rejects_a_name_the_owner_already_uses() {
    let (_dir, db) = common::test_database().await;
    let user = common::test_user(&db, "idp_rename_dup", Some(SubscriptionPlan::Pro)).await;
    domain_for(&db, "idp_rename_dup", "first.com").await;
    let second = domain_for(&db, "idp_rename_dup", "second.com").await;

    let result = db.rename_domain(user.id, second.id, "first.com").await;
    assert!(matches!(result, Err(AppError::DuplicateName)));
}

#[tokio::test]
async fn rename_is_scoped_to_the_owner() {
    let (_dir, db) = common::test_database().await;
    common::test_user(&db, "idp_owner", Some(SubscriptionPlan::Standard)).await;
    let outsider = common::test_user(&db, "idp_outsider", Some(SubscriptionPlan::Standard)).await;
    let domain = domain_for(&db, "idp_owner", "mine.com").await;

    let result = db.rename_domain(outsider.id, domain.id, "stolen.com").await;
    assert!(matches!(result, Err(AppError::DomainNotFound)));
}

#[tokio::test]
async fn delete_is_scoped_to_the_owner() {
    let (_dir, db) = common::test_database().await;
    common::test_user(&db, "idp_del_owner", Some(SubscriptionPlan::Standard)).await;
    let outsider = common::test_user(&db, "idp_del_other", Some(SubscriptionPlan::Standard)).await;
    let domain = domain_for(&db, "idp_del_owner", "keep.com").await;

    let result = db.delete_domain(outsider.id, domain.id).await;
    assert!(matches!(result, Err(AppError::DomainNotFound)));
}

#[tokio::test]
async fn delete_cascades_to_everything_scoped_to_the_domain() {
    let (_dir, db) = common::test_database().await;
    let user = common::test_user(&db, "idp_cascade", Some(SubscriptionPlan::Standard)).await;
    let domain = domain_for(&db, "idp_cascade", "doomed.com").await;

    db.create_helpdesk_question(domain.id, "What are your hours?", "24/7")
        .await
        .unwrap();
    db.create_filter_question(domain.id, "What is your budget?")
        .await
        .unwrap();
    db.create_product(domain.id, "Widget", "widget.png", 1999)
        .await
        .unwrap();

    db.delete_domain(user.id, domain.id).await.unwrap();

    for table in ["chatbots", "helpdesk_questions", "filter_questions", "products"] {
        let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {table}"))
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row.get::<i64, _>("n"), 0, "{table} not cascaded");
    }
}

#[tokio::test]
async fn welcome_message_and_icon_updates_hit_the_chatbot() {
    let (_dir, db) = common::test_database().await;
    let user = common::test_user(&db, "idp_bot", Some(SubscriptionPlan::Standard)).await;
    let domain = domain_for(&db, "idp_bot", "bot.com").await;

    db.update_welcome_message(domain.id, "Welcome to bot.com!")
        .await
        .unwrap();
    db.update_chatbot_icon(domain.id, "bot-avatar.png").await.unwrap();

    let detail = db.get_domain(user.id, domain.id).await.unwrap();
    assert_eq!(detail.chatbot.welcome_message, "Welcome to bot.com!");
    assert_eq!(detail.chatbot.icon.as_deref(), Some("bot-avatar.png"));
}

#[tokio::test]
async fn chatbot_updates_for_unknown_domains_fail() {
    let (_dir, db) = common::test_database().await;

    let result = db.update_welcome_message(Uuid::new_v4(), "hello").await;
    assert!(matches!(result, Err(AppError::DomainNotFound)));
}

#[tokio::test]
async fn helpdesk_rows_require_an_existing_domain() {
    let (_dir, db) = common::test_database().await;

    let result = db
        .create_helpdesk_question(Uuid::new_v4(), "q", "a")
        .await;
    assert!(matches!(result, Err(AppError::DomainNotFound)));
}

#[tokio::test]
async fn helpdesk_and_filter_questions_are_scoped_per_domain() {
    let (_dir, db) = common::test_database().await;
    common::test_user(&db, "idp_scoped", Some(SubscriptionPlan::Pro)).await;
    let first = domain_for(&db, "idp_scoped", "first.com").await;
    let second = domain_for(&db, "idp_scoped", "second.com").await;

    db.create_helpdesk_question(first.id, "Shipping?", "Worldwide")
        .await
        .unwrap();
    db.create_filter_question(first.id, "Zebra question").await.unwrap();
    db.create_filter_question(first.id, "Apple question").await.unwrap();

    assert_eq!(db.list_helpdesk_questions(first.id).await.unwrap().len(), 1);
    assert!(db.list_helpdesk_questions(second.id).await.unwrap().is_empty());

    // Alphabetized for stable display
    let filters = db.list_filter_questions(first.id).await.unwrap();
    assert_eq!(filters[0].question, "Apple question");
    assert_eq!(filters[1].question, "Zebra question");
    assert!(filters.iter().all(|f| f.answer.is_none()));
}

#[tokio::test]
async fn products_are_scoped_and_priced_in_cents() {
    let (_dir, db) = common::test_database().await;
    common::test_user(&db, "idp_products", Some(SubscriptionPlan::Pro)).await;
    let shop = domain_for(&db, "idp_products", "shop.com").await;
    let blog = domain_for(&db, "idp_products", "blog.com").await;

    db.create_product(shop.id, "Widget", "widget.png", 1999)
        .await
        .unwrap();
    db.create_product(shop.id, "Gadget", "gadget.png", 4900)
        .await
        .unwrap();

    let products = db.list_products(shop.id).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price_cents, 1999);
    assert!(db.list_products(blog.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn negative_prices_are_rejected() {
    let (_dir, db) = common::test_database().await;
    common::test_user(&db, "idp_neg", Some(SubscriptionPlan::Standard)).await;
    let shop = domain_for(&db, "idp_neg", "shop.com").await;

    let result = db.create_product(shop.id, "Refund", "r.png", -1).await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn subscription_upserts_replace_the_plan() {
    let (_dir, db) = common::test_database().await;
    let user = common::test_user(&db, "idp_upgrade", Some(SubscriptionPlan::Standard)).await;

    assert_eq!(
        db.get_subscription_plan(user.id).await.unwrap(),
        Some(SubscriptionPlan::Standard)
    );

    db.upsert_subscription(user.id, SubscriptionPlan::Ultimate)
        .await
        .unwrap();
    assert_eq!(
        db.get_subscription_plan(user.id).await.unwrap(),
        Some(SubscriptionPlan::Ultimate)
    );
}

#[tokio::test]
async fn subscription_for_unknown_user_is_rejected() {
    let (_dir, db) = common::test_database().await;

    let result = db
        .upsert_subscription(Uuid::new_v4(), SubscriptionPlan::Pro)
        .await;
    assert!(matches!(result, Err(AppError::TenantNotFound)));
}

#[tokio::test]
async fn duplicate_external_id_is_rejected() {
    let (_dir, db) = common::test_database().await;
    common::test_user(&db, "idp_taken", None).await;

    let clone = converso::models::User::new(
        "idp_taken".to_owned(),
        "Impostor".to_owned(),
        "other@example.com".to_owned(),
    );
    let result = db.create_user(&clone).await;
    assert!(matches!(result, Err(AppError::AlreadyExists(_))));
}
