// ABOUTME: Main library entry point for the Converso chatbot platform backend
// ABOUTME: Provides tenant, domain, and chatbot management gated by plan quotas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Converso

#![deny(unsafe_code)]

//! # Converso Backend
//!
//! Multi-tenant backend for an AI chatbot platform. Tenants register domains
//! (websites), each domain carries exactly one chatbot plus helpdesk Q&A,
//! chat filter questions, and a product catalog. Domain creation is gated by
//! a per-plan quota enforced by the [`admission`] module.
//!
//! ## Architecture
//!
//! - **Models**: common data structures for tenants, domains, and chatbots
//! - **Admission**: the quota + uniqueness decision gating domain creation,
//!   generic over the [`admission::DomainStore`] seam
//! - **Database**: SQLite-backed storage with in-code migrations
//! - **Config**: environment-based configuration management
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use converso::admission::try_create_domain;
//! use converso::database::Database;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Database::new("sqlite:converso.db").await?;
//!     let domain = try_create_domain(&db, "idp_user_1", "shop.com", "shop.png").await?;
//!     println!("created domain {}", domain.name);
//!     Ok(())
//! }
//! ```

/// Domain admission checker and the storage seam it depends on
pub mod admission;

/// Configuration management
pub mod config;

/// Application-wide constants
pub mod constants;

/// SQLite-backed storage for tenants, domains, and dependent resources
pub mod database;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Common data structures
pub mod models;
