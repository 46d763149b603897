// ABOUTME: Converso CLI - command-line tool for backend administration
// ABOUTME: Handles user creation, plan changes, and domain management
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Converso
//!
//! Usage:
//! ```bash
//! # Register a tenant
//! converso-cli user create --external-id idp_123 --name "Ada" --email ada@example.com
//!
//! # Put the tenant on the PRO plan
//! converso-cli user set-plan --external-id idp_123 --plan pro
//!
//! # Register a domain (runs the admission check)
//! converso-cli domain add --external-id idp_123 --name shop.com --icon shop.png
//!
//! # List the tenant's domains
//! converso-cli domain list --external-id idp_123
//!
//! # Remove a domain
//! converso-cli domain remove --external-id idp_123 --id <uuid>
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use converso::admission::try_create_domain;
use converso::config::environment::ServerConfig;
use converso::database::Database;
use converso::errors::AppError;
use converso::logging::{init_logging, LoggingConfig};
use converso::models::{SubscriptionPlan, User};

#[derive(Parser)]
#[command(
    name = "converso-cli",
    about = "Converso backend management CLI",
    long_about = "Command-line tool for managing Converso tenants, plans, and domains."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// User management commands
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Domain management commands
    Domain {
        #[command(subcommand)]
        action: DomainCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum UserCommand {
    /// Register a new tenant
    Create {
        /// Identity-provider id (required)
        #[arg(long)]
        external_id: String,

        /// Display name (required)
        #[arg(long)]
        name: String,

        /// Contact email (required)
        #[arg(long)]
        email: String,
    },

    /// Set or change the tenant's subscription plan
    SetPlan {
        /// Identity-provider id (required)
        #[arg(long)]
        external_id: String,

        /// One of: standard, pro, ultimate
        #[arg(long)]
        plan: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum DomainCommand {
    /// Register a domain for a tenant (quota-checked)
    Add {
        /// Identity-provider id of the owner
        #[arg(long)]
        external_id: String,

        /// Domain name, unique per tenant
        #[arg(long)]
        name: String,

        /// Icon reference
        #[arg(long, default_value = "default.png")]
        icon: String,
    },

    /// List a tenant's domains
    List {
        /// Identity-provider id of the owner
        #[arg(long)]
        external_id: String,
    },

    /// Remove a domain and everything scoped to it
    Remove {
        /// Identity-provider id of the owner
        #[arg(long)]
        external_id: String,

        /// Domain id
        #[arg(long)]
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: if cli.verbose { "debug".into() } else { "info".into() },
        ..LoggingConfig::from_env()
    };
    init_logging(&logging)?;

    let config = ServerConfig::from_env();
    let database_url = cli.database_url.unwrap_or(config.database_url);
    let db = Database::new(&database_url)
        .await
        .with_context(|| format!("failed to open database at {database_url}"))?;

    match cli.command {
        Command::User { action } => handle_user(&db, action).await,
        Command::Domain { action } => handle_domain(&db, action).await,
    }
}

async fn handle_user(db: &Database, action: UserCommand) -> Result<()> {
    match action {
        UserCommand::Create {
            external_id,
            name,
            email,
        } => {
            let user = User::new(external_id, name, email);
            db.create_user(&user).await.map_err(user_facing)?;
            println!("Created user {} ({})", user.full_name, user.id);
        }
        UserCommand::SetPlan { external_id, plan } => {
            let plan: SubscriptionPlan = plan.parse().map_err(user_facing)?;
            let user = resolve_user(db, &external_id).await?;
            db.upsert_subscription(user.id, plan)
                .await
                .map_err(user_facing)?;
            println!(
                "{} is now on the {plan} plan ({} domains allowed)",
                user.full_name,
                plan.domain_quota()
            );
        }
    }
    Ok(())
}

async fn handle_domain(db: &Database, action: DomainCommand) -> Result<()> {
    match action {
        DomainCommand::Add {
            external_id,
            name,
            icon,
        } => {
            let domain = try_create_domain(db, &external_id, &name, &icon)
                .await
                .map_err(user_facing)?;
            println!("Domain successfully added: {} ({})", domain.name, domain.id);
        }
        DomainCommand::List { external_id } => {
            let user = resolve_user(db, &external_id).await?;
            let domains = db.list_domains(user.id).await.map_err(user_facing)?;
            if domains.is_empty() {
                println!("No domains registered");
            }
            for domain in domains {
                println!("{}  {}  {}", domain.id, domain.name, domain.icon);
            }
        }
        DomainCommand::Remove { external_id, id } => {
            let user = resolve_user(db, &external_id).await?;
            db.delete_domain(user.id, id).await.map_err(user_facing)?;
            println!("Domain deleted successfully");
        }
    }
    Ok(())
}

async fn resolve_user(db: &Database, external_id: &str) -> Result<User> {
    db.get_user_by_external_id(external_id)
        .await
        .map_err(user_facing)?
        .ok_or_else(|| user_facing(AppError::TenantNotFound))
}

/// Surface the user-facing message while keeping the typed error in the chain
fn user_facing(error: AppError) -> anyhow::Error {
    let message = error.user_message();
    anyhow!(error).context(message)
}
