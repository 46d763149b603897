// ABOUTME: Common data structures for tenants, domains, chatbots, and catalogs
// ABOUTME: Includes the pure plan-to-quota mapping used by the admission check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Converso

//! Core data model shared by the storage layer and the admission checker

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::plans;
use crate::errors::AppError;

/// Subscription plan gating how many domains a tenant may register
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionPlan {
    /// Entry plan with a single domain
    Standard,
    /// Mid plan for growing accounts
    Pro,
    /// Top plan with the highest domain allowance
    Ultimate,
}

impl SubscriptionPlan {
    /// Maximum number of domains permitted on this plan
    #[must_use]
    pub const fn domain_quota(&self) -> u32 {
        match self {
            Self::Standard => 1,
            Self::Pro => 5,
            Self::Ultimate => 10,
        }
    }

    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => plans::STANDARD,
            Self::Pro => plans::PRO,
            Self::Ultimate => plans::ULTIMATE,
        }
    }

    /// Convert from a database string, treating unknown values as no plan
    #[must_use]
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            plans::STANDARD => Some(Self::Standard),
            plans::PRO => Some(Self::Pro),
            plans::ULTIMATE => Some(Self::Ultimate),
            other => {
                tracing::warn!("Unknown subscription plan '{}' in storage, treating as no plan", other);
                None
            }
        }
    }
}

/// Quota implied by an optional plan: absence of a subscription permits
/// no domains at all.
#[must_use]
pub const fn domain_quota_for(plan: Option<SubscriptionPlan>) -> u32 {
    match plan {
        Some(plan) => plan.domain_quota(),
        None => 0,
    }
}

impl Display for SubscriptionPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            plans::STANDARD => Ok(Self::Standard),
            plans::PRO => Ok(Self::Pro),
            plans::ULTIMATE => Ok(Self::Ultimate),
            _ => Err(AppError::invalid_input(format!("Invalid subscription plan: {s}"))),
        }
    }
}

/// A tenant account, identified externally by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Identity-provider id (unique); resolved by the caller, trusted here
    pub external_id: String,
    /// Display name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record
    #[must_use]
    pub fn new(external_id: String, full_name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_id,
            full_name,
            email,
            created_at: Utc::now(),
        }
    }
}

/// A registered website owned by exactly one tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    /// Unique domain identifier
    pub id: Uuid,
    /// Owning tenant
    pub user_id: Uuid,
    /// Domain name, unique per tenant (not globally)
    pub name: String,
    /// Opaque icon reference
    pub icon: String,
    /// When the domain was registered
    pub created_at: DateTime<Utc>,
}

/// The chatbot attached to a domain (exactly one per domain)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBot {
    /// Unique chatbot identifier
    pub id: Uuid,
    /// Owning domain
    pub domain_id: Uuid,
    /// Greeting shown when a visitor opens the chat window
    pub welcome_message: String,
    /// Optional chatbot avatar
    pub icon: Option<String>,
}

/// A domain together with its chatbot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainDetail {
    pub domain: Domain,
    pub chatbot: ChatBot,
}

/// A helpdesk question/answer pair shown on the domain's help page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpDeskQuestion {
    pub id: Uuid,
    pub domain_id: Uuid,
    pub question: String,
    pub answer: String,
}

/// A qualifying question the chatbot asks visitors before handoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterQuestion {
    pub id: Uuid,
    pub domain_id: Uuid,
    pub question: String,
    /// Filled in once a visitor answers; empty for the template itself
    pub answer: Option<String>,
}

/// A catalog product presented by the chatbot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub domain_id: Uuid,
    pub name: String,
    /// Opaque image reference
    pub image: String,
    /// Price in cents; integer to avoid float money
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_quota_is_pure() {
        assert_eq!(SubscriptionPlan::Standard.domain_quota(), 1);
        assert_eq!(SubscriptionPlan::Pro.domain_quota(), 5);
        assert_eq!(SubscriptionPlan::Ultimate.domain_quota(), 10);
        assert_eq!(domain_quota_for(None), 0);
        assert_eq!(domain_quota_for(Some(SubscriptionPlan::Pro)), 5);
    }

    #[test]
    fn test_plan_round_trip() {
        for plan in [
            SubscriptionPlan::Standard,
            SubscriptionPlan::Pro,
            SubscriptionPlan::Ultimate,
        ] {
            assert_eq!(SubscriptionPlan::from_db_string(plan.as_str()), Some(plan));
        }
    }

    #[test]
    fn test_unknown_plan_string_is_no_plan() {
        assert_eq!(SubscriptionPlan::from_db_string("LEGACY"), None);
        assert!("legacy".parse::<SubscriptionPlan>().is_err());
    }

    #[test]
    fn test_plan_parse_is_case_insensitive() {
        assert_eq!(
            "pro".parse::<SubscriptionPlan>().unwrap(),
            SubscriptionPlan::Pro
        );
    }
}
