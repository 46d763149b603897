// ABOUTME: Domain admission checker gating domain creation by plan quota
// ABOUTME: Defines the storage seam so the decision is engine-independent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Converso

//! # Domain Admission
//!
//! Given a tenant's subscription plan and current domain count, decide
//! whether a new domain may be created, and if so create it atomically with
//! its chatbot. The decision itself is a pure comparison against the plan
//! quota; the storage engine re-checks the quota inside the insert so that
//! two racing admissions can never over-commit (see
//! [`DomainStore::insert_domain_with_chatbot`]).

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{domain_quota_for, Domain, SubscriptionPlan};

/// What the admission check needs to know about a tenant, read in one call
#[derive(Debug, Clone)]
pub struct DomainAllowance {
    /// Internal user id resolved from the external identity-provider id
    pub user_id: Uuid,
    /// Current plan; `None` when the tenant has no active subscription
    pub plan: Option<SubscriptionPlan>,
    /// Number of domains the tenant currently owns
    pub domain_count: u32,
}

/// Outcome of the conditional domain insert
#[derive(Debug)]
pub enum DomainInsert {
    /// Domain and chatbot were created together
    Created(Domain),
    /// The store-side quota re-check rejected the insert
    QuotaReached,
}

/// Storage operations the admission checker depends on.
///
/// Implementations must make `insert_domain_with_chatbot` atomic and
/// conditional: the domain row and its chatbot row either both persist or
/// neither does, and the insert must re-verify `domain_count < quota` under
/// the store's own isolation. Read-then-write without that re-check is not
/// sufficient under concurrency.
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Resolve a tenant by external id and read its plan and domain count
    async fn domain_allowance(&self, external_id: &str) -> AppResult<Option<DomainAllowance>>;

    /// Whether this tenant already owns a domain with the given name
    async fn domain_name_exists(&self, user_id: Uuid, name: &str) -> AppResult<bool>;

    /// Atomically create a domain plus its chatbot, seeded with the default
    /// welcome message, if and only if the tenant still has quota headroom
    async fn insert_domain_with_chatbot(
        &self,
        user_id: Uuid,
        name: &str,
        icon: &str,
        quota: u32,
    ) -> AppResult<DomainInsert>;
}

/// Decide whether `external_id` may register `name` and, if admitted, create
/// the domain together with its chatbot.
///
/// Exactly one write happens on the success path; none otherwise.
///
/// # Errors
///
/// - [`AppError::InvalidInput`] when the name is empty
/// - [`AppError::TenantNotFound`] when the external id does not resolve
/// - [`AppError::DuplicateName`] when the tenant already owns the name
/// - [`AppError::QuotaExceeded`] when the plan allowance is used up
///   (or the tenant has no active subscription)
/// - [`AppError::Persistence`] when the underlying store fails
pub async fn try_create_domain<S>(
    store: &S,
    external_id: &str,
    name: &str,
    icon: &str,
) -> AppResult<Domain>
where
    S: DomainStore + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("domain name must not be empty"));
    }

    let allowance = store
        .domain_allowance(external_id)
        .await?
        .ok_or(AppError::TenantNotFound)?;

    if store.domain_name_exists(allowance.user_id, name).await? {
        return Err(AppError::DuplicateName);
    }

    let quota = domain_quota_for(allowance.plan);
    if allowance.domain_count >= quota {
        if allowance.plan.is_none() {
            // Same caller-visible outcome as a full plan, kept distinct in logs
            tracing::debug!(
                user_id = %allowance.user_id,
                "domain admission denied: no active subscription"
            );
        }
        return Err(AppError::QuotaExceeded);
    }

    match store
        .insert_domain_with_chatbot(allowance.user_id, name, icon, quota)
        .await?
    {
        DomainInsert::Created(domain) => {
            tracing::info!(
                user_id = %allowance.user_id,
                domain_id = %domain.id,
                domain_name = %domain.name,
                "domain admitted and created"
            );
            Ok(domain)
        }
        // A concurrent admission won the race between our read and the insert
        DomainInsert::QuotaReached => Err(AppError::QuotaExceeded),
    }
}
