// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Unified Error Handling
//!
//! Typed error taxonomy for the Converso backend. Every operation surfaces
//! one of these variants; raw storage errors never escape this boundary.
//! The caller (UI or API layer) translates variants into user-facing
//! messages and HTTP-equivalent status codes via [`AppError::http_status`]
//! and [`AppError::user_message`].

use thiserror::Error;

/// Unified error type for the application
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    /// The external tenant id did not resolve to a known user
    #[error("tenant not found")]
    TenantNotFound,

    /// The domain id did not resolve, or it belongs to another tenant
    #[error("domain not found")]
    DomainNotFound,

    /// A domain with this name already exists for the same tenant
    #[error("domain name already in use by this tenant")]
    DuplicateName,

    /// Creating another domain would exceed the plan's quota
    #[error("domain quota exceeded for the current plan")]
    QuotaExceeded,

    /// A record with this identifier already exists
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// The provided input is invalid
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The underlying store failed or was unavailable
    #[error("storage operation failed")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// A resource with this identifier already exists
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::AlreadyExists(resource.into())
    }

    /// Wrap an underlying storage failure
    pub fn persistence(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Box::new(source))
    }

    /// Get the HTTP-equivalent status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::TenantNotFound | Self::DomainNotFound => 404,
            Self::DuplicateName | Self::AlreadyExists(_) => 409,
            Self::QuotaExceeded => 429,
            Self::InvalidInput(_) => 400,
            Self::Persistence(_) => 500,
        }
    }

    /// Get a user-friendly message for this error
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::TenantNotFound => "We could not find your account".into(),
            Self::DomainNotFound => "This domain does not exist".into(),
            Self::DuplicateName => "A domain with this name already exists".into(),
            Self::QuotaExceeded => {
                "You've reached the maximum number of domains, upgrade your plan".into()
            }
            Self::AlreadyExists(resource) => format!("This {resource} already exists"),
            Self::InvalidInput(message) => message.clone(),
            Self::Persistence(_) => "Oops something went wrong, try again later".into(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::Persistence(Box::new(error))
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(AppError::TenantNotFound.http_status(), 404);
        assert_eq!(AppError::DuplicateName.http_status(), 409);
        assert_eq!(AppError::QuotaExceeded.http_status(), 429);
        assert_eq!(AppError::invalid_input("bad").http_status(), 400);
        assert_eq!(
            AppError::persistence(std::io::Error::other("down")).http_status(),
            500
        );
    }

    #[test]
    fn test_quota_message_mentions_upgrade() {
        assert!(AppError::QuotaExceeded.user_message().contains("upgrade"));
    }

    #[test]
    fn test_persistence_preserves_source() {
        let error = AppError::persistence(std::io::Error::other("connection refused"));
        let source = std::error::Error::source(&error).expect("source attached");
        assert!(source.to_string().contains("connection refused"));
    }
}
