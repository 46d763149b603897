// ABOUTME: Application-wide constants for plan names, defaults, and env vars
// ABOUTME: Single source of truth for strings shared between storage and config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Converso

//! Centralized constants to avoid magic strings across modules

/// Subscription plan names as stored in the database
pub mod plans {
    pub const STANDARD: &str = "STANDARD";
    pub const PRO: &str = "PRO";
    pub const ULTIMATE: &str = "ULTIMATE";
}

/// Default values used when nothing else is configured
pub mod defaults {
    /// Welcome message seeded into every newly created chatbot
    pub const WELCOME_MESSAGE: &str = "Hey there, have a question? Text us here";

    /// Default database location
    pub const DATABASE_URL: &str = "sqlite:converso.db";

    /// Service name for structured logging
    pub const SERVICE_NAME: &str = "converso";
}

/// Environment variable names
pub mod env_config {
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    pub const RUST_LOG: &str = "RUST_LOG";
}
