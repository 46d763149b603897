// ABOUTME: Configuration module for the Converso backend
// ABOUTME: Environment-based settings for database and logging

//! Configuration management

/// Environment-based configuration
pub mod environment;

pub use environment::{Environment, LogLevel, ServerConfig};
