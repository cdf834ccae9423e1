//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid listen address")]
    InvalidListenAddress,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid record store URL format")]
    InvalidStoreUrl,

    #[error("Record store URL must use HTTPS in production")]
    StoreUrlMustBeHttps,

    #[error("Invalid record store timeout")]
    InvalidStoreTimeout,

    #[error("Record store timeout times the store calls per notification must fit the request timeout")]
    StoreTimeoutExceedsRequestTimeout,

    #[error("Subscription extension must be at least one day")]
    InvalidExtensionDays,

    #[error("Subscription must allow at least one device")]
    InvalidMaxDevices,

    #[error("C2B phone field name cannot be empty")]
    EmptyPhoneField,
}
