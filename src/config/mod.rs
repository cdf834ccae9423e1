//! Application configuration module
//!
//! Configuration is read from environment variables using the `config` and
//! `dotenvy` crates. Variables carry the `MPESA_SUBS` prefix and nested values
//! are separated by double underscores. The conventional `PORT` variable is
//! honoured as an override for `server.port`.
//!
//! # Example
//!
//! ```no_run
//! use mpesa_subscriptions::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod error;
mod server;
mod store;
mod subscription;

pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use store::{StoreConfig, WriteMode};
pub use subscription::{MpesaConfig, SubscriptionConfig};

use serde::Deserialize;

use crate::application::MAX_STORE_CALLS;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads successfully.
/// Whether the result is usable is decided by [`AppConfig::validate()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, timeouts)
    #[serde(default)]
    pub server: ServerConfig,

    /// Record store configuration (PostgREST endpoint, key, write mode)
    #[serde(default)]
    pub store: StoreConfig,

    /// Subscription extension policy
    #[serde(default)]
    pub subscription: SubscriptionConfig,

    /// Gateway payload options
    #[serde(default)]
    pub mpesa: MpesaConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `MPESA_SUBS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MPESA_SUBS__STORE__URL=...` -> `store.url = ...`
    /// - `PORT=8080` -> `server.port = 8080` (takes precedence)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MPESA_SUBS")
                    .separator("__"),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid or the
    /// worst-case store time of one notification (every call hitting the
    /// store timeout, plus a second for the acknowledgement) does not fit
    /// inside the request timeout.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.store.validate(self.is_production())?;
        self.subscription.validate()?;
        self.mpesa.validate()?;

        let worst_case = self.store.timeout_secs.saturating_mul(MAX_STORE_CALLS) + 1;
        if worst_case >= self.server.request_timeout_secs {
            return Err(ValidationError::StoreTimeoutExceedsRequestTimeout);
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
