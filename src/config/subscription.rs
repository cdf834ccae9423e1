//! Subscription policy and gateway payload configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::payment::DEFAULT_C2B_PHONE_FIELD;
use crate::domain::subscription::{ExtensionPolicy, DEFAULT_EXTENSION_DAYS, DEFAULT_MAX_DEVICES};

/// Extension applied on every successful payment
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    /// Days added to "now" on each payment (not accumulated)
    #[serde(default = "default_extension_days")]
    pub extension_days: u32,

    /// Devices allowed per subscription
    #[serde(default = "default_max_devices")]
    pub max_devices: u32,
}

impl SubscriptionConfig {
    /// Build the domain policy
    pub fn policy(&self) -> ExtensionPolicy {
        ExtensionPolicy::new(self.extension_days, self.max_devices)
    }

    /// Validate subscription configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.extension_days == 0 {
            return Err(ValidationError::InvalidExtensionDays);
        }
        if self.max_devices == 0 {
            return Err(ValidationError::InvalidMaxDevices);
        }
        Ok(())
    }
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            extension_days: default_extension_days(),
            max_devices: default_max_devices(),
        }
    }
}

fn default_extension_days() -> u32 {
    DEFAULT_EXTENSION_DAYS
}

fn default_max_devices() -> u32 {
    DEFAULT_MAX_DEVICES
}

/// Gateway payload configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MpesaConfig {
    /// Top-level field carrying the payer's phone number in C2B confirmations
    #[serde(default = "default_c2b_phone_field")]
    pub c2b_phone_field: String,
}

impl MpesaConfig {
    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.c2b_phone_field.trim().is_empty() {
            return Err(ValidationError::EmptyPhoneField);
        }
        Ok(())
    }
}

impl Default for MpesaConfig {
    fn default() -> Self {
        Self {
            c2b_phone_field: default_c2b_phone_field(),
        }
    }
}

fn default_c2b_phone_field() -> String {
    DEFAULT_C2B_PHONE_FIELD.to_string()
}
