//! Subscription status as stored in the record store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription status.
///
/// Reconciliation only ever writes `Active`. Other values written by
/// other systems are preserved as-is when read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Paid and within the expiry window.
    Active,

    /// Any status this service does not manage.
    #[serde(untagged)]
    Other(String),
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Other(value) => value,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
