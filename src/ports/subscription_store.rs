//! SubscriptionStore port - Interface to the remote subscription record store.
//!
//! The store is treated as a keyed row API with two primitive writes:
//! "update by phone number" and "insert new row". Stores that offer an
//! atomic insert-or-update on `phone_number` can advertise it through
//! [`SubscriptionStore::supports_native_upsert`], in which case the
//! reconciler issues a single write instead.
//!
//! ## Delivery semantics
//!
//! The gateway delivers notifications at least once, and two deliveries
//! for the same phone number can race. Implementations MUST keep at most
//! one row per phone number (unique key), so a losing insert surfaces as
//! [`StoreError::Conflict`] rather than a duplicate row.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::PhoneNumber;
use crate::domain::subscription::SubscriptionRecord;

/// Outcome of a targeted update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    /// An existing row was overwritten.
    Updated,
    /// No row exists for the phone number.
    NotFound,
}

/// Errors returned by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store rejected the write because the row does not exist.
    #[error("Record not found")]
    NotFound,

    /// The store rejected the write because the key already exists.
    #[error("Record already exists")]
    Conflict,

    /// The store answered with an unexpected status.
    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The store could not be reached, timed out, or answered garbage.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The adapter does not implement the requested operation.
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

impl StoreError {
    /// Returns true if the error means the update-else-insert fallback applies.
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(self, StoreError::NotFound | StoreError::Conflict)
    }

    /// Returns true for network-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Transport(_))
    }
}

/// Port for subscription record persistence.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Overwrite the row keyed by `record.phone_number`, if it exists.
    async fn update_by_phone(&self, record: &SubscriptionRecord) -> Result<UpdateResult, StoreError>;

    /// Create a new row.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a row for the phone number already exists
    async fn insert(&self, record: &SubscriptionRecord) -> Result<(), StoreError>;

    /// Whether [`SubscriptionStore::upsert`] is atomic and usable.
    fn supports_native_upsert(&self) -> bool {
        false
    }

    /// Atomic insert-or-update keyed on phone number.
    async fn upsert(&self, _record: &SubscriptionRecord) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("upsert"))
    }

    /// Fetch the row for a phone number.
    async fn find_by_phone(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<SubscriptionRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SubscriptionStore) {}
    }

    #[test]
    fn not_found_and_conflict_trigger_fallback() {
        assert!(StoreError::NotFound.is_fallback_trigger());
        assert!(StoreError::Conflict.is_fallback_trigger());
        assert!(!StoreError::Transport("reset".to_string()).is_fallback_trigger());
        assert!(!StoreError::Rejected {
            status: 500,
            message: "boom".to_string()
        }
        .is_fallback_trigger());
    }

    #[test]
    fn rejected_displays_status() {
        let err = StoreError::Rejected {
            status: 401,
            message: "invalid api key".to_string(),
        };
        assert_eq!(format!("{}", err), "Store rejected request (401): invalid api key");
    }
}
