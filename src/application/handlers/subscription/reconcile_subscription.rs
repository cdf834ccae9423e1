//! ReconcileSubscriptionHandler - Applies a payment to subscription state.
//!
//! Write policy, per call:
//! 1. Compute the full record (`now + extension`, fresh device id)
//! 2. Native upsert if the store supports it, otherwise
//! 3. Targeted update; on not-found/conflict fall back to insert
//!
//! At most two store calls per notification. An insert that conflicts
//! means a concurrent delivery already created the record; that call is
//! reported as failed and gateway redelivery does the rest. Every write
//! overwrites all fields, so duplicates converge on exactly one record
//! whose fields all come from the same write.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{PhoneNumber, Timestamp};
use crate::domain::subscription::{ExtensionPolicy, SubscriptionRecord};
use crate::ports::{StoreError, SubscriptionStore, UpdateResult};

/// Upper bound on store calls made by one reconciliation.
pub const MAX_STORE_CALLS: u64 = 2;

/// Command to reconcile the subscription for a phone number.
#[derive(Debug, Clone)]
pub struct ReconcileSubscriptionCommand {
    pub phone_number: PhoneNumber,
}

/// Which write made the record land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePath {
    /// Single atomic upsert.
    Upserted,
    /// Targeted update of an existing record.
    Updated,
    /// Fallback insert of a new record.
    Inserted,
}

impl WritePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            WritePath::Upserted => "upserted",
            WritePath::Updated => "updated",
            WritePath::Inserted => "inserted",
        }
    }
}

/// Terminal reconciliation failures. Logged, never propagated to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// Primary and fallback writes were both rejected.
    #[error("Reconcile write failed: {0}")]
    WriteFailure(StoreError),

    /// The record store could not be reached.
    #[error("Record store transport failure: {0}")]
    Transport(StoreError),
}

impl From<StoreError> for ReconcileError {
    fn from(err: StoreError) -> Self {
        if err.is_transport() {
            ReconcileError::Transport(err)
        } else {
            ReconcileError::WriteFailure(err)
        }
    }
}

/// Result of a reconciliation.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// True when one of the writes landed.
    pub success: bool,
    /// The record this call attempted to write.
    pub record: SubscriptionRecord,
    /// How the write landed, or why it did not.
    pub result: Result<WritePath, ReconcileError>,
}

/// Handler for reconciling subscription state after a payment.
///
/// Stateless: holds only the store handle and the policy, so a single
/// instance can serve concurrent notifications.
pub struct ReconcileSubscriptionHandler {
    store: Arc<dyn SubscriptionStore>,
    policy: ExtensionPolicy,
}

impl ReconcileSubscriptionHandler {
    pub fn new(store: Arc<dyn SubscriptionStore>, policy: ExtensionPolicy) -> Self {
        Self { store, policy }
    }

    pub async fn handle(&self, cmd: ReconcileSubscriptionCommand) -> ReconcileOutcome {
        let record = self.policy.apply(cmd.phone_number, Timestamp::now());

        let result = self.write(&record).await;
        match &result {
            Ok(path) => tracing::info!(
                phone_number = %record.phone_number,
                path = path.as_str(),
                expiry = %record.subscription_expiry.to_store_string(),
                "Subscription reconciled"
            ),
            Err(err) => tracing::error!(
                phone_number = %record.phone_number,
                error = %err,
                "Subscription reconciliation failed"
            ),
        }

        ReconcileOutcome {
            success: result.is_ok(),
            record,
            result,
        }
    }

    async fn write(&self, record: &SubscriptionRecord) -> Result<WritePath, ReconcileError> {
        if self.store.supports_native_upsert() {
            self.store.upsert(record).await?;
            return Ok(WritePath::Upserted);
        }

        match self.store.update_by_phone(record).await {
            Ok(UpdateResult::Updated) => return Ok(WritePath::Updated),
            Ok(UpdateResult::NotFound) => {}
            Err(err) if err.is_fallback_trigger() => {
                tracing::debug!(
                    phone_number = %record.phone_number,
                    error = %err,
                    "Targeted update rejected, falling back to insert"
                );
            }
            Err(err) => return Err(err.into()),
        }

        self.store.insert(record).await?;
        Ok(WritePath::Inserted)
    }
}
