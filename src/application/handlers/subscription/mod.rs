//! Subscription handlers.
//!
//! ## Commands
//! - Reconciling subscription state for a paying phone number
//! - Processing raw gateway notifications (normalize, then reconcile)

mod process_notification;
mod reconcile_subscription;

pub use process_notification::{
    ProcessNotificationCommand, ProcessNotificationHandler, ProcessNotificationResult,
};
pub use reconcile_subscription::{
    ReconcileError, ReconcileOutcome, ReconcileSubscriptionCommand, ReconcileSubscriptionHandler,
    WritePath, MAX_STORE_CALLS,
};
