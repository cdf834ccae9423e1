//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod subscription;

pub use subscription::{
    ProcessNotificationCommand, ProcessNotificationHandler, ProcessNotificationResult,
    ReconcileError, ReconcileOutcome, ReconcileSubscriptionCommand, ReconcileSubscriptionHandler,
    WritePath, MAX_STORE_CALLS,
};
