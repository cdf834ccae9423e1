//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    ProcessNotificationCommand, ProcessNotificationHandler, ProcessNotificationResult,
    ReconcileError, ReconcileOutcome, ReconcileSubscriptionCommand, ReconcileSubscriptionHandler,
    WritePath, MAX_STORE_CALLS,
};
