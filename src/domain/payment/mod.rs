//! Payment module - Gateway notification parsing and normalization.
//!
//! # Module Organization
//!
//! - `notification` - Gateway payload shapes and the `Notification` tagged union
//! - `canonical` - Canonical payment triple and amount value object
//! - `normalizer` - Shape-agnostic extraction entry point
//! - `errors` - Extraction failure reasons

mod canonical;
mod errors;
mod normalizer;
mod notification;

pub use canonical::{Amount, CanonicalPayment, NotificationKind};
pub use errors::ExtractionFailure;
pub use normalizer::{CallbackNormalizer, DEFAULT_C2B_PHONE_FIELD};
pub use notification::{
    C2bConfirmation, CallbackMetadata, MetadataItem, Notification, StkBody, StkCallback,
    StkCallbackEnvelope,
};
