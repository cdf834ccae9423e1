//! Subscription domain module.
//!
//! # Module Structure
//!
//! - `record` - SubscriptionRecord entity (one per phone number)
//! - `status` - SubscriptionStatus values
//! - `policy` - ExtensionPolicy applied on payment

mod policy;
mod record;
mod status;

pub use policy::{ExtensionPolicy, DEFAULT_EXTENSION_DAYS, DEFAULT_MAX_DEVICES};
pub use record::SubscriptionRecord;
pub use status::SubscriptionStatus;
