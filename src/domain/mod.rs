//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `payment` - Gateway notification shapes and normalization
//! - `subscription` - Subscription records and the extension policy

pub mod foundation;
pub mod payment;
pub mod subscription;
