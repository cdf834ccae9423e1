//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `SubscriptionStore` - Remote subscription record store

mod subscription_store;

pub use subscription_store::{StoreError, SubscriptionStore, UpdateResult};
