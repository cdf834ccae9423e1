//! Storage Adapters
//!
//! Implementations of the SubscriptionStore port that live in-process.
//!
//! ## Available Adapters
//!
//! - **InMemorySubscriptionStore** - Stores records in memory (testing/development)
//!
//! The production store is the PostgREST adapter in `adapters::postgrest`.

mod in_memory_subscription_store;

pub use in_memory_subscription_store::InMemorySubscriptionStore;
