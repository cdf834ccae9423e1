//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `http` - Axum endpoints receiving gateway notifications
//! - `postgrest` - PostgREST-backed subscription store (Supabase)
//! - `storage` - In-memory subscription store

pub mod http;
pub mod postgrest;
pub mod storage;

pub use http::{app_router, MpesaAppState};
pub use postgrest::{PostgrestConfig, PostgrestSubscriptionStore};
pub use storage::InMemorySubscriptionStore;
