//! PostgREST adapter - Remote subscription record store.
//!
//! Talks to a PostgREST (Supabase) table over HTTP. Supports both the
//! update-then-insert write mode and native `on_conflict` upserts.

mod postgrest_subscription_store;
mod row;

pub use postgrest_subscription_store::{PostgrestConfig, PostgrestSubscriptionStore};
pub use row::SubscriptionRow;
