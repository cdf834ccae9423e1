//! M-Pesa Subscriptions - payment callbacks to subscription state
//!
//! Receives M-Pesa gateway notifications (STK push callbacks and C2B
//! confirmations), normalizes them into a canonical payment and activates
//! the payer's subscription in a PostgREST record store. Every gateway
//! request is acknowledged, whatever the outcome.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
