//! HTTP adapter for M-Pesa gateway endpoints.
//!
//! - `POST /mpesa-callback` - STK push result callback
//! - `POST /mpesa/c2b/confirmation` - C2B confirmation
//! - `POST /mpesa/c2b/validation` - C2B validation (always accepted)
//! - `GET /health` - Liveness probe
//! - `GET /test` - Smoke-test endpoint
//!
//! Gateway endpoints acknowledge every request with HTTP 200. The gateway
//! retries anything else, and retries of a failed write would not help.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{MpesaAppState, DEFAULT_PROCESSING_DEADLINE};
pub use routes::{mpesa_router, mpesa_routes, system_routes};
