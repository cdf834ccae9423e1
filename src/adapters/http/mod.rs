//! HTTP adapters - REST endpoints and the application router.

pub mod mpesa;

pub use mpesa::{mpesa_router, MpesaAppState};

use std::time::Duration;

use axum::extract::MatchedPath;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Build the complete application with middleware applied.
///
/// Layers (outermost first): tracing, CORS. Probes also get the request
/// timeout. Gateway routes are never cut off by `TimeoutLayer`; they bound
/// their own processing slightly below the request timeout and always
/// answer with the acknowledgement.
pub fn app_router(state: MpesaAppState, server: &ServerConfig) -> Router {
    let state = state.with_processing_deadline(processing_deadline(server.request_timeout()));

    let gateway = mpesa::mpesa_routes().with_state(state.clone());
    let probes = mpesa::system_routes()
        .with_state(state)
        .layer(TimeoutLayer::new(server.request_timeout()));

    Router::new()
        .merge(gateway)
        .merge(probes)
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                let path = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str)
                    .unwrap_or_else(|| req.uri().path());
                tracing::info_span!("http_request", method = %req.method(), path = %path)
            }),
        )
}

/// Processing deadline for a given request timeout: one second of
/// headroom for writing the acknowledgement, never below half the timeout.
pub fn processing_deadline(request_timeout: Duration) -> Duration {
    request_timeout
        .saturating_sub(Duration::from_secs(1))
        .max(request_timeout / 2)
}

/// CORS policy: any origin unless a list is configured.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(methods)
        .allow_headers(Any)
}
