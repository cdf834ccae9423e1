//! Axum router configuration for gateway endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    c2b_confirmation, c2b_validation, health, stk_callback, test_endpoint, MpesaAppState,
};

/// Gateway notification routes.
///
/// # Routes
/// - `POST /mpesa-callback` - STK push result
/// - `POST /mpesa/c2b/confirmation` - C2B confirmation
/// - `POST /mpesa/c2b/validation` - C2B validation
pub fn mpesa_routes() -> Router<MpesaAppState> {
    Router::new()
        .route("/mpesa-callback", post(stk_callback))
        .route("/mpesa/c2b/confirmation", post(c2b_confirmation))
        .route("/mpesa/c2b/validation", post(c2b_validation))
}

/// Probe routes.
///
/// # Routes
/// - `GET /health`
/// - `GET /test`
pub fn system_routes() -> Router<MpesaAppState> {
    Router::new()
        .route("/health", get(health))
        .route("/test", get(test_endpoint))
}

/// Complete gateway router, ready for `with_state`.
pub fn mpesa_router() -> Router<MpesaAppState> {
    Router::new().merge(mpesa_routes()).merge(system_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySubscriptionStore;
    use crate::domain::foundation::PhoneNumber;
    use crate::domain::payment::CallbackNormalizer;
    use crate::domain::subscription::ExtensionPolicy;
    use crate::ports::SubscriptionStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state(store: Arc<InMemorySubscriptionStore>) -> MpesaAppState {
        MpesaAppState::new(store, CallbackNormalizer::default(), ExtensionPolicy::default())
    }

    async fn post_json(router: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn router_builds_with_state() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let _: Router<()> = mpesa_router().with_state(test_state(store));
    }

    #[tokio::test]
    async fn stk_callback_activates_subscription() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let router = mpesa_router().with_state(test_state(store.clone()));
        let body = json!({
            "Body": { "stkCallback": {
                "ResultCode": 0,
                "CallbackMetadata": { "Item": [
                    { "Name": "Amount", "Value": 10 },
                    { "Name": "PhoneNumber", "Value": 254712345678u64 }
                ]}
            }}
        });

        let (status, ack) = post_json(router, "/mpesa-callback", &body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack, json!({ "ResultCode": 0, "ResultDesc": "Success" }));
        let phone = PhoneNumber::new("254712345678").unwrap();
        let record = store.find_by_phone(&phone).await.unwrap().unwrap();
        assert!(record.subscription_status.is_active());
    }

    #[tokio::test]
    async fn malformed_body_is_still_acknowledged() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let router = mpesa_router().with_state(test_state(store.clone()));

        let (status, ack) = post_json(router, "/mpesa-callback", "{not json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack["ResultCode"], 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn c2b_confirmation_uses_string_ack() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let router = mpesa_router().with_state(test_state(store.clone()));
        let body = json!({ "TransID": "RKTQDM7W6S", "TransAmount": "500.00", "MSISDN": "254700111222" });

        let (status, ack) = post_json(router, "/mpesa/c2b/confirmation", &body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack, json!({ "ResultCode": "0", "ResultDesc": "Success" }));
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn c2b_validation_accepts_without_writing() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let router = mpesa_router().with_state(test_state(store.clone()));
        let body = json!({ "TransID": "RKTQDM7W6S", "TransAmount": "500.00", "MSISDN": "254700111222" });

        let (status, ack) = post_json(router, "/mpesa/c2b/validation", &body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack, json!({ "ResultCode": "0", "ResultDesc": "Accepted" }));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let router = mpesa_router().with_state(test_state(store));

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
