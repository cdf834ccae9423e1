//! HTTP handlers for gateway endpoints.
//!
//! Bodies are taken as raw bytes so malformed JSON still reaches the
//! application layer and still gets acknowledged. Processing runs on its
//! own task under a deadline; the acknowledgement is sent when it finishes
//! or when the deadline passes, whichever comes first.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Json, State};

use crate::application::handlers::subscription::{
    ProcessNotificationCommand, ProcessNotificationHandler, ProcessNotificationResult,
    ReconcileSubscriptionHandler,
};
use crate::domain::payment::CallbackNormalizer;
use crate::domain::subscription::ExtensionPolicy;
use crate::ports::SubscriptionStore;

use super::dto::{Acknowledgement, HealthResponse, TestResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Default upper bound on notification processing before acknowledging.
pub const DEFAULT_PROCESSING_DEADLINE: Duration = Duration::from_secs(25);

/// Shared state for gateway endpoints.
#[derive(Clone)]
pub struct MpesaAppState {
    pub store: Arc<dyn SubscriptionStore>,
    pub normalizer: Arc<CallbackNormalizer>,
    pub policy: ExtensionPolicy,
    pub processing_deadline: Duration,
}

impl MpesaAppState {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        normalizer: CallbackNormalizer,
        policy: ExtensionPolicy,
    ) -> Self {
        Self {
            store,
            normalizer: Arc::new(normalizer),
            policy,
            processing_deadline: DEFAULT_PROCESSING_DEADLINE,
        }
    }

    pub fn with_processing_deadline(mut self, deadline: Duration) -> Self {
        self.processing_deadline = deadline;
        self
    }

    pub fn reconcile_handler(&self) -> ReconcileSubscriptionHandler {
        ReconcileSubscriptionHandler::new(self.store.clone(), self.policy)
    }

    pub fn process_notification_handler(&self) -> ProcessNotificationHandler {
        ProcessNotificationHandler::new(
            self.normalizer.clone(),
            Arc::new(self.reconcile_handler()),
        )
    }

    async fn process(&self, endpoint: &'static str, body: Bytes) -> ProcessNotificationResult {
        let handler = self.process_notification_handler();
        let result = handler
            .handle(ProcessNotificationCommand {
                payload: body.to_vec(),
            })
            .await;

        match &result {
            ProcessNotificationResult::Reconciled { path, .. } => {
                tracing::debug!(endpoint, path = path.as_str(), "Notification acknowledged");
            }
            ProcessNotificationResult::ReconcileFailed { error, .. } => {
                tracing::debug!(endpoint, error = %error, "Notification acknowledged despite store failure");
            }
            ProcessNotificationResult::Ignored { reason } => {
                tracing::debug!(endpoint, reason = reason.reason_code(), "Notification acknowledged");
            }
        }
        result
    }

    /// Runs `process` on a spawned task and waits at most the processing
    /// deadline. A write still in flight at the deadline keeps running.
    async fn process_within_deadline(&self, endpoint: &'static str, body: Bytes) {
        let state = self.clone();
        let task = tokio::spawn(async move { state.process(endpoint, body).await });

        match tokio::time::timeout(self.processing_deadline, task).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::error!(endpoint, error = %e, "Notification processing task failed");
            }
            Err(_) => {
                tracing::warn!(
                    endpoint,
                    deadline_ms = self.processing_deadline.as_millis() as u64,
                    "Notification processing exceeded deadline, acknowledging anyway"
                );
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Gateway Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /mpesa-callback - STK push result
pub async fn stk_callback(
    State(state): State<MpesaAppState>,
    body: Bytes,
) -> Json<Acknowledgement> {
    state.process_within_deadline("stk_callback", body).await;
    Json(Acknowledgement::stk_success())
}

/// POST /mpesa/c2b/confirmation - Paybill/till payment confirmation
pub async fn c2b_confirmation(
    State(state): State<MpesaAppState>,
    body: Bytes,
) -> Json<Acknowledgement> {
    state.process_within_deadline("c2b_confirmation", body).await;
    Json(Acknowledgement::c2b_success())
}

/// POST /mpesa/c2b/validation - accept every payment attempt
pub async fn c2b_validation(body: Bytes) -> Json<Acknowledgement> {
    tracing::debug!(bytes = body.len(), "C2B validation accepted");
    Json(Acknowledgement::c2b_accepted())
}

// ════════════════════════════════════════════════════════════════════════════════
// Probes
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// GET /test
pub async fn test_endpoint() -> Json<TestResponse> {
    Json(TestResponse::working())
}
