//! ProcessNotificationHandler - Gateway notification to subscription state.
//!
//! Normalizes the raw payload and, when a payment can be extracted,
//! reconciles the subscription. Never fails: the caller acknowledges the
//! gateway no matter what this returns.

use std::sync::Arc;

use crate::domain::foundation::PhoneNumber;
use crate::domain::payment::{CallbackNormalizer, ExtractionFailure, NotificationKind};

use super::reconcile_subscription::{
    ReconcileError, ReconcileSubscriptionCommand, ReconcileSubscriptionHandler, WritePath,
};

/// Command to process one inbound notification.
#[derive(Debug, Clone)]
pub struct ProcessNotificationCommand {
    /// Raw request body.
    pub payload: Vec<u8>,
}

/// Result of notification processing.
#[derive(Debug, Clone)]
pub enum ProcessNotificationResult {
    /// Payment extracted and subscription written.
    Reconciled {
        phone_number: PhoneNumber,
        transaction_id: Option<String>,
        kind: NotificationKind,
        path: WritePath,
    },
    /// Payment extracted but the store write failed.
    ReconcileFailed {
        phone_number: PhoneNumber,
        transaction_id: Option<String>,
        error: ReconcileError,
    },
    /// No payment could be extracted; no state change.
    Ignored { reason: ExtractionFailure },
}

/// Handler composing the normalizer and the reconciler.
pub struct ProcessNotificationHandler {
    normalizer: Arc<CallbackNormalizer>,
    reconciler: Arc<ReconcileSubscriptionHandler>,
}

impl ProcessNotificationHandler {
    pub fn new(
        normalizer: Arc<CallbackNormalizer>,
        reconciler: Arc<ReconcileSubscriptionHandler>,
    ) -> Self {
        Self {
            normalizer,
            reconciler,
        }
    }

    pub async fn handle(&self, cmd: ProcessNotificationCommand) -> ProcessNotificationResult {
        let raw: serde_json::Value = match serde_json::from_slice(&cmd.payload) {
            Ok(value) => value,
            Err(e) => {
                let reason = ExtractionFailure::NoResultData(format!("invalid JSON: {}", e));
                tracing::warn!(reason = reason.reason_code(), error = %reason, "Notification ignored");
                return ProcessNotificationResult::Ignored { reason };
            }
        };

        tracing::debug!(payload = %raw, "Notification received");

        let payment = match self.normalizer.normalize_value(raw) {
            Ok(payment) => payment,
            Err(reason) => {
                tracing::warn!(reason = reason.reason_code(), error = %reason, "Notification ignored");
                return ProcessNotificationResult::Ignored { reason };
            }
        };

        tracing::info!(
            phone_number = %payment.phone_number,
            amount = ?payment.amount.map(|a| a.to_string()),
            transaction_id = ?payment.transaction_id,
            kind = payment.kind.as_str(),
            "Payment received"
        );

        let outcome = self
            .reconciler
            .handle(ReconcileSubscriptionCommand {
                phone_number: payment.phone_number.clone(),
            })
            .await;

        match outcome.result {
            Ok(path) => ProcessNotificationResult::Reconciled {
                phone_number: payment.phone_number,
                transaction_id: payment.transaction_id,
                kind: payment.kind,
                path,
            },
            Err(error) => ProcessNotificationResult::ReconcileFailed {
                phone_number: payment.phone_number,
                transaction_id: payment.transaction_id,
                error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySubscriptionStore;
    use crate::domain::subscription::{ExtensionPolicy, SubscriptionRecord};
    use crate::ports::{StoreError, SubscriptionStore, UpdateResult};
    use async_trait::async_trait;
    use serde_json::json;

    /// Store whose every call fails at the transport level.
    struct UnreachableStore;

    #[async_trait]
    impl SubscriptionStore for UnreachableStore {
        async fn update_by_phone(
            &self,
            _record: &SubscriptionRecord,
        ) -> Result<UpdateResult, StoreError> {
            Err(StoreError::Transport("connection refused".to_string()))
        }

        async fn insert(&self, _record: &SubscriptionRecord) -> Result<(), StoreError> {
            Err(StoreError::Transport("connection refused".to_string()))
        }

        async fn find_by_phone(
            &self,
            _phone_number: &PhoneNumber,
        ) -> Result<Option<SubscriptionRecord>, StoreError> {
            Err(StoreError::Transport("connection refused".to_string()))
        }
    }

    fn handler(store: Arc<dyn SubscriptionStore>) -> ProcessNotificationHandler {
        ProcessNotificationHandler::new(
            Arc::new(CallbackNormalizer::default()),
            Arc::new(ReconcileSubscriptionHandler::new(
                store,
                ExtensionPolicy::default(),
            )),
        )
    }

    fn command(payload: serde_json::Value) -> ProcessNotificationCommand {
        ProcessNotificationCommand {
            payload: serde_json::to_vec(&payload).unwrap(),
        }
    }

    #[tokio::test]
    async fn stk_payment_activates_subscription() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let payload = json!({"Body": {"stkCallback": {"ResultCode": 0, "CallbackMetadata": {"Item": [
            {"Name": "PhoneNumber", "Value": "254712345678"},
            {"Name": "Amount", "Value": 50}
        ]}}}});

        let result = handler(store.clone()).handle(command(payload)).await;

        assert!(matches!(
            result,
            ProcessNotificationResult::Reconciled {
                kind: NotificationKind::StkPush,
                path: WritePath::Inserted,
                ..
            }
        ));
        let phone = PhoneNumber::new("254712345678").unwrap();
        let record = store.find_by_phone(&phone).await.unwrap().unwrap();
        assert!(record.subscription_status.is_active());
    }

    #[tokio::test]
    async fn c2b_payment_activates_subscription() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let payload = json!({"TransID": "ABC123", "MSISDN": "254700111222", "TransAmount": "1000"});

        let result = handler(store.clone()).handle(command(payload)).await;

        match result {
            ProcessNotificationResult::Reconciled {
                phone_number,
                transaction_id,
                kind,
                ..
            } => {
                assert_eq!(phone_number.as_str(), "254700111222");
                assert_eq!(transaction_id.as_deref(), Some("ABC123"));
                assert_eq!(kind, NotificationKind::C2bConfirmation);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn missing_phone_never_reaches_the_store() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let payload = json!({"Body": {"stkCallback": {"ResultCode": 0, "CallbackMetadata": {"Item": [
            {"Name": "Amount", "Value": 50}
        ]}}}});

        let result = handler(store.clone()).handle(command(payload)).await;

        assert!(matches!(
            result,
            ProcessNotificationResult::Ignored {
                reason: ExtractionFailure::MissingPhone
            }
        ));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn invalid_json_is_ignored() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let cmd = ProcessNotificationCommand {
            payload: b"{not json".to_vec(),
        };

        let result = handler(store.clone()).handle(cmd).await;

        match result {
            ProcessNotificationResult::Ignored { reason } => {
                assert_eq!(reason.reason_code(), "no_result_data")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn failed_payment_is_ignored() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let payload = json!({"Body": {"stkCallback": {"ResultCode": 1032, "ResultDesc": "Request cancelled by user"}}});

        let result = handler(store.clone()).handle(command(payload)).await;

        assert!(matches!(
            result,
            ProcessNotificationResult::Ignored {
                reason: ExtractionFailure::NotSuccessful(_)
            }
        ));
        assert_eq!(store.record_count().await, 0);
    }

    #[tokio::test]
    async fn store_outage_is_reported_not_raised() {
        let payload = json!({"TransID": "ABC123", "MSISDN": "254700111222", "TransAmount": "1000"});

        let result = handler(Arc::new(UnreachableStore)).handle(command(payload)).await;

        assert!(matches!(
            result,
            ProcessNotificationResult::ReconcileFailed {
                error: ReconcileError::Transport(_),
                ..
            }
        ));
    }
}
