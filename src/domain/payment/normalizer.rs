//! Callback normalizer - turns raw gateway payloads into canonical payments.
//!
//! Pure: no I/O, no logging. Callers decide what to do with failures.

use serde_json::Value;

use super::canonical::CanonicalPayment;
use super::errors::ExtractionFailure;
use super::notification::Notification;

/// Default top-level field carrying the payer's phone number in C2B payloads.
pub const DEFAULT_C2B_PHONE_FIELD: &str = "MSISDN";

/// Normalizes gateway notifications without requiring the caller to know
/// which shape it received.
#[derive(Debug, Clone)]
pub struct CallbackNormalizer {
    c2b_phone_field: String,
}

impl CallbackNormalizer {
    /// Creates a normalizer reading C2B phone numbers from `c2b_phone_field`.
    pub fn new(c2b_phone_field: impl Into<String>) -> Self {
        Self {
            c2b_phone_field: c2b_phone_field.into(),
        }
    }

    pub fn c2b_phone_field(&self) -> &str {
        &self.c2b_phone_field
    }

    /// Classifies a raw payload into a [`Notification`].
    pub fn classify(&self, raw: Value) -> Result<Notification, ExtractionFailure> {
        Notification::classify(raw, &self.c2b_phone_field)
    }

    /// Extracts the canonical payment from an already classified notification.
    pub fn normalize(&self, notification: &Notification) -> Result<CanonicalPayment, ExtractionFailure> {
        match notification {
            Notification::StkPush(envelope) => envelope.extract(),
            Notification::C2bConfirmation(confirmation) => {
                confirmation.extract(&self.c2b_phone_field)
            }
        }
    }

    /// Classifies and normalizes in one step.
    pub fn normalize_value(&self, raw: Value) -> Result<CanonicalPayment, ExtractionFailure> {
        let notification = self.classify(raw)?;
        self.normalize(&notification)
    }
}

impl Default for CallbackNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_C2B_PHONE_FIELD)
    }
}
