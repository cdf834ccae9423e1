//! Extraction failures for gateway notifications.
//!
//! Every way a notification can fail to yield a canonical payment is a
//! variant here. None of them is surfaced to the gateway: the HTTP layer
//! acknowledges regardless and only logs the reason code.

use thiserror::Error;

/// Reasons a notification could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    /// Payload did not match any known gateway shape.
    #[error("No result data: {0}")]
    NoResultData(String),

    /// Gateway reported the payment as failed, or success markers are absent.
    #[error("Payment not successful: {0}")]
    NotSuccessful(String),

    /// Successful STK result without a usable metadata item list.
    #[error("Missing callback metadata")]
    MissingMetadata,

    /// No usable phone number in the payload.
    #[error("Missing phone number")]
    MissingPhone,
}

impl ExtractionFailure {
    /// Stable reason code used in logs.
    pub fn reason_code(&self) -> &'static str {
        match self {
            ExtractionFailure::NoResultData(_) => "no_result_data",
            ExtractionFailure::NotSuccessful(_) => "not_successful",
            ExtractionFailure::MissingMetadata => "missing_metadata",
            ExtractionFailure::MissingPhone => "missing_phone",
        }
    }
}
