//! HTTP DTOs for gateway endpoints.
//!
//! Field names follow the gateway's PascalCase convention.

use serde::Serialize;

use crate::domain::foundation::Timestamp;

// ════════════════════════════════════════════════════════════════════════════════
// Acknowledgements
// ════════════════════════════════════════════════════════════════════════════════

/// `ResultCode` as the gateway expects it per endpoint.
///
/// STK callbacks are acknowledged with a number, C2B with a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResultCode {
    Numeric(i32),
    Text(String),
}

/// Response body returned to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Acknowledgement {
    pub result_code: ResultCode,
    pub result_desc: String,
}

impl Acknowledgement {
    /// `{"ResultCode":0,"ResultDesc":"Success"}`
    pub fn stk_success() -> Self {
        Self {
            result_code: ResultCode::Numeric(0),
            result_desc: "Success".to_string(),
        }
    }

    /// `{"ResultCode":"0","ResultDesc":"Success"}`
    pub fn c2b_success() -> Self {
        Self {
            result_code: ResultCode::Text("0".to_string()),
            result_desc: "Success".to_string(),
        }
    }

    /// `{"ResultCode":"0","ResultDesc":"Accepted"}`
    pub fn c2b_accepted() -> Self {
        Self {
            result_code: ResultCode::Text("0".to_string()),
            result_desc: "Accepted".to_string(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Probes
// ════════════════════════════════════════════════════════════════════════════════

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Current server time (RFC 3339).
    pub time: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK",
            time: Timestamp::now().to_rfc3339(),
        }
    }
}

/// Response for `GET /test`.
#[derive(Debug, Clone, Serialize)]
pub struct TestResponse {
    pub message: &'static str,
    pub timestamp: String,
}

impl TestResponse {
    pub fn working() -> Self {
        Self {
            message: "M-Pesa backend is working",
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }
}
