//! Canonical payment facts extracted from a notification.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::PhoneNumber;

/// Payment amount as reported by the gateway. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Reads an amount from a JSON number or numeric string.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64))
                .map(Self),
            Value::String(s) => Decimal::from_str(s.trim()).ok().map(Self),
            _ => None,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which gateway flow produced a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Lipa na M-Pesa online (STK push) result callback.
    StkPush,
    /// Customer-to-business confirmation.
    C2bConfirmation,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::StkPush => "stk_push",
            NotificationKind::C2bConfirmation => "c2b_confirmation",
        }
    }
}

/// Normalized `{phoneNumber, amount, transactionId}` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPayment {
    pub phone_number: PhoneNumber,
    pub amount: Option<Amount>,
    pub transaction_id: Option<String>,
    pub kind: NotificationKind,
}
