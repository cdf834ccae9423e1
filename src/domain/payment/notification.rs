//! M-Pesa gateway notification shapes.
//!
//! Defines the structures for parsing the two callback payloads the gateway
//! sends. Only fields relevant to reconciliation are captured; everything
//! else is ignored (or kept in `extra` for the flat shape, whose phone field
//! name is configurable).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::canonical::{Amount, CanonicalPayment, NotificationKind};
use super::errors::ExtractionFailure;
use crate::domain::foundation::PhoneNumber;

/// Metadata item names read from a successful STK result.
const ITEM_PHONE_NUMBER: &str = "PhoneNumber";
const ITEM_AMOUNT: &str = "Amount";
const ITEM_RECEIPT_NUMBER: &str = "MpesaReceiptNumber";

/// Top-level keys of the flat C2B confirmation.
const FIELD_TRANS_ID: &str = "TransID";
const FIELD_TRANS_AMOUNT: &str = "TransAmount";

// ════════════════════════════════════════════════════════════════════════════════
// STK push (nested result) shape
// ════════════════════════════════════════════════════════════════════════════════

/// `{"Body": {"stkCallback": {...}}}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StkCallbackEnvelope {
    #[serde(rename = "Body", default)]
    pub body: Option<StkBody>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StkBody {
    #[serde(rename = "stkCallback", default)]
    pub stk_callback: Option<StkCallback>,
}

/// Result block of an STK push.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StkCallback {
    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: Option<String>,

    #[serde(rename = "CheckoutRequestID", default)]
    pub checkout_request_id: Option<String>,

    /// Numeric result code; 0 means the payment went through.
    /// Kept loose because some sandboxes send it as a string.
    #[serde(rename = "ResultCode", default)]
    pub result_code: Option<Value>,

    #[serde(rename = "ResultDesc", default)]
    pub result_desc: Option<String>,

    #[serde(rename = "CallbackMetadata", default)]
    pub callback_metadata: Option<CallbackMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CallbackMetadata {
    /// Expected to be a list of `{Name, Value}` pairs.
    #[serde(rename = "Item", default)]
    pub item: Option<Value>,
}

/// One `{Name, Value}` pair of callback metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataItem {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Value", default)]
    pub value: Option<Value>,
}

impl StkCallback {
    /// Returns true when the result code is present and equal to 0.
    pub fn is_successful(&self) -> bool {
        match &self.result_code {
            Some(Value::Number(n)) => n.as_i64() == Some(0) || n.as_f64() == Some(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok() == Some(0.0),
            _ => false,
        }
    }

    /// Parses the metadata items, skipping entries that are not pairs.
    fn metadata_items(&self) -> Option<Vec<MetadataItem>> {
        let items = self.callback_metadata.as_ref()?.item.as_ref()?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
        )
    }
}

impl StkCallbackEnvelope {
    /// Extracts canonical payment facts from an STK result.
    pub fn extract(&self) -> Result<CanonicalPayment, ExtractionFailure> {
        let callback = self
            .body
            .as_ref()
            .and_then(|body| body.stk_callback.as_ref())
            .ok_or_else(|| ExtractionFailure::NoResultData("missing Body.stkCallback".to_string()))?;

        if !callback.is_successful() {
            return Err(ExtractionFailure::NotSuccessful(
                callback
                    .result_desc
                    .clone()
                    .unwrap_or_else(|| "result code is not 0".to_string()),
            ));
        }

        let items = callback
            .metadata_items()
            .ok_or(ExtractionFailure::MissingMetadata)?;

        let mut phone_number = None;
        let mut amount = None;
        let mut transaction_id = None;

        for item in &items {
            let Some(value) = item.value.as_ref() else {
                continue;
            };
            match item.name.as_str() {
                ITEM_PHONE_NUMBER => phone_number = scalar_to_string(value),
                ITEM_AMOUNT => amount = Amount::from_json(value),
                ITEM_RECEIPT_NUMBER => transaction_id = scalar_to_string(value),
                _ => {}
            }
        }

        Ok(CanonicalPayment {
            phone_number: parse_phone(phone_number)?,
            amount,
            transaction_id,
            kind: NotificationKind::StkPush,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// C2B confirmation (flat) shape
// ════════════════════════════════════════════════════════════════════════════════

/// Flat customer-to-business confirmation payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct C2bConfirmation {
    #[serde(rename = "TransactionType", default)]
    pub transaction_type: Option<String>,

    /// Usually alphanumeric; numbers are read as their decimal text.
    #[serde(rename = "TransID", default)]
    pub trans_id: Option<Value>,

    /// Sent as a string (`"1000.00"`), tolerated as a number.
    #[serde(rename = "TransAmount", default)]
    pub trans_amount: Option<Value>,

    #[serde(rename = "BillRefNumber", default)]
    pub bill_ref_number: Option<String>,

    /// Remaining fields, including the phone field (`MSISDN` by default).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl C2bConfirmation {
    /// Extracts canonical payment facts, reading the phone number from
    /// `phone_field`.
    pub fn extract(&self, phone_field: &str) -> Result<CanonicalPayment, ExtractionFailure> {
        let trans_id = self.trans_id.as_ref().and_then(scalar_to_string);
        let amount = self.trans_amount.as_ref().and_then(Amount::from_json);

        let (Some(trans_id), Some(amount)) = (trans_id, amount) else {
            return Err(ExtractionFailure::NotSuccessful(format!(
                "{} and {} are both required",
                FIELD_TRANS_ID, FIELD_TRANS_AMOUNT
            )));
        };

        let phone = self.extra.get(phone_field).and_then(scalar_to_string);

        Ok(CanonicalPayment {
            phone_number: parse_phone(phone)?,
            amount: Some(amount),
            transaction_id: Some(trans_id),
            kind: NotificationKind::C2bConfirmation,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tagged union
// ════════════════════════════════════════════════════════════════════════════════

/// A gateway notification, tagged by shape.
#[derive(Debug, Clone)]
pub enum Notification {
    StkPush(StkCallbackEnvelope),
    C2bConfirmation(C2bConfirmation),
}

impl Notification {
    /// Classifies a raw JSON payload into one of the known shapes.
    ///
    /// Payloads with a top-level `Body` are STK results; payloads carrying
    /// any of `TransID`, `TransAmount` or the phone field are C2B
    /// confirmations. Anything else has no result data.
    pub fn classify(value: Value, phone_field: &str) -> Result<Self, ExtractionFailure> {
        let Some(object) = value.as_object() else {
            return Err(ExtractionFailure::NoResultData(
                "payload is not a JSON object".to_string(),
            ));
        };

        if object.contains_key("Body") {
            return serde_json::from_value(value)
                .map(Notification::StkPush)
                .map_err(|e| ExtractionFailure::NoResultData(format!("malformed STK result: {}", e)));
        }

        let is_flat = [FIELD_TRANS_ID, FIELD_TRANS_AMOUNT, phone_field]
            .iter()
            .any(|key| object.contains_key(*key));
        if is_flat {
            return serde_json::from_value(value)
                .map(Notification::C2bConfirmation)
                .map_err(|e| {
                    ExtractionFailure::NoResultData(format!("malformed C2B confirmation: {}", e))
                });
        }

        Err(ExtractionFailure::NoResultData(
            "unrecognised notification shape".to_string(),
        ))
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::StkPush(_) => NotificationKind::StkPush,
            Notification::C2bConfirmation(_) => NotificationKind::C2bConfirmation,
        }
    }
}

/// Renders a JSON string or number as a trimmed, non-empty string.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_phone(raw: Option<String>) -> Result<PhoneNumber, ExtractionFailure> {
    raw.and_then(|s| PhoneNumber::new(s).ok())
        .ok_or(ExtractionFailure::MissingPhone)
}
