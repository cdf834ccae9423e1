//! Wire representation of a subscription row.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PhoneNumber, Timestamp};
use crate::domain::subscription::{SubscriptionRecord, SubscriptionStatus};
use crate::ports::StoreError;

/// Row as stored in the `users` table.
///
/// Unknown columns (ids, audit timestamps) are ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRow {
    pub phone_number: String,
    pub subscription_status: String,
    /// `YYYY-MM-DDTHH:MM:SS`, UTC.
    pub subscription_expiry: String,
    #[serde(default)]
    pub current_device_id: String,
    #[serde(default = "default_max_devices")]
    pub max_devices: u32,
}

fn default_max_devices() -> u32 {
    1
}

impl From<&SubscriptionRecord> for SubscriptionRow {
    fn from(record: &SubscriptionRecord) -> Self {
        Self {
            phone_number: record.phone_number.to_string(),
            subscription_status: record.subscription_status.to_string(),
            subscription_expiry: record.subscription_expiry.to_store_string(),
            current_device_id: record.current_device_id.clone(),
            max_devices: record.max_devices,
        }
    }
}

impl TryFrom<SubscriptionRow> for SubscriptionRecord {
    type Error = StoreError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let phone_number = PhoneNumber::new(row.phone_number)
            .map_err(|e| StoreError::Transport(format!("Malformed row: {}", e)))?;
        let subscription_expiry = Timestamp::parse_store_string(&row.subscription_expiry)
            .ok_or_else(|| {
                StoreError::Transport(format!(
                    "Malformed row: bad subscription_expiry '{}'",
                    row.subscription_expiry
                ))
            })?;
        let subscription_status = match row.subscription_status.as_str() {
            "active" => SubscriptionStatus::Active,
            _ => SubscriptionStatus::Other(row.subscription_status),
        };

        Ok(Self {
            phone_number,
            subscription_status,
            subscription_expiry,
            current_device_id: row.current_device_id,
            max_devices: row.max_devices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::ExtensionPolicy;
    use serde_json::json;

    #[test]
    fn row_serializes_store_columns() {
        let record = ExtensionPolicy::default().apply(
            PhoneNumber::new("254712345678").unwrap(),
            Timestamp::parse_store_string("2024-01-01T00:00:00").unwrap(),
        );

        let value = serde_json::to_value(SubscriptionRow::from(&record)).unwrap();

        assert_eq!(value["phone_number"], "254712345678");
        assert_eq!(value["subscription_status"], "active");
        assert_eq!(value["subscription_expiry"], "2024-01-31T00:00:00");
        assert_eq!(value["current_device_id"], json!(record.current_device_id));
        assert_eq!(value["max_devices"], 1);
    }

    #[test]
    fn row_with_extra_columns_converts_to_record() {
        let row: SubscriptionRow = serde_json::from_value(json!({
            "id": 42,
            "phone_number": "254712345678",
            "subscription_status": "active",
            "subscription_expiry": "2024-01-31T00:00:00",
            "current_device_id": "from_backend",
            "max_devices": 1,
            "created_at": "2023-12-01T00:00:00+00:00"
        }))
        .unwrap();

        let record = SubscriptionRecord::try_from(row).unwrap();

        assert_eq!(record.current_device_id, "from_backend");
        assert!(record.subscription_status.is_active());
    }

    #[test]
    fn malformed_expiry_is_rejected() {
        let row = SubscriptionRow {
            phone_number: "254712345678".to_string(),
            subscription_status: "active".to_string(),
            subscription_expiry: "soon".to_string(),
            current_device_id: String::new(),
            max_devices: 1,
        };
        assert!(SubscriptionRecord::try_from(row).is_err());
    }
}
