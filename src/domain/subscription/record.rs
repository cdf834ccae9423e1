//! Subscription record entity.
//!
//! # Invariants
//!
//! - At most one record per `phone_number` (enforced by the store)
//! - Reconciliation overwrites every field; expiry is never accumulated
//! - Records are created on first payment and never deleted here

use serde::{Deserialize, Serialize};

use super::SubscriptionStatus;
use crate::domain::foundation::{DeviceId, PhoneNumber, Timestamp};

/// Persistent subscription state keyed by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Key of the record.
    pub phone_number: PhoneNumber,

    pub subscription_status: SubscriptionStatus,

    /// Absolute end of the paid window.
    pub subscription_expiry: Timestamp,

    /// Device currently allowed to use the subscription.
    /// Opaque string in the store; freshly generated on every reconciliation.
    pub current_device_id: String,

    pub max_devices: u32,
}

impl SubscriptionRecord {
    /// Builds the record written by a reconciliation.
    pub fn activated(
        phone_number: PhoneNumber,
        expiry: Timestamp,
        device_id: DeviceId,
        max_devices: u32,
    ) -> Self {
        Self {
            phone_number,
            subscription_status: SubscriptionStatus::Active,
            subscription_expiry: expiry,
            current_device_id: device_id.to_string(),
            max_devices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> PhoneNumber {
        PhoneNumber::new("254700000000").unwrap()
    }

    #[test]
    fn activated_record_is_active() {
        let now = Timestamp::now();
        let device = DeviceId::new();
        let record = SubscriptionRecord::activated(phone(), now.add_days(30), device, 1);

        assert_eq!(record.subscription_status, SubscriptionStatus::Active);
        assert_eq!(record.current_device_id, device.to_string());
        assert_eq!(record.max_devices, 1);
        assert_eq!(record.subscription_expiry, now.add_days(30));
    }

    #[test]
    fn record_serializes_status_lowercase() {
        let record = SubscriptionRecord::activated(phone(), Timestamp::now(), DeviceId::new(), 1);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["subscription_status"], "active");
        assert_eq!(value["phone_number"], "254700000000");
    }
}
