//! Extension policy applied on every successful payment.

use super::SubscriptionRecord;
use crate::domain::foundation::{DeviceId, PhoneNumber, Timestamp};

/// Default length of a paid period.
pub const DEFAULT_EXTENSION_DAYS: u32 = 30;

/// Default number of devices per subscription.
pub const DEFAULT_MAX_DEVICES: u32 = 1;

/// Fixed-length, non-accumulating extension.
///
/// Every payment sets the expiry to `now + extension_days`, regardless of
/// the current expiry, and binds a fresh device id. Applying the policy
/// twice is therefore safe: the second application simply resets the
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionPolicy {
    extension_days: u32,
    max_devices: u32,
}

impl ExtensionPolicy {
    pub fn new(extension_days: u32, max_devices: u32) -> Self {
        Self {
            extension_days,
            max_devices,
        }
    }

    pub fn extension_days(&self) -> u32 {
        self.extension_days
    }

    pub fn max_devices(&self) -> u32 {
        self.max_devices
    }

    /// Computes the full record to write for `phone_number` as of `now`.
    pub fn apply(&self, phone_number: PhoneNumber, now: Timestamp) -> SubscriptionRecord {
        SubscriptionRecord::activated(
            phone_number,
            now.add_days(i64::from(self.extension_days)),
            DeviceId::new(),
            self.max_devices,
        )
    }
}

impl Default for ExtensionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION_DAYS, DEFAULT_MAX_DEVICES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn phone() -> PhoneNumber {
        PhoneNumber::new("254712345678").unwrap()
    }

    #[test]
    fn default_policy_is_thirty_days_one_device() {
        let policy = ExtensionPolicy::default();
        assert_eq!(policy.extension_days(), 30);
        assert_eq!(policy.max_devices(), 1);
    }

    #[test]
    fn expiry_is_relative_to_now() {
        let now = Timestamp::now();
        let record = ExtensionPolicy::default().apply(phone(), now);

        assert_eq!(record.subscription_expiry.duration_since(&now), Duration::days(30));
    }

    #[test]
    fn each_application_binds_a_new_device() {
        let now = Timestamp::now();
        let policy = ExtensionPolicy::default();

        let first = policy.apply(phone(), now);
        let second = policy.apply(phone(), now);

        assert_ne!(first.current_device_id, second.current_device_id);
        assert_eq!(first.subscription_expiry, second.subscription_expiry);
    }

    #[test]
    fn custom_policy_is_respected() {
        let now = Timestamp::now();
        let record = ExtensionPolicy::new(7, 3).apply(phone(), now);

        assert_eq!(record.subscription_expiry.duration_since(&now), Duration::days(7));
        assert_eq!(record.max_devices, 3);
    }
}
