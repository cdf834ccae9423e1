//! In-Memory Subscription Store Adapter
//!
//! Keeps subscription records in a map keyed by phone number.
//! Useful for testing and local development without a record store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::PhoneNumber;
use crate::domain::subscription::SubscriptionRecord;
use crate::ports::{StoreError, SubscriptionStore, UpdateResult};

/// In-memory storage for subscription records.
///
/// The map key enforces one record per phone number, mirroring the unique
/// constraint of the real store.
#[derive(Debug, Clone)]
pub struct InMemorySubscriptionStore {
    records: Arc<RwLock<HashMap<PhoneNumber, SubscriptionRecord>>>,
    native_upsert: bool,
    writes: Arc<AtomicUsize>,
}

impl InMemorySubscriptionStore {
    /// Create a store exposing only update and insert.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            native_upsert: false,
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a store that also advertises atomic upsert.
    pub fn with_native_upsert() -> Self {
        Self {
            native_upsert: true,
            ..Self::new()
        }
    }

    /// Number of stored records
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Number of write calls received (update, insert and upsert)
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for InMemorySubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn update_by_phone(&self, record: &SubscriptionRecord) -> Result<UpdateResult, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.write().await;
        match records.get_mut(&record.phone_number) {
            Some(existing) => {
                *existing = record.clone();
                Ok(UpdateResult::Updated)
            }
            None => Ok(UpdateResult::NotFound),
        }
    }

    async fn insert(&self, record: &SubscriptionRecord) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.write().await;
        if records.contains_key(&record.phone_number) {
            return Err(StoreError::Conflict);
        }
        records.insert(record.phone_number.clone(), record.clone());
        Ok(())
    }

    fn supports_native_upsert(&self) -> bool {
        self.native_upsert
    }

    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), StoreError> {
        if !self.native_upsert {
            return Err(StoreError::Unsupported("upsert"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.write().await;
        records.insert(record.phone_number.clone(), record.clone());
        Ok(())
    }

    async fn find_by_phone(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        Ok(self.records.read().await.get(phone_number).cloned())
    }
}
