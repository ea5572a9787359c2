//! Process-local repository backed by a map of per-device records.
//!
//! Layout: the device map sits under an `RwLock` taken only for membership
//! operations (insert, lookup, list); each record sits behind its own
//! `Arc<Mutex<_>>`, which is the per-device critical section. A signing call
//! clones the record's `Arc` under the map read lock, drops the map lock,
//! then locks the record — so signing on one device never blocks signing on
//! another.

use crate::crypto::CryptoError;
use crate::device::{SignTransaction, SignatureDevice};
use crate::storage::{SignatureDeviceRepository, StoreError};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

struct DeviceRecord {
    device: SignatureDevice,
    transactions: Vec<SignTransaction>,
}

#[derive(Default)]
pub struct InMemoryDeviceStore {
    devices: RwLock<HashMap<String, Arc<Mutex<DeviceRecord>>>>,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, id: &str) -> Result<Arc<Mutex<DeviceRecord>>, StoreError> {
        self.devices
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl SignatureDeviceRepository for InMemoryDeviceStore {
    fn add_device(&self, device: SignatureDevice) -> Result<(), StoreError> {
        let mut devices = self.devices.write();
        if devices.contains_key(device.id()) {
            return Err(StoreError::DuplicateId(device.id().to_string()));
        }
        debug!(device_id = device.id(), "device stored");
        devices.insert(
            device.id().to_string(),
            Arc::new(Mutex::new(DeviceRecord {
                device,
                transactions: Vec::new(),
            })),
        );
        Ok(())
    }

    fn device_by_id(&self, id: &str) -> Result<SignatureDevice, StoreError> {
        let record = self.record(id)?;
        let guard = record.lock();
        Ok(guard.device.clone())
    }

    fn list_devices(&self) -> Vec<SignatureDevice> {
        let records: Vec<_> = self.devices.read().values().cloned().collect();
        records.iter().map(|r| r.lock().device.clone()).collect()
    }

    fn sign_transactions_for_device(&self, id: &str) -> Result<Vec<SignTransaction>, StoreError> {
        let record = self.record(id)?;
        let guard = record.lock();
        Ok(guard.transactions.clone())
    }

    fn sign_with_device(
        &self,
        id: &str,
        sign: &mut dyn FnMut(&mut SignatureDevice) -> Result<SignTransaction, CryptoError>,
    ) -> Result<SignTransaction, StoreError> {
        let record = self.record(id)?;
        let mut guard = record.lock();
        let transaction = sign(&mut guard.device)?;
        guard.transactions.push(transaction.clone());
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{generator_for, signer_for, SignatureAlgorithm};
    use std::thread;

    fn device(id: &str) -> SignatureDevice {
        let keys = generator_for(SignatureAlgorithm::Ed25519).generate().unwrap();
        SignatureDevice::new(id, Some("test".into()), SignatureAlgorithm::Ed25519, keys.public, keys.private)
            .unwrap()
    }

    #[test]
    fn add_then_lookup() {
        let store = InMemoryDeviceStore::new();
        store.add_device(device("d1")).unwrap();
        let found = store.device_by_id("d1").unwrap();
        assert_eq!(found.id(), "d1");
        assert_eq!(found.counter(), 0);
    }

    #[test]
    fn duplicate_add_rejected_first_device_intact() {
        let store = InMemoryDeviceStore::new();
        let first = device("dup");
        let first_key = first.public_key().clone();
        store.add_device(first).unwrap();

        let err = store.add_device(device("dup")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(ref id) if id == "dup"));
        assert_eq!(store.device_by_id("dup").unwrap().public_key(), &first_key);
    }

    #[test]
    fn missing_device_is_not_found() {
        let store = InMemoryDeviceStore::new();
        assert!(matches!(store.device_by_id("ghost"), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.sign_transactions_for_device("ghost"),
            Err(StoreError::NotFound(_))
        ));
        let result = store.sign_with_device("ghost", &mut |_| unreachable!());
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn list_returns_all_devices() {
        let store = InMemoryDeviceStore::new();
        for id in ["a", "b", "c"] {
            store.add_device(device(id)).unwrap();
        }
        let mut ids: Vec<_> = store.list_devices().iter().map(|d| d.id().to_string()).collect();
        ids.sort();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn sign_with_device_persists_state_and_transaction_together() {
        let store = InMemoryDeviceStore::new();
        store.add_device(device("d1")).unwrap();
        let signer = signer_for(SignatureAlgorithm::Ed25519);

        let tx = store
            .sign_with_device("d1", &mut |dev| dev.sign("hello", signer.as_ref()))
            .unwrap();

        assert_eq!(store.device_by_id("d1").unwrap().counter(), 1);
        let log = store.sign_transactions_for_device("d1").unwrap();
        assert_eq!(log, vec![tx]);
    }

    #[test]
    fn failed_sign_persists_nothing() {
        let store = InMemoryDeviceStore::new();
        store.add_device(device("d1")).unwrap();

        let result = store.sign_with_device("d1", &mut |_| {
            Err(CryptoError::Signing("backend down".into()))
        });
        assert!(matches!(result, Err(StoreError::Signing(_))));
        assert_eq!(store.device_by_id("d1").unwrap().counter(), 0);
        assert!(store.sign_transactions_for_device("d1").unwrap().is_empty());
    }

    #[test]
    fn concurrent_signs_serialize_per_device() {
        let store = Arc::new(InMemoryDeviceStore::new());
        store.add_device(device("hot")).unwrap();

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let signer = signer_for(SignatureAlgorithm::Ed25519);
                    store
                        .sign_with_device("hot", &mut |dev| dev.sign("data", signer.as_ref()))
                        .unwrap();
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(store.device_by_id("hot").unwrap().counter(), 8);
        let log = store.sign_transactions_for_device("hot").unwrap();
        assert_eq!(log.len(), 8);

        // every payload starts with a distinct counter value 0..8
        let mut counters: Vec<u64> = log
            .iter()
            .map(|tx| tx.signed_payload.split('_').next().unwrap().parse().unwrap())
            .collect();
        counters.sort_unstable();
        assert_eq!(counters, (0..8).collect::<Vec<u64>>());
    }
}
