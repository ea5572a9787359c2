//! Repository contract for devices and their transaction logs.
//!
//! The repository is the concurrency boundary: [`SignatureDeviceRepository::sign_with_device`]
//! runs the chained-signing protocol under per-device mutual exclusion and
//! commits the mutated device state together with the resulting transaction
//! as one unit. Keeping persistence behind this trait lets the core be
//! tested against the in-memory store without a real backend.

use crate::crypto::CryptoError;
use crate::device::{SignTransaction, SignatureDevice};
use thiserror::Error;

pub mod memory;

pub use memory::InMemoryDeviceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("device already exists: {0}")]
    DuplicateId(String),
    #[error("device not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Signing(#[from] CryptoError),
}

/// Durable store for devices and their append-only transaction logs.
pub trait SignatureDeviceRepository: Send + Sync {
    /// Insert a new device. The duplicate check and the insert are one
    /// critical section; two concurrent adds with the same id cannot both
    /// succeed.
    fn add_device(&self, device: SignatureDevice) -> Result<(), StoreError>;

    /// Point-in-time snapshot of a device.
    fn device_by_id(&self, id: &str) -> Result<SignatureDevice, StoreError>;

    /// Snapshots of all devices, in unspecified order.
    fn list_devices(&self) -> Vec<SignatureDevice>;

    /// The device's transactions in insertion order.
    fn sign_transactions_for_device(&self, id: &str) -> Result<Vec<SignTransaction>, StoreError>;

    /// Run `sign` with exclusive access to the device.
    ///
    /// On `Ok` the mutated device and the returned transaction are persisted
    /// atomically; on `Err` nothing is persisted. Concurrent calls for the
    /// same device serialize; calls for different devices do not block each
    /// other.
    fn sign_with_device(
        &self,
        id: &str,
        sign: &mut dyn FnMut(&mut SignatureDevice) -> Result<SignTransaction, CryptoError>,
    ) -> Result<SignTransaction, StoreError>;
}
