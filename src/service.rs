//! Service-level orchestration consumed by an external transport layer.
//!
//! The service wires algorithm resolution, key generation, the device
//! aggregate, and the repository together. It adds no invariants of its own:
//! errors from the layers below propagate unchanged, translated at this edge
//! into [`ServiceError`] — the stable user-facing vocabulary — without
//! losing the distinction between bad input and backend failure.

use crate::crypto::{generator_for, signer_for, CryptoError};
use crate::device::{DeviceError, SignTransaction, SignatureDevice};
use crate::storage::{SignatureDeviceRepository, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ServiceError {
    // bad input
    #[error("invalid algorithm: {0}")]
    InvalidAlgorithm(String),
    #[error("invalid device id: {0}")]
    InvalidDeviceId(String),
    #[error("device already exists: {0}")]
    DuplicateId(String),
    #[error("device not found: {0}")]
    NotFound(String),
    // backend failure
    #[error("key generation failed: {0}")]
    KeyGenerationFailed(String),
    #[error("signing failed: {0}")]
    SigningFailed(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(id) => Self::DuplicateId(id),
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Signing(e) => Self::SigningFailed(e.to_string()),
        }
    }
}

pub struct SignatureDeviceService {
    repository: Arc<dyn SignatureDeviceRepository>,
}

impl SignatureDeviceService {
    pub fn new(repository: Arc<dyn SignatureDeviceRepository>) -> Self {
        Self { repository }
    }

    /// Create and persist a signing device.
    ///
    /// `algorithm` is resolved against the supported set before any key
    /// material is generated; an unknown name is a user error
    /// ([`ServiceError::InvalidAlgorithm`]), distinct from a key-generation
    /// backend failure.
    pub fn create_device(
        &self,
        id: &str,
        algorithm: &str,
        label: Option<String>,
    ) -> Result<SignatureDevice, ServiceError> {
        let algorithm = algorithm
            .parse()
            .map_err(|e: CryptoError| ServiceError::InvalidAlgorithm(e.to_string()))?;

        let keys = generator_for(algorithm)
            .generate()
            .map_err(|e| ServiceError::KeyGenerationFailed(e.to_string()))?;

        let device = SignatureDevice::new(id, label, algorithm, keys.public, keys.private)
            .map_err(|e: DeviceError| ServiceError::InvalidDeviceId(e.to_string()))?;

        self.repository.add_device(device.clone())?;
        info!(
            device_id = id,
            %algorithm,
            key = %device.public_key().fingerprint(),
            "signature device created"
        );
        Ok(device)
    }

    pub fn device(&self, id: &str) -> Result<SignatureDevice, ServiceError> {
        Ok(self.repository.device_by_id(id)?)
    }

    pub fn list_devices(&self) -> Vec<SignatureDevice> {
        self.repository.list_devices()
    }

    /// Produce the next chain link for `device_id` over `data`.
    ///
    /// The whole read-sign-advance sequence runs inside the repository's
    /// per-device critical section, so concurrent calls for the same device
    /// serialize and each one observes the previous call's signature.
    pub fn sign_data(&self, device_id: &str, data: &str) -> Result<SignTransaction, ServiceError> {
        let transaction = self.repository.sign_with_device(device_id, &mut |device| {
            let signer = signer_for(device.algorithm());
            device.sign(data, signer.as_ref())
        })?;
        debug!(
            device_id,
            payload = %transaction.signed_payload,
            "sign transaction recorded"
        );
        Ok(transaction)
    }

    /// The device's transactions in insertion order.
    pub fn transactions(&self, device_id: &str) -> Result<Vec<SignTransaction>, ServiceError> {
        Ok(self.repository.sign_transactions_for_device(device_id)?)
    }
}
