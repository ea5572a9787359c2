//! The signature device aggregate and the chained-signing protocol.
//!
//! # Secured payload encoding
//!
//! The byte sequence a device signs is the UTF-8 string
//!
//! ```text
//! <counter>_<data>_<base64(previous signature)>
//! ```
//!
//! with standard padded base64. For a fresh device the previous signature is
//! seeded with the raw UTF-8 bytes of the device id, so the first payload
//! embeds `base64(id)`. This encoding is a compatibility contract: verifiers
//! reconstruct it from stored transactions, and any change breaks backward
//! verification of existing chains.

use crate::crypto::{
    CryptoError, PrivateKeyBytes, PublicKeyBytes, SignatureAlgorithm, SignatureBytes, Signer,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device id must not be empty")]
    EmptyId,
}

/// A signing device: identity, key material, and chain state.
///
/// The counter and last-signature pair advance together, by exactly one
/// link, per successful [`sign`](Self::sign) call. Callers needing mutual
/// exclusion across concurrent signers get it from the repository, which
/// hands out `&mut SignatureDevice` only inside its per-device critical
/// section.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignatureDevice {
    id: String,
    label: Option<String>,
    algorithm: SignatureAlgorithm,
    public_key: PublicKeyBytes,
    private_key: PrivateKeyBytes,
    counter: u64,
    last_signature: SignatureBytes,
}

impl SignatureDevice {
    /// Build a device around freshly generated key material.
    ///
    /// The signature counter starts at 0 and the chain seed is the device
    /// id's UTF-8 bytes (see module docs).
    pub fn new(
        id: impl Into<String>,
        label: Option<String>,
        algorithm: SignatureAlgorithm,
        public_key: PublicKeyBytes,
        private_key: PrivateKeyBytes,
    ) -> Result<Self, DeviceError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DeviceError::EmptyId);
        }
        let seed = SignatureBytes(id.as_bytes().to_vec());
        Ok(Self {
            id,
            label,
            algorithm,
            public_key,
            private_key,
            counter: 0,
            last_signature: seed,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn public_key(&self) -> &PublicKeyBytes {
        &self.public_key
    }

    /// Number of signatures this device has produced.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// The most recent signature, or the chain seed if none yet.
    pub fn last_signature(&self) -> &SignatureBytes {
        &self.last_signature
    }

    /// Produce the next chain link over `data`.
    ///
    /// The signer must match the device's algorithm; the service selects it
    /// via [`crate::crypto::signer_for`]. On signer failure the device is
    /// left untouched — counter and last-signature advance only after the
    /// signature exists.
    pub fn sign(&mut self, data: &str, signer: &dyn Signer) -> Result<SignTransaction, CryptoError> {
        let payload = secured_payload(self.counter, data, &self.last_signature);
        let signature = signer.sign(&self.private_key, payload.as_bytes())?;

        self.counter += 1;
        self.last_signature = signature.clone();

        Ok(SignTransaction {
            device_id: self.id.clone(),
            signature,
            signed_payload: payload,
        })
    }
}

/// Deterministic encoding of the triple the device signs.
pub fn secured_payload(counter: u64, data: &str, previous: &SignatureBytes) -> String {
    format!("{}_{}_{}", counter, data, BASE64.encode(&previous.0))
}

/// Immutable record of one signing operation.
///
/// `signed_payload` is the exact byte sequence that was signed, retained so
/// a verifier can check the chain without re-deriving intermediate state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTransaction {
    pub device_id: String,
    pub signature: SignatureBytes,
    pub signed_payload: String,
}

impl SignTransaction {
    /// Signature in the transport-friendly base64 form.
    pub fn signature_base64(&self) -> String {
        BASE64.encode(&self.signature.0)
    }
}
