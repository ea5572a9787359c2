//! Algorithm-polymorphic key generation and signing.
//!
//! Each supported algorithm contributes one [`KeyPairGenerator`] and one
//! [`Signer`] implementation; call sites never branch on algorithm names.
//! The [`SignatureAlgorithm`] tag is the only place a textual algorithm
//! identifier is parsed, and parsing either yields a valid tag or fails.
//! There is no default algorithm.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod ecdsa;
pub mod ed25519;
pub mod rsa;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Supported signing algorithms.
///
/// Textual resolution is exact-match against the UPPERCASE names; anything
/// else fails with [`CryptoError::UnsupportedAlgorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignatureAlgorithm {
    Ecdsa,
    Rsa,
    Ed25519,
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ecdsa => write!(f, "ECDSA"),
            Self::Rsa => write!(f, "RSA"),
            Self::Ed25519 => write!(f, "ED25519"),
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ECDSA" => Ok(Self::Ecdsa),
            "RSA" => Ok(Self::Rsa),
            "ED25519" => Ok(Self::Ed25519),
            other => Err(CryptoError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Opaque public key material. Encoding is algorithm-specific (see the
/// per-algorithm modules); nothing outside the matching [`Signer`] and the
/// verifier on the other end interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyBytes(pub Vec<u8>);

/// Opaque private key material. Owned exclusively by its device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKeyBytes(pub Vec<u8>);

/// Raw signature bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureBytes(pub Vec<u8>);

impl PublicKeyBytes {
    /// Short hex fingerprint for logs.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(&self.0);
        hex::encode(&digest[..8])
    }
}

/// A freshly generated key pair. Immutable after generation.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public: PublicKeyBytes,
    pub private: PrivateKeyBytes,
}

/// Produces a key pair for one algorithm.
///
/// Implementors draw from OS randomness; failure to obtain entropy or to
/// construct valid key material surfaces as [`CryptoError::KeyGeneration`].
pub trait KeyPairGenerator: Send + Sync {
    fn generate(&self) -> Result<KeyPair, CryptoError>;
}

/// Signs arbitrary bytes with a private key of the matching algorithm.
///
/// Implementors must be thread-safe since signing happens from concurrent
/// request tasks. Malformed key material surfaces as
/// [`CryptoError::Signing`].
pub trait Signer: Send + Sync {
    fn sign(
        &self,
        private_key: &PrivateKeyBytes,
        message: &[u8],
    ) -> Result<SignatureBytes, CryptoError>;
}

/// Select the key pair generator for an algorithm.
///
/// The match is exhaustive over [`SignatureAlgorithm`], so a tag without a
/// registered generator cannot exist.
pub fn generator_for(algorithm: SignatureAlgorithm) -> Box<dyn KeyPairGenerator> {
    match algorithm {
        SignatureAlgorithm::Ecdsa => Box::new(ecdsa::EcdsaKeyPairGenerator),
        SignatureAlgorithm::Rsa => Box::new(rsa::RsaKeyPairGenerator),
        SignatureAlgorithm::Ed25519 => Box::new(ed25519::Ed25519KeyPairGenerator),
    }
}

/// Select the signer for an algorithm.
pub fn signer_for(algorithm: SignatureAlgorithm) -> Box<dyn Signer> {
    match algorithm {
        SignatureAlgorithm::Ecdsa => Box::new(ecdsa::EcdsaSigner),
        SignatureAlgorithm::Rsa => Box::new(rsa::RsaSigner),
        SignatureAlgorithm::Ed25519 => Box::new(ed25519::Ed25519Signer),
    }
}
