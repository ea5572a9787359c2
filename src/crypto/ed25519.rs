//! Ed25519 key generation and signing.
//!
//! Encodings: public key = 32 bytes, private key = the 32-byte seed,
//! signature = 64 bytes. The seed round-trips through
//! `SigningKey::from_bytes`, so the private key material stored on a device
//! is exactly what the signer parses back.

use super::{CryptoError, KeyPair, KeyPairGenerator, PrivateKeyBytes, PublicKeyBytes, SignatureBytes, Signer};
use ed25519_dalek::{Signer as DalekSigner, SigningKey};
use rand::rngs::OsRng;

pub struct Ed25519KeyPairGenerator;

impl KeyPairGenerator for Ed25519KeyPairGenerator {
    fn generate(&self) -> Result<KeyPair, CryptoError> {
        let mut rng = OsRng;
        let sk = SigningKey::generate(&mut rng);
        Ok(KeyPair {
            public: PublicKeyBytes(sk.verifying_key().to_bytes().to_vec()),
            private: PrivateKeyBytes(sk.to_bytes().to_vec()),
        })
    }
}

pub struct Ed25519Signer;

impl Signer for Ed25519Signer {
    fn sign(
        &self,
        private_key: &PrivateKeyBytes,
        message: &[u8],
    ) -> Result<SignatureBytes, CryptoError> {
        let seed: [u8; 32] = private_key
            .0
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::Signing("ed25519: private key must be 32 bytes".into()))?;
        let sk = SigningKey::from_bytes(&seed);
        let sig = sk.sign(message);
        Ok(SignatureBytes(sig.to_bytes().to_vec()))
    }
}
