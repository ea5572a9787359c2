//! ECDSA P-256 key generation and signing.
//!
//! Encodings: public key = SEC1 uncompressed point (65 bytes), private key =
//! raw scalar (32 bytes), signature = fixed-size r‖s (64 bytes). ECDSA
//! randomizes per signature, so two signatures over the same message differ;
//! both verify against the public key.

use super::{CryptoError, KeyPair, KeyPairGenerator, PrivateKeyBytes, PublicKeyBytes, SignatureBytes, Signer};
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{Signature, SigningKey};
use rand::rngs::OsRng;

pub struct EcdsaKeyPairGenerator;

impl KeyPairGenerator for EcdsaKeyPairGenerator {
    fn generate(&self) -> Result<KeyPair, CryptoError> {
        let mut rng = OsRng;
        let sk = SigningKey::random(&mut rng);
        let public = sk.verifying_key().to_encoded_point(false).as_bytes().to_vec();
        Ok(KeyPair {
            public: PublicKeyBytes(public),
            private: PrivateKeyBytes(sk.to_bytes().to_vec()),
        })
    }
}

pub struct EcdsaSigner;

impl Signer for EcdsaSigner {
    fn sign(
        &self,
        private_key: &PrivateKeyBytes,
        message: &[u8],
    ) -> Result<SignatureBytes, CryptoError> {
        let sk = SigningKey::from_slice(&private_key.0)
            .map_err(|e| CryptoError::Signing(format!("ecdsa: bad private key: {e}")))?;
        let sig: Signature = sk.sign(message);
        Ok(SignatureBytes(sig.to_bytes().to_vec()))
    }
}
