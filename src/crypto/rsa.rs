//! RSA key generation and signing (PKCS#1 v1.5 over SHA-256).
//!
//! Encodings: public and private keys = PKCS#1 DER, signature = raw PKCS#1
//! v1.5 signature bytes (256 bytes for RSA-2048). The message is hashed with
//! SHA-256 before signing; verifiers must hash the same way.

use super::{CryptoError, KeyPair, KeyPairGenerator, PrivateKeyBytes, PublicKeyBytes, SignatureBytes, Signer};
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

const RSA_BITS: usize = 2048;

pub struct RsaKeyPairGenerator;

impl KeyPairGenerator for RsaKeyPairGenerator {
    fn generate(&self) -> Result<KeyPair, CryptoError> {
        let mut rng = OsRng;
        let sk = RsaPrivateKey::new(&mut rng, RSA_BITS)
            .map_err(|e| CryptoError::KeyGeneration(format!("rsa: {e}")))?;
        let pk = RsaPublicKey::from(&sk);

        let private = sk
            .to_pkcs1_der()
            .map_err(|e| CryptoError::KeyGeneration(format!("rsa: private der: {e}")))?;
        let public = pk
            .to_pkcs1_der()
            .map_err(|e| CryptoError::KeyGeneration(format!("rsa: public der: {e}")))?;

        Ok(KeyPair {
            public: PublicKeyBytes(public.as_bytes().to_vec()),
            private: PrivateKeyBytes(private.as_bytes().to_vec()),
        })
    }
}

pub struct RsaSigner;

impl Signer for RsaSigner {
    fn sign(
        &self,
        private_key: &PrivateKeyBytes,
        message: &[u8],
    ) -> Result<SignatureBytes, CryptoError> {
        let sk = RsaPrivateKey::from_pkcs1_der(&private_key.0)
            .map_err(|e| CryptoError::Signing(format!("rsa: bad private key: {e}")))?;
        let digest = Sha256::digest(message);
        let sig = sk
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| CryptoError::Signing(format!("rsa: {e}")))?;
        Ok(SignatureBytes(sig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1::DecodeRsaPublicKey;

    // one keygen shared across the assertions; RSA keygen is the slow path
    #[test]
    fn generate_sign_verify_and_reject_tamper() {
        let keys = RsaKeyPairGenerator.generate().unwrap();
        let sig = RsaSigner.sign(&keys.private, b"hello").unwrap();
        assert_eq!(sig.0.len(), RSA_BITS / 8);

        let pk = RsaPublicKey::from_pkcs1_der(&keys.public.0).unwrap();
        let digest = Sha256::digest(b"hello");
        pk.verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &sig.0)
            .unwrap();

        let tampered = Sha256::digest(b"tampered");
        assert!(pk
            .verify(Pkcs1v15Sign::new::<Sha256>(), &tampered, &sig.0)
            .is_err());
    }

    #[test]
    fn rejects_malformed_private_key() {
        let err = RsaSigner
            .sign(&PrivateKeyBytes(vec![0u8; 16]), b"msg")
            .unwrap_err();
        assert!(matches!(err, CryptoError::Signing(_)));
    }
}
