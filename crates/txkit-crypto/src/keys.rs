use std::fmt;

use tracing::trace;
use txkit_types::{Curve, Ed25519PublicKey, Hash, PublicKey, Secp256k1PublicKey};

use crate::error::SignatureError;
use crate::signature::{Ed25519Signature, Secp256k1Signature, Signature};
use crate::signer::Signer;

/// A private key on either supported curve.
pub enum PrivateKey {
    Secp256k1(k256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl PrivateKey {
    /// Generate a new random Ed25519 key.
    pub fn generate_ed25519() -> Self {
        let mut rng = rand::thread_rng();
        Self::Ed25519(ed25519_dalek::SigningKey::generate(&mut rng))
    }

    /// Generate a new random Secp256k1 key.
    pub fn generate_secp256k1() -> Self {
        let mut rng = rand::thread_rng();
        Self::Secp256k1(k256::ecdsa::SigningKey::random(&mut rng))
    }

    pub fn ed25519_from_bytes(bytes: [u8; 32]) -> Self {
        Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    /// Fails when `bytes` is not a valid non-zero scalar.
    pub fn secp256k1_from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        k256::ecdsa::SigningKey::from_slice(bytes)
            .map(Self::Secp256k1)
            .map_err(|_| SignatureError::InvalidKey)
    }

    pub fn from_bytes(curve: Curve, bytes: &[u8]) -> Result<Self, SignatureError> {
        match curve {
            Curve::Secp256k1 => Self::secp256k1_from_bytes(bytes),
            Curve::Ed25519 => {
                let secret: [u8; 32] =
                    bytes.try_into().map_err(|_| SignatureError::InvalidLength {
                        expected: 32,
                        actual: bytes.len(),
                    })?;
                Ok(Self::ed25519_from_bytes(secret))
            }
        }
    }

    pub fn curve(&self) -> Curve {
        match self {
            Self::Secp256k1(_) => Curve::Secp256k1,
            Self::Ed25519(_) => Curve::Ed25519,
        }
    }

    /// Raw secret scalar bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Secp256k1(key) => key.to_bytes().to_vec(),
            Self::Ed25519(key) => key.to_bytes().to_vec(),
        }
    }
}

impl Signer for PrivateKey {
    fn public_key(&self) -> PublicKey {
        match self {
            Self::Secp256k1(key) => {
                let point = key.verifying_key().to_encoded_point(true);
                let mut bytes = [0u8; Secp256k1PublicKey::LENGTH];
                bytes.copy_from_slice(point.as_bytes());
                PublicKey::Secp256k1(Secp256k1PublicKey(bytes))
            }
            Self::Ed25519(key) => PublicKey::Ed25519(Ed25519PublicKey(key.verifying_key().to_bytes())),
        }
    }

    fn sign(&self, message: &Hash) -> Result<Signature, SignatureError> {
        trace!(curve = ?self.curve(), message = %message.short_hex(), "signing");
        match self {
            Self::Secp256k1(key) => {
                let (signature, recovery_id) = key
                    .sign_prehash_recoverable(message.as_bytes())
                    .map_err(|_| SignatureError::SigningFailed)?;
                let mut bytes = [0u8; Secp256k1Signature::LENGTH];
                bytes[0] = recovery_id.to_byte();
                bytes[1..].copy_from_slice(&signature.to_bytes());
                Ok(Signature::Secp256k1(Secp256k1Signature(bytes)))
            }
            Self::Ed25519(key) => {
                use ed25519_dalek::Signer as _;
                Ok(Signature::Ed25519(Ed25519Signature(
                    key.sign(message.as_bytes()).to_bytes(),
                )))
            }
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey::{:?}(<redacted>)", self.curve())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ed25519_public_key_is_stable() {
        let a = PrivateKey::ed25519_from_bytes([0x11; 32]);
        let b = PrivateKey::from_bytes(Curve::Ed25519, &[0x11; 32]).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.public_key().curve(), Curve::Ed25519);
    }

    #[test]
    fn secp256k1_public_key_is_compressed() {
        let key = PrivateKey::secp256k1_from_bytes(&[0x22; 32]).unwrap();
        let public_key = key.public_key();
        assert_eq!(public_key.as_bytes().len(), 33);
        assert!(matches!(public_key.as_bytes()[0], 0x02 | 0x03));
    }

    #[test]
    fn zero_secp256k1_scalar_is_rejected() {
        assert_eq!(
            PrivateKey::secp256k1_from_bytes(&[0u8; 32]).unwrap_err(),
            SignatureError::InvalidKey
        );
    }

    #[test]
    fn wrong_ed25519_length_is_rejected() {
        assert_eq!(
            PrivateKey::from_bytes(Curve::Ed25519, &[1u8; 31]).unwrap_err(),
            SignatureError::InvalidLength {
                expected: 32,
                actual: 31
            }
        );
    }

    #[test]
    fn secret_bytes_roundtrip() {
        let key = PrivateKey::generate_secp256k1();
        let again = PrivateKey::from_bytes(Curve::Secp256k1, &key.to_bytes()).unwrap();
        assert_eq!(key.public_key(), again.public_key());

        let key = PrivateKey::generate_ed25519();
        let again = PrivateKey::from_bytes(Curve::Ed25519, &key.to_bytes()).unwrap();
        assert_eq!(key.public_key(), again.public_key());
    }

    #[test]
    fn ed25519_signatures_are_deterministic() {
        let key = PrivateKey::ed25519_from_bytes([5u8; 32]);
        let message = Hash::of(b"m");
        assert_eq!(key.sign(&message).unwrap(), key.sign(&message).unwrap());
    }

    #[test]
    fn debug_redacts_secret() {
        let key = PrivateKey::generate_ed25519();
        assert!(format!("{key:?}").contains("redacted"));
    }
}
