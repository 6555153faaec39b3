use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;
use crate::hash::blake2b_256;

/// Elliptic curve of a key or signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Curve {
    Secp256k1,
    Ed25519,
}

/// Compressed SEC1 Secp256k1 public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Secp256k1PublicKey(pub [u8; Secp256k1PublicKey::LENGTH]);

impl Secp256k1PublicKey {
    pub const LENGTH: usize = 33;

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        bytes.try_into().map(Self).map_err(|_| TypeError::InvalidLength {
            expected: Self::LENGTH,
            actual: bytes.len(),
        })
    }
}

/// Ed25519 public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ed25519PublicKey(pub [u8; Ed25519PublicKey::LENGTH]);

impl Ed25519PublicKey {
    pub const LENGTH: usize = 32;

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        bytes.try_into().map(Self).map_err(|_| TypeError::InvalidLength {
            expected: Self::LENGTH,
            actual: bytes.len(),
        })
    }
}

/// A public key on either supported curve.
///
/// Only the byte form is held here; point validation happens where a key is
/// used for verification.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PublicKey {
    Secp256k1(Secp256k1PublicKey),
    Ed25519(Ed25519PublicKey),
}

impl PublicKey {
    pub fn curve(&self) -> Curve {
        match self {
            Self::Secp256k1(_) => Curve::Secp256k1,
            Self::Ed25519(_) => Curve::Ed25519,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Secp256k1(key) => &key.0,
            Self::Ed25519(key) => &key.0,
        }
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Parse raw key bytes for the given curve.
    pub fn from_slice(curve: Curve, bytes: &[u8]) -> Result<Self, TypeError> {
        match curve {
            Curve::Secp256k1 => Secp256k1PublicKey::from_slice(bytes).map(Self::Secp256k1),
            Curve::Ed25519 => Ed25519PublicKey::from_slice(bytes).map(Self::Ed25519),
        }
    }

    /// The 29-byte key hash that preallocated addresses are built from.
    pub fn hash(&self) -> PublicKeyHash {
        let digest = blake2b_256(self.as_bytes());
        let mut tail = [0u8; PublicKeyHash::LENGTH];
        tail.copy_from_slice(&digest[32 - PublicKeyHash::LENGTH..]);
        match self {
            Self::Secp256k1(_) => PublicKeyHash::Secp256k1(tail),
            Self::Ed25519(_) => PublicKeyHash::Ed25519(tail),
        }
    }

    /// The 10-byte fingerprint identifying this key as a message recipient.
    pub fn fingerprint(&self) -> PublicKeyFingerprint {
        let digest = blake2b_256(self.as_bytes());
        let mut tail = [0u8; PublicKeyFingerprint::LENGTH];
        tail.copy_from_slice(&digest[32 - PublicKeyFingerprint::LENGTH..]);
        PublicKeyFingerprint(tail)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secp256k1(_) => write!(f, "PublicKey::Secp256k1({})", self.to_hex()),
            Self::Ed25519(_) => write!(f, "PublicKey::Ed25519({})", self.to_hex()),
        }
    }
}

impl From<Ed25519PublicKey> for PublicKey {
    fn from(key: Ed25519PublicKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<Secp256k1PublicKey> for PublicKey {
    fn from(key: Secp256k1PublicKey) -> Self {
        Self::Secp256k1(key)
    }
}

#[derive(Serialize, Deserialize)]
struct PublicKeyRepr {
    curve: Curve,
    key: String,
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PublicKeyRepr {
            curve: self.curve(),
            key: self.to_hex(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PublicKeyRepr::deserialize(deserializer)?;
        let bytes = hex::decode(&repr.key).map_err(serde::de::Error::custom)?;
        Self::from_slice(repr.curve, &bytes).map_err(serde::de::Error::custom)
    }
}

/// Last 29 bytes of the Blake2b-256 digest of a public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PublicKeyHash {
    Secp256k1([u8; PublicKeyHash::LENGTH]),
    Ed25519([u8; PublicKeyHash::LENGTH]),
}

impl PublicKeyHash {
    pub const LENGTH: usize = 29;

    pub fn curve(&self) -> Curve {
        match self {
            Self::Secp256k1(_) => Curve::Secp256k1,
            Self::Ed25519(_) => Curve::Ed25519,
        }
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        match self {
            Self::Secp256k1(bytes) | Self::Ed25519(bytes) => bytes,
        }
    }
}

/// Last 10 bytes of the Blake2b-256 digest of a public key.
///
/// The text form maps each byte to the character with the same code point,
/// so `from_text(to_text(x)) == x` for every fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKeyFingerprint(pub [u8; PublicKeyFingerprint::LENGTH]);

impl PublicKeyFingerprint {
    pub const LENGTH: usize = 10;

    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, TypeError> {
        let actual = bytes.len();
        bytes.try_into().map(Self).map_err(|_| TypeError::InvalidLength {
            expected: Self::LENGTH,
            actual,
        })
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    pub fn to_text(&self) -> String {
        self.0.iter().map(|b| char::from(*b)).collect()
    }

    pub fn from_text(text: &str) -> Result<Self, TypeError> {
        let bytes = text
            .chars()
            .map(u8::try_from)
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| TypeError::InvalidPublicKey(format!("fingerprint text: {e}")))?;
        Self::from_vec(bytes)
    }
}

impl fmt::Debug for PublicKeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKeyFingerprint({})", hex::encode(self.0))
    }
}

impl fmt::Display for PublicKeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_vec_roundtrip_maps_bytes_to_letters() {
        let bytes: Vec<u8> = (65..75).collect();
        let fingerprint = PublicKeyFingerprint::from_vec(bytes.clone()).unwrap();
        assert_eq!(fingerprint.to_text(), "ABCDEFGHIJ");
        assert_eq!(fingerprint.to_vec(), bytes);
        assert_eq!(
            PublicKeyFingerprint::from_text("ABCDEFGHIJ").unwrap(),
            fingerprint
        );
    }

    #[test]
    fn fingerprint_rejects_wrong_length() {
        assert_eq!(
            PublicKeyFingerprint::from_vec(vec![1, 2, 3]),
            Err(TypeError::InvalidLength {
                expected: 10,
                actual: 3
            })
        );
    }

    #[test]
    fn fingerprint_text_is_lossless_for_high_bytes() {
        let fingerprint = PublicKeyFingerprint([0xff, 0x00, 0x80, 1, 2, 3, 4, 5, 6, 7]);
        let text = fingerprint.to_text();
        assert_eq!(PublicKeyFingerprint::from_text(&text).unwrap(), fingerprint);
    }

    #[test]
    fn hash_and_fingerprint_share_the_digest_tail() {
        let key = PublicKey::Ed25519(Ed25519PublicKey([0x11; 32]));
        let hash = key.hash();
        let fingerprint = key.fingerprint();
        assert_eq!(hash.curve(), Curve::Ed25519);
        assert_eq!(&hash.as_bytes()[19..], fingerprint.as_bytes());
    }

    #[test]
    fn key_hash_matches_blake2b_tail() {
        let key = PublicKey::Ed25519(Ed25519PublicKey([0x11; 32]));
        assert_eq!(
            hex::encode(key.hash().as_bytes()),
            "eac45aa41825e0bc3f875570af061acbf0b950ad752ff0f9463fe13ad5"
        );
    }

    #[test]
    fn from_slice_checks_curve_length() {
        assert!(PublicKey::from_slice(Curve::Secp256k1, &[2u8; 33]).is_ok());
        assert!(PublicKey::from_slice(Curve::Secp256k1, &[2u8; 32]).is_err());
        assert!(PublicKey::from_slice(Curve::Ed25519, &[2u8; 32]).is_ok());
    }

    #[test]
    fn serde_roundtrip() {
        let key = PublicKey::Secp256k1(Secp256k1PublicKey([2u8; 33]));
        let json = serde_json::to_string(&key).unwrap();
        let parsed: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
