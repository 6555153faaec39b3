use std::fmt;

use k256::ecdsa::{RecoveryId, VerifyingKey as Secp256k1VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use txkit_sbor::{
    expect_kind, Categorize, Decode, DecodeError, Decoder, Encode, EncodeError, Encoder, ValueKind,
};
use txkit_types::{Curve, Ed25519PublicKey, Hash, PublicKey, Secp256k1PublicKey};

use crate::error::SignatureError;

/// Recoverable Secp256k1 signature: recovery id byte, then `r` and `s`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secp256k1Signature(pub [u8; Secp256k1Signature::LENGTH]);

impl Secp256k1Signature {
    pub const LENGTH: usize = 65;

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| SignatureError::InvalidLength {
                expected: Self::LENGTH,
                actual: bytes.len(),
            })
    }

    /// Recover the compressed public key that produced this signature.
    pub fn recover(&self, message: &Hash) -> Result<Secp256k1PublicKey, SignatureError> {
        let recovery_id =
            RecoveryId::from_byte(self.0[0]).ok_or(SignatureError::InvalidSignature)?;
        let signature = k256::ecdsa::Signature::from_slice(&self.0[1..])
            .map_err(|_| SignatureError::InvalidSignature)?;
        let key =
            Secp256k1VerifyingKey::recover_from_prehash(message.as_bytes(), &signature, recovery_id)
                .map_err(|_| SignatureError::InvalidSignature)?;
        Secp256k1PublicKey::from_slice(key.to_encoded_point(true).as_bytes())
            .map_err(|_| SignatureError::InvalidKey)
    }
}

/// Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature(pub [u8; Ed25519Signature::LENGTH]);

impl Ed25519Signature {
    pub const LENGTH: usize = 64;

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| SignatureError::InvalidLength {
                expected: Self::LENGTH,
                actual: bytes.len(),
            })
    }

    pub fn verify(&self, message: &Hash, public_key: &Ed25519PublicKey) -> Result<(), SignatureError> {
        use ed25519_dalek::Verifier;
        let key = ed25519_dalek::VerifyingKey::from_bytes(&public_key.0)
            .map_err(|_| SignatureError::InvalidKey)?;
        key.verify(
            message.as_bytes(),
            &ed25519_dalek::Signature::from_bytes(&self.0),
        )
        .map_err(|_| SignatureError::InvalidSignature)
    }
}

/// A detached signature on either curve.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    Secp256k1(Secp256k1Signature),
    Ed25519(Ed25519Signature),
}

impl Signature {
    pub fn curve(&self) -> Curve {
        match self {
            Self::Secp256k1(_) => Curve::Secp256k1,
            Self::Ed25519(_) => Curve::Ed25519,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Secp256k1(signature) => &signature.0,
            Self::Ed25519(signature) => &signature.0,
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    pub fn from_slice(curve: Curve, bytes: &[u8]) -> Result<Self, SignatureError> {
        match curve {
            Curve::Secp256k1 => Secp256k1Signature::from_slice(bytes).map(Self::Secp256k1),
            Curve::Ed25519 => Ed25519Signature::from_slice(bytes).map(Self::Ed25519),
        }
    }

    /// Verify this signature over `message` against `public_key`.
    pub fn verify(&self, message: &Hash, public_key: &PublicKey) -> Result<(), SignatureError> {
        match (self, public_key) {
            (Self::Secp256k1(signature), PublicKey::Secp256k1(expected)) => {
                if signature.recover(message)? == *expected {
                    Ok(())
                } else {
                    Err(SignatureError::InvalidSignature)
                }
            }
            (Self::Ed25519(signature), PublicKey::Ed25519(key)) => signature.verify(message, key),
            _ => Err(SignatureError::CurveMismatch {
                key: public_key.curve(),
                signature: self.curve(),
            }),
        }
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature::{:?}({}...)",
            self.curve(),
            hex::encode(&self.as_bytes()[..8])
        )
    }
}

/// A signature together with the key needed to check it.
///
/// Secp256k1 signatures carry only the signature; the key is recovered from
/// it and the signed hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureWithPublicKey {
    Secp256k1 {
        signature: Secp256k1Signature,
    },
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
}

impl SignatureWithPublicKey {
    /// Pair a signature with its signer's key. The curves must agree.
    pub fn new(signature: Signature, public_key: PublicKey) -> Result<Self, SignatureError> {
        match (signature, public_key) {
            (Signature::Secp256k1(signature), PublicKey::Secp256k1(_)) => {
                Ok(Self::Secp256k1 { signature })
            }
            (Signature::Ed25519(signature), PublicKey::Ed25519(public_key)) => Ok(Self::Ed25519 {
                public_key,
                signature,
            }),
            (signature, public_key) => Err(SignatureError::CurveMismatch {
                key: public_key.curve(),
                signature: signature.curve(),
            }),
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::Secp256k1 { signature } => Signature::Secp256k1(*signature),
            Self::Ed25519 { signature, .. } => Signature::Ed25519(*signature),
        }
    }

    pub fn curve(&self) -> Curve {
        self.signature().curve()
    }

    /// Verify over `message` and return the signer's key.
    pub fn verify(&self, message: &Hash) -> Result<PublicKey, SignatureError> {
        match self {
            Self::Secp256k1 { signature } => signature.recover(message).map(PublicKey::Secp256k1),
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                signature.verify(message, public_key)?;
                Ok(PublicKey::Ed25519(*public_key))
            }
        }
    }
}

impl fmt::Debug for SignatureWithPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secp256k1 { .. } => write!(f, "SignatureWithPublicKey({:?})", self.signature()),
            Self::Ed25519 { public_key, .. } => write!(
                f,
                "SignatureWithPublicKey({:?}, key {})",
                self.signature(),
                hex::encode(public_key.0)
            ),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SignatureRepr {
    curve: Curve,
    signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    public_key: Option<String>,
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SignatureRepr {
            curve: self.curve(),
            signature: self.to_hex(),
            public_key: None,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = SignatureRepr::deserialize(deserializer)?;
        let bytes = hex::decode(&repr.signature).map_err(serde::de::Error::custom)?;
        Self::from_slice(repr.curve, &bytes).map_err(serde::de::Error::custom)
    }
}

impl Serialize for SignatureWithPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let public_key = match self {
            Self::Secp256k1 { .. } => None,
            Self::Ed25519 { public_key, .. } => Some(hex::encode(public_key.0)),
        };
        SignatureRepr {
            curve: self.curve(),
            signature: self.signature().to_hex(),
            public_key,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SignatureWithPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        let repr = SignatureRepr::deserialize(deserializer)?;
        let bytes = hex::decode(&repr.signature).map_err(D::Error::custom)?;
        let signature = Signature::from_slice(repr.curve, &bytes).map_err(D::Error::custom)?;
        match signature {
            Signature::Secp256k1(signature) => Ok(Self::Secp256k1 { signature }),
            Signature::Ed25519(signature) => {
                let key = repr
                    .public_key
                    .ok_or_else(|| D::Error::missing_field("public_key"))?;
                let key = hex::decode(&key).map_err(D::Error::custom)?;
                let public_key = Ed25519PublicKey::from_slice(&key).map_err(D::Error::custom)?;
                Ok(Self::Ed25519 {
                    public_key,
                    signature,
                })
            }
        }
    }
}

fn decode_variant_header(
    decoder: &mut Decoder<'_>,
    type_name: &'static str,
) -> Result<(Curve, usize), DecodeError> {
    let (discriminator, fields) = decoder.read_enum_header()?;
    let curve = match discriminator {
        0 => Curve::Secp256k1,
        1 => Curve::Ed25519,
        discriminator => {
            return Err(DecodeError::UnknownDiscriminator {
                type_name,
                discriminator,
            })
        }
    };
    Ok((curve, fields))
}

fn expect_fields(expected: usize, actual: usize) -> Result<(), DecodeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(DecodeError::UnexpectedSize { expected, actual })
    }
}

fn curve_discriminator(curve: Curve) -> u8 {
    match curve {
        Curve::Secp256k1 => 0,
        Curve::Ed25519 => 1,
    }
}

impl Categorize for Signature {
    const VALUE_KIND: ValueKind = ValueKind::Enum;
}

impl Encode for Signature {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Enum
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encoder.nested(|e| {
            e.write_enum_header(curve_discriminator(self.curve()), 1)?;
            e.encode_bytes(self.as_bytes())
        })
    }
}

impl Decode for Signature {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError> {
        expect_kind(ValueKind::Enum, kind)?;
        decoder.nested(|d| {
            let (curve, fields) = decode_variant_header(d, "Signature")?;
            expect_fields(1, fields)?;
            Ok(match curve {
                Curve::Secp256k1 => Self::Secp256k1(Secp256k1Signature(d.decode_byte_array()?)),
                Curve::Ed25519 => Self::Ed25519(Ed25519Signature(d.decode_byte_array()?)),
            })
        })
    }
}

impl Categorize for SignatureWithPublicKey {
    const VALUE_KIND: ValueKind = ValueKind::Enum;
}

impl Encode for SignatureWithPublicKey {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Enum
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encoder.nested(|e| match self {
            Self::Secp256k1 { signature } => {
                e.write_enum_header(0, 1)?;
                e.encode_bytes(&signature.0)
            }
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                e.write_enum_header(1, 2)?;
                e.encode_bytes(&public_key.0)?;
                e.encode_bytes(&signature.0)
            }
        })
    }
}

impl Decode for SignatureWithPublicKey {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError> {
        expect_kind(ValueKind::Enum, kind)?;
        decoder.nested(|d| {
            let (curve, fields) = decode_variant_header(d, "SignatureWithPublicKey")?;
            match curve {
                Curve::Secp256k1 => {
                    expect_fields(1, fields)?;
                    Ok(Self::Secp256k1 {
                        signature: Secp256k1Signature(d.decode_byte_array()?),
                    })
                }
                Curve::Ed25519 => {
                    expect_fields(2, fields)?;
                    let public_key = Ed25519PublicKey(d.decode_byte_array()?);
                    let signature = Ed25519Signature(d.decode_byte_array()?);
                    Ok(Self::Ed25519 {
                        public_key,
                        signature,
                    })
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::PrivateKey;
    use crate::signer::Signer;
    use txkit_sbor::{decode_payload, encode_payload};

    fn message() -> Hash {
        Hash::of(b"intent")
    }

    #[test]
    fn ed25519_sign_and_verify() {
        let key = PrivateKey::ed25519_from_bytes([7u8; 32]);
        let signature = key.sign(&message()).unwrap();
        assert!(signature.verify(&message(), &key.public_key()).is_ok());
        assert_eq!(
            signature.verify(&Hash::of(b"other"), &key.public_key()),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn secp256k1_signature_recovers_signer() {
        let key = PrivateKey::secp256k1_from_bytes(&[9u8; 32]).unwrap();
        let signature = key.sign_with_public_key(&message()).unwrap();
        assert_eq!(signature.verify(&message()).unwrap(), key.public_key());
        assert!(signature.signature().verify(&message(), &key.public_key()).is_ok());
    }

    #[test]
    fn secp256k1_signature_over_other_message_recovers_other_key() {
        let key = PrivateKey::secp256k1_from_bytes(&[9u8; 32]).unwrap();
        let signature = key.sign(&message()).unwrap();
        assert!(signature.verify(&Hash::of(b"other"), &key.public_key()).is_err());
    }

    #[test]
    fn curve_mismatch_is_rejected() {
        let ed = PrivateKey::ed25519_from_bytes([1u8; 32]);
        let secp = PrivateKey::secp256k1_from_bytes(&[2u8; 32]).unwrap();
        let signature = ed.sign(&message()).unwrap();
        assert_eq!(
            SignatureWithPublicKey::new(signature, secp.public_key()),
            Err(SignatureError::CurveMismatch {
                key: Curve::Secp256k1,
                signature: Curve::Ed25519
            })
        );
    }

    #[test]
    fn encoded_layouts() {
        let signature = Signature::Ed25519(Ed25519Signature([0xab; 64]));
        let bytes = encode_payload(&signature).unwrap();
        assert_eq!(&bytes[..7], &[0x4d, 0x22, 0x01, 0x01, 0x20, 0x07, 0x40]);
        assert_eq!(bytes.len(), 7 + 64);

        let with_key = SignatureWithPublicKey::Secp256k1 {
            signature: Secp256k1Signature([0x01; 65]),
        };
        let bytes = encode_payload(&with_key).unwrap();
        assert_eq!(&bytes[..7], &[0x4d, 0x22, 0x00, 0x01, 0x20, 0x07, 0x41]);
        assert_eq!(decode_payload::<SignatureWithPublicKey>(&bytes).unwrap(), with_key);
    }

    #[test]
    fn unknown_curve_discriminator_is_unsupported() {
        let err = decode_payload::<Signature>(&[0x4d, 0x22, 0x05, 0x00]).unwrap_err();
        assert!(err.is_unsupported_variant());
    }

    #[test]
    fn serde_keeps_public_key() {
        let key = PrivateKey::ed25519_from_bytes([3u8; 32]);
        let signature = key.sign_with_public_key(&message()).unwrap();
        let json = serde_json::to_string(&signature).unwrap();
        let parsed: SignatureWithPublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, signature);
    }
}
