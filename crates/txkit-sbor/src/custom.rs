//! Custom value kinds used inside manifests, and codec impls for the
//! primitive types of `txkit-types`.

use std::fmt;

use serde::{Deserialize, Serialize};
use txkit_types::{Decimal, Hash, NodeId, NonFungibleLocalId, PublicKey};

use crate::codec::{Categorize, Decode, Encode};
use crate::decoder::{expect_kind, Decoder};
use crate::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};
use crate::value_kind::ValueKind;

/// An address operand: either a static entity or one allocated earlier in the
/// same manifest and referred to by position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManifestAddress {
    Static(NodeId),
    Named(u32),
}

/// Positional reference to a bucket created earlier in the manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManifestBucket(pub u32);

/// Positional reference to a proof created earlier in the manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManifestProof(pub u32);

/// Positional reference to an address reservation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManifestAddressReservation(pub u32);

/// Placeholder resolved by the engine at execution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManifestExpression {
    EntireWorktop,
    EntireAuthZone,
}

/// Reference to a blob attached to the manifest, by its hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManifestBlobRef(pub Hash);

impl fmt::Display for ManifestBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bucket({})", self.0)
    }
}

impl fmt::Display for ManifestProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proof({})", self.0)
    }
}

macro_rules! impl_custom {
    ($t:ty, $kind:ident, |$self_:ident, $enc:ident| $encode:block, |$dec:ident| $decode:block) => {
        impl Categorize for $t {
            const VALUE_KIND: ValueKind = ValueKind::$kind;
        }

        impl Encode for $t {
            fn value_kind(&self) -> ValueKind {
                ValueKind::$kind
            }

            fn encode_body(&self, $enc: &mut Encoder) -> Result<(), EncodeError> {
                let $self_ = self;
                $encode
                Ok(())
            }
        }

        impl Decode for $t {
            fn decode_body_with_kind(
                $dec: &mut Decoder<'_>,
                kind: ValueKind,
            ) -> Result<Self, DecodeError> {
                expect_kind(ValueKind::$kind, kind)?;
                $decode
            }
        }
    };
}

impl_custom!(
    ManifestAddress,
    Address,
    |value, encoder| {
        match value {
            ManifestAddress::Static(node_id) => {
                encoder.write_discriminator(0);
                encoder.write_slice(node_id.as_bytes());
            }
            ManifestAddress::Named(id) => {
                encoder.write_discriminator(1);
                encoder.write_slice(&id.to_le_bytes());
            }
        }
    },
    |decoder| {
        match decoder.read_discriminator()? {
            0 => {
                let bytes: [u8; NodeId::LENGTH] = decoder.read_array()?;
                NodeId::from_slice(&bytes)
                    .map(ManifestAddress::Static)
                    .map_err(|e| DecodeError::InvalidValue(e.to_string()))
            }
            1 => Ok(ManifestAddress::Named(u32::from_le_bytes(decoder.read_array()?))),
            discriminator => Err(DecodeError::UnknownDiscriminator {
                type_name: "ManifestAddress",
                discriminator,
            }),
        }
    }
);

impl_custom!(
    ManifestBucket,
    Bucket,
    |value, encoder| {
        encoder.write_slice(&value.0.to_le_bytes());
    },
    |decoder| { Ok(ManifestBucket(u32::from_le_bytes(decoder.read_array()?))) }
);

impl_custom!(
    ManifestProof,
    Proof,
    |value, encoder| {
        encoder.write_slice(&value.0.to_le_bytes());
    },
    |decoder| { Ok(ManifestProof(u32::from_le_bytes(decoder.read_array()?))) }
);

impl_custom!(
    ManifestAddressReservation,
    AddressReservation,
    |value, encoder| {
        encoder.write_slice(&value.0.to_le_bytes());
    },
    |decoder| {
        Ok(ManifestAddressReservation(u32::from_le_bytes(
            decoder.read_array()?,
        )))
    }
);

impl_custom!(
    ManifestExpression,
    Expression,
    |value, encoder| {
        encoder.write_discriminator(match value {
            ManifestExpression::EntireWorktop => 0,
            ManifestExpression::EntireAuthZone => 1,
        });
    },
    |decoder| {
        match decoder.read_discriminator()? {
            0 => Ok(ManifestExpression::EntireWorktop),
            1 => Ok(ManifestExpression::EntireAuthZone),
            discriminator => Err(DecodeError::UnknownDiscriminator {
                type_name: "ManifestExpression",
                discriminator,
            }),
        }
    }
);

impl_custom!(
    ManifestBlobRef,
    Blob,
    |value, encoder| {
        encoder.write_slice(value.0.as_bytes());
    },
    |decoder| { Ok(ManifestBlobRef(Hash::from_bytes(decoder.read_array()?))) }
);

impl_custom!(
    Decimal,
    Decimal,
    |value, encoder| {
        encoder.write_slice(&value.to_le_bytes());
    },
    |decoder| { Ok(Decimal::from_le_bytes(&decoder.read_array()?)) }
);

impl_custom!(
    NonFungibleLocalId,
    NonFungibleLocalId,
    |value, encoder| {
        match value {
            NonFungibleLocalId::String(s) => {
                encoder.write_discriminator(0);
                encoder.write_size(s.len())?;
                encoder.write_slice(s.as_bytes());
            }
            NonFungibleLocalId::Integer(n) => {
                encoder.write_discriminator(1);
                encoder.write_slice(&n.to_le_bytes());
            }
            NonFungibleLocalId::Bytes(bytes) => {
                encoder.write_discriminator(2);
                encoder.write_size(bytes.len())?;
                encoder.write_slice(bytes);
            }
            NonFungibleLocalId::Ruid(ruid) => {
                encoder.write_discriminator(3);
                encoder.write_slice(ruid);
            }
        }
    },
    |decoder| {
        let id = match decoder.read_discriminator()? {
            0 => {
                let len = decoder.read_collection_size(1)?;
                let bytes = decoder.read_slice(len)?;
                let s = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
                NonFungibleLocalId::String(s.to_string())
            }
            1 => NonFungibleLocalId::Integer(u64::from_le_bytes(decoder.read_array()?)),
            2 => {
                let len = decoder.read_collection_size(1)?;
                NonFungibleLocalId::Bytes(decoder.read_slice(len)?.to_vec())
            }
            3 => NonFungibleLocalId::Ruid(decoder.read_array()?),
            discriminator => {
                return Err(DecodeError::UnknownDiscriminator {
                    type_name: "NonFungibleLocalId",
                    discriminator,
                })
            }
        };
        id.validate()
            .map_err(|e| DecodeError::InvalidValue(e.to_string()))?;
        Ok(id)
    }
);

// A bare `NodeId` operand is always a static address.
impl_custom!(
    NodeId,
    Address,
    |value, encoder| {
        ManifestAddress::Static(*value).encode_body(encoder)?;
    },
    |decoder| {
        match ManifestAddress::decode_body_with_kind(decoder, ValueKind::Address)? {
            ManifestAddress::Static(node_id) => Ok(node_id),
            ManifestAddress::Named(_) => Err(DecodeError::InvalidValue(
                "expected a static address, found a named address".into(),
            )),
        }
    }
);

impl Categorize for PublicKey {
    const VALUE_KIND: ValueKind = ValueKind::Enum;
}

impl Encode for PublicKey {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Enum
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encoder.nested(|e| {
            let discriminator = match self {
                PublicKey::Secp256k1(_) => 0,
                PublicKey::Ed25519(_) => 1,
            };
            e.write_enum_header(discriminator, 1)?;
            e.encode_bytes(self.as_bytes())
        })
    }
}

impl Decode for PublicKey {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError> {
        expect_kind(ValueKind::Enum, kind)?;
        decoder.nested(|d| {
            let (discriminator, fields) = d.read_enum_header()?;
            let curve = match discriminator {
                0 => txkit_types::Curve::Secp256k1,
                1 => txkit_types::Curve::Ed25519,
                discriminator => {
                    return Err(DecodeError::UnknownDiscriminator {
                        type_name: "PublicKey",
                        discriminator,
                    })
                }
            };
            if fields != 1 {
                return Err(DecodeError::UnexpectedSize {
                    expected: 1,
                    actual: fields,
                });
            }
            let bytes = d.decode_bytes()?;
            PublicKey::from_slice(curve, &bytes).map_err(|e| DecodeError::InvalidValue(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_payload, encode_payload};
    use txkit_types::{EntityType, Ed25519PublicKey};

    fn encoded<T: Encode>(value: &T) -> Vec<u8> {
        let mut encoder = Encoder::default();
        encoder.encode(value).unwrap();
        encoder.into_bytes()
    }

    #[test]
    fn decimal_is_24_le_bytes() {
        let d: Decimal = "1.123456789012345678".parse().unwrap();
        let mut expected = vec![0x85, 0x4e, 0xf3, 0x94, 0x4d, 0xff, 0x51, 0x97, 0x0f];
        expected.extend_from_slice(&[0u8; 16]);
        assert_eq!(encoded(&d), expected);
    }

    #[test]
    fn addresses() {
        let node_id = NodeId::from_parts(EntityType::GlobalAccount, &[9u8; 29]);
        let bytes = encoded(&ManifestAddress::Static(node_id));
        assert_eq!(bytes[..3], [0x80, 0x00, 0xc1]);
        assert_eq!(bytes.len(), 32);
        assert_eq!(
            encoded(&ManifestAddress::Named(2)),
            vec![0x80, 0x01, 0x02, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn static_address_with_unknown_entity_is_rejected() {
        let mut bytes = vec![0x4d, 0x80, 0x00];
        bytes.extend_from_slice(&[0x01; 30]);
        assert!(matches!(
            decode_payload::<ManifestAddress>(&bytes),
            Err(DecodeError::InvalidValue(_))
        ));
    }

    #[test]
    fn node_id_rejects_named_address() {
        let bytes = encode_payload(&ManifestAddress::Named(0)).unwrap();
        assert!(matches!(
            decode_payload::<NodeId>(&bytes),
            Err(DecodeError::InvalidValue(_))
        ));
    }

    #[test]
    fn handles_are_u32_le() {
        assert_eq!(encoded(&ManifestBucket(1)), vec![0x81, 1, 0, 0, 0]);
        assert_eq!(encoded(&ManifestProof(258)), vec![0x82, 2, 1, 0, 0]);
        assert_eq!(
            encoded(&ManifestAddressReservation(0)),
            vec![0x88, 0, 0, 0, 0]
        );
    }

    #[test]
    fn expressions() {
        assert_eq!(encoded(&ManifestExpression::EntireWorktop), vec![0x83, 0]);
        assert_eq!(encoded(&ManifestExpression::EntireAuthZone), vec![0x83, 1]);
        assert_eq!(
            decode_payload::<ManifestExpression>(&[0x4d, 0x83, 0x07]),
            Err(DecodeError::UnknownDiscriminator {
                type_name: "ManifestExpression",
                discriminator: 7
            })
        );
    }

    #[test]
    fn non_fungible_local_ids() {
        let ids = vec![
            NonFungibleLocalId::string("ticket").unwrap(),
            NonFungibleLocalId::integer(1),
            NonFungibleLocalId::bytes(vec![0xde, 0xad]).unwrap(),
            NonFungibleLocalId::ruid([7u8; 32]),
        ];
        assert_eq!(
            encoded(&ids[1]),
            vec![0x87, 0x01, 1, 0, 0, 0, 0, 0, 0, 0]
        );
        let bytes = encode_payload(&ids).unwrap();
        assert_eq!(decode_payload::<Vec<NonFungibleLocalId>>(&bytes).unwrap(), ids);
    }

    #[test]
    fn invalid_string_local_id_is_rejected() {
        let bytes = [0x4d, 0x87, 0x00, 0x02, b'a', b' '];
        assert!(matches!(
            decode_payload::<NonFungibleLocalId>(&bytes),
            Err(DecodeError::InvalidValue(_))
        ));
    }

    #[test]
    fn public_keys_are_enums_over_byte_arrays() {
        let key = PublicKey::Ed25519(Ed25519PublicKey([3u8; 32]));
        let bytes = encoded(&key);
        assert_eq!(bytes[..6], [0x22, 0x01, 0x01, 0x20, 0x07, 0x20]);
        assert_eq!(bytes.len(), 6 + 32);
        let payload = encode_payload(&key).unwrap();
        assert_eq!(decode_payload::<PublicKey>(&payload).unwrap(), key);
    }

    #[test]
    fn public_key_with_wrong_length_is_rejected() {
        // Ed25519 variant carrying 33 bytes.
        let mut bytes = vec![0x4d, 0x22, 0x01, 0x01, 0x20, 0x07, 0x21];
        bytes.extend_from_slice(&[1u8; 33]);
        assert!(matches!(
            decode_payload::<PublicKey>(&bytes),
            Err(DecodeError::InvalidValue(_))
        ));
    }
}
