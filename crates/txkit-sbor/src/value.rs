use serde::{Deserialize, Serialize};
use txkit_types::{Decimal, NodeId, NonFungibleLocalId};

use crate::codec::{Decode, Encode};
use crate::custom::{
    ManifestAddress, ManifestAddressReservation, ManifestBlobRef, ManifestBucket,
    ManifestExpression, ManifestProof,
};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};
use crate::value_kind::ValueKind;

/// A self-describing value tree, used for call arguments whose schema is not
/// known to the toolkit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManifestValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    String(String),
    Array {
        element_kind: ValueKind,
        elements: Vec<ManifestValue>,
    },
    Tuple {
        fields: Vec<ManifestValue>,
    },
    Enum {
        discriminator: u8,
        fields: Vec<ManifestValue>,
    },
    /// Entries in wire order. Decoding does not reject duplicate keys or
    /// out-of-order keys, unlike decoding into a typed `BTreeMap`.
    Map {
        key_kind: ValueKind,
        value_kind: ValueKind,
        entries: Vec<(ManifestValue, ManifestValue)>,
    },
    Address(ManifestAddress),
    Bucket(ManifestBucket),
    Proof(ManifestProof),
    Expression(ManifestExpression),
    Blob(ManifestBlobRef),
    Decimal(Decimal),
    NonFungibleLocalId(NonFungibleLocalId),
    AddressReservation(ManifestAddressReservation),
}

impl ManifestValue {
    pub fn tuple(fields: impl IntoIterator<Item = ManifestValue>) -> Self {
        Self::Tuple {
            fields: fields.into_iter().collect(),
        }
    }

    /// The empty tuple, used for calls without arguments.
    pub fn unit() -> Self {
        Self::Tuple { fields: Vec::new() }
    }

    pub fn enum_variant(discriminator: u8, fields: impl IntoIterator<Item = ManifestValue>) -> Self {
        Self::Enum {
            discriminator,
            fields: fields.into_iter().collect(),
        }
    }

    pub fn none() -> Self {
        Self::enum_variant(0, [])
    }

    pub fn some(value: ManifestValue) -> Self {
        Self::enum_variant(1, [value])
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Self::Array {
            element_kind: ValueKind::U8,
            elements: value.into().into_iter().map(Self::U8).collect(),
        }
    }

    pub fn static_address(node_id: NodeId) -> Self {
        Self::Address(ManifestAddress::Static(node_id))
    }

    pub fn array(element_kind: ValueKind, elements: impl IntoIterator<Item = ManifestValue>) -> Self {
        Self::Array {
            element_kind,
            elements: elements.into_iter().collect(),
        }
    }

    /// Fields of a tuple, or `None` for any other kind.
    pub fn as_tuple(&self) -> Option<&[ManifestValue]> {
        match self {
            Self::Tuple { fields } => Some(fields),
            _ => None,
        }
    }

    /// Visit this value and every nested value, parents before children.
    pub fn visit<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a ManifestValue),
    {
        f(self);
        match self {
            Self::Array { elements, .. } => elements.iter().for_each(|v| v.visit(f)),
            Self::Tuple { fields } | Self::Enum { fields, .. } => {
                fields.iter().for_each(|v| v.visit(f))
            }
            Self::Map { entries, .. } => entries.iter().for_each(|(k, v)| {
                k.visit(f);
                v.visit(f);
            }),
            _ => {}
        }
    }

    /// Every bucket referenced anywhere in the value.
    pub fn buckets(&self) -> Vec<ManifestBucket> {
        let mut out = Vec::new();
        self.visit(&mut |v| {
            if let Self::Bucket(bucket) = v {
                out.push(*bucket);
            }
        });
        out
    }

    /// Every proof referenced anywhere in the value.
    pub fn proofs(&self) -> Vec<ManifestProof> {
        let mut out = Vec::new();
        self.visit(&mut |v| {
            if let Self::Proof(proof) = v {
                out.push(*proof);
            }
        });
        out
    }

    /// Every address referenced anywhere in the value, in encounter order.
    pub fn addresses(&self) -> Vec<ManifestAddress> {
        let mut out = Vec::new();
        self.visit(&mut |v| {
            if let Self::Address(address) = v {
                out.push(*address);
            }
        });
        out
    }

    /// Every address reservation referenced anywhere in the value.
    pub fn address_reservations(&self) -> Vec<ManifestAddressReservation> {
        let mut out = Vec::new();
        self.visit(&mut |v| {
            if let Self::AddressReservation(reservation) = v {
                out.push(*reservation);
            }
        });
        out
    }

    fn encode_elements(
        encoder: &mut Encoder,
        expected: ValueKind,
        values: &[ManifestValue],
    ) -> Result<(), EncodeError> {
        for value in values {
            let actual = value.value_kind();
            if actual != expected {
                return Err(EncodeError::MismatchedElementKind { expected, actual });
            }
            value.encode_body(encoder)?;
        }
        Ok(())
    }
}

impl Encode for ManifestValue {
    fn value_kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::I8(_) => ValueKind::I8,
            Self::I16(_) => ValueKind::I16,
            Self::I32(_) => ValueKind::I32,
            Self::I64(_) => ValueKind::I64,
            Self::I128(_) => ValueKind::I128,
            Self::U8(_) => ValueKind::U8,
            Self::U16(_) => ValueKind::U16,
            Self::U32(_) => ValueKind::U32,
            Self::U64(_) => ValueKind::U64,
            Self::U128(_) => ValueKind::U128,
            Self::String(_) => ValueKind::String,
            Self::Array { .. } => ValueKind::Array,
            Self::Tuple { .. } => ValueKind::Tuple,
            Self::Enum { .. } => ValueKind::Enum,
            Self::Map { .. } => ValueKind::Map,
            Self::Address(_) => ValueKind::Address,
            Self::Bucket(_) => ValueKind::Bucket,
            Self::Proof(_) => ValueKind::Proof,
            Self::Expression(_) => ValueKind::Expression,
            Self::Blob(_) => ValueKind::Blob,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::NonFungibleLocalId(_) => ValueKind::NonFungibleLocalId,
            Self::AddressReservation(_) => ValueKind::AddressReservation,
        }
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        match self {
            Self::Bool(v) => v.encode_body(encoder),
            Self::I8(v) => v.encode_body(encoder),
            Self::I16(v) => v.encode_body(encoder),
            Self::I32(v) => v.encode_body(encoder),
            Self::I64(v) => v.encode_body(encoder),
            Self::I128(v) => v.encode_body(encoder),
            Self::U8(v) => v.encode_body(encoder),
            Self::U16(v) => v.encode_body(encoder),
            Self::U32(v) => v.encode_body(encoder),
            Self::U64(v) => v.encode_body(encoder),
            Self::U128(v) => v.encode_body(encoder),
            Self::String(v) => v.encode_body(encoder),
            Self::Array {
                element_kind,
                elements,
            } => encoder.nested(|e| {
                e.write_kind(*element_kind);
                e.write_size(elements.len())?;
                Self::encode_elements(e, *element_kind, elements)
            }),
            Self::Tuple { fields } => encoder.nested(|e| {
                e.write_tuple_header(fields.len())?;
                fields.iter().try_for_each(|field| e.encode(field))
            }),
            Self::Enum {
                discriminator,
                fields,
            } => encoder.nested(|e| {
                e.write_enum_header(*discriminator, fields.len())?;
                fields.iter().try_for_each(|field| e.encode(field))
            }),
            Self::Map {
                key_kind,
                value_kind,
                entries,
            } => encoder.nested(|e| {
                e.write_kind(*key_kind);
                e.write_kind(*value_kind);
                e.write_size(entries.len())?;
                for (key, value) in entries {
                    Self::encode_elements(e, *key_kind, std::slice::from_ref(key))?;
                    Self::encode_elements(e, *value_kind, std::slice::from_ref(value))?;
                }
                Ok(())
            }),
            Self::Address(v) => v.encode_body(encoder),
            Self::Bucket(v) => v.encode_body(encoder),
            Self::Proof(v) => v.encode_body(encoder),
            Self::Expression(v) => v.encode_body(encoder),
            Self::Blob(v) => v.encode_body(encoder),
            Self::Decimal(v) => v.encode_body(encoder),
            Self::NonFungibleLocalId(v) => v.encode_body(encoder),
            Self::AddressReservation(v) => v.encode_body(encoder),
        }
    }
}

impl Decode for ManifestValue {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError> {
        let d = decoder;
        Ok(match kind {
            ValueKind::Bool => Self::Bool(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::I8 => Self::I8(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::I16 => Self::I16(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::I32 => Self::I32(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::I64 => Self::I64(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::I128 => Self::I128(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::U8 => Self::U8(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::U16 => Self::U16(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::U32 => Self::U32(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::U64 => Self::U64(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::U128 => Self::U128(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::String => Self::String(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::Array => d.nested(|d| {
                let element_kind = d.read_kind()?;
                let len = d.read_collection_size(1)?;
                let mut elements = Vec::with_capacity(len);
                for _ in 0..len {
                    elements.push(Self::decode_body_with_kind(d, element_kind)?);
                }
                Ok(Self::Array {
                    element_kind,
                    elements,
                })
            })?,
            ValueKind::Tuple => d.nested(|d| {
                let len = d.read_collection_size(1)?;
                let mut fields = Vec::with_capacity(len);
                for _ in 0..len {
                    fields.push(d.decode()?);
                }
                Ok(Self::Tuple { fields })
            })?,
            ValueKind::Enum => d.nested(|d| {
                let (discriminator, len) = d.read_enum_header()?;
                let mut fields = Vec::with_capacity(len);
                for _ in 0..len {
                    fields.push(d.decode()?);
                }
                Ok(Self::Enum {
                    discriminator,
                    fields,
                })
            })?,
            ValueKind::Map => d.nested(|d| {
                let key_kind = d.read_kind()?;
                let value_kind = d.read_kind()?;
                let len = d.read_collection_size(2)?;
                // Keys are kept as written; uniqueness is the typed decoder's job.
                let mut entries = Vec::with_capacity(len);
                for _ in 0..len {
                    let key = Self::decode_body_with_kind(d, key_kind)?;
                    let value = Self::decode_body_with_kind(d, value_kind)?;
                    entries.push((key, value));
                }
                Ok(Self::Map {
                    key_kind,
                    value_kind,
                    entries,
                })
            })?,
            ValueKind::Address => Self::Address(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::Bucket => Self::Bucket(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::Proof => Self::Proof(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::Expression => Self::Expression(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::Blob => Self::Blob(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::Decimal => Self::Decimal(Decode::decode_body_with_kind(d, kind)?),
            ValueKind::NonFungibleLocalId => {
                Self::NonFungibleLocalId(Decode::decode_body_with_kind(d, kind)?)
            }
            ValueKind::AddressReservation => {
                Self::AddressReservation(Decode::decode_body_with_kind(d, kind)?)
            }
        })
    }
}

impl From<Decimal> for ManifestValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<ManifestBucket> for ManifestValue {
    fn from(value: ManifestBucket) -> Self {
        Self::Bucket(value)
    }
}

impl From<ManifestProof> for ManifestValue {
    fn from(value: ManifestProof) -> Self {
        Self::Proof(value)
    }
}

impl From<ManifestAddress> for ManifestValue {
    fn from(value: ManifestAddress) -> Self {
        Self::Address(value)
    }
}

impl From<ManifestExpression> for ManifestValue {
    fn from(value: ManifestExpression) -> Self {
        Self::Expression(value)
    }
}

impl From<NonFungibleLocalId> for ManifestValue {
    fn from(value: NonFungibleLocalId) -> Self {
        Self::NonFungibleLocalId(value)
    }
}

impl From<String> for ManifestValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ManifestValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for ManifestValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for ManifestValue {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<u64> for ManifestValue {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_payload, encode_payload};
    use proptest::prelude::*;
    use txkit_types::EntityType;

    #[test]
    fn unit_is_empty_tuple() {
        assert_eq!(encode_payload(&ManifestValue::unit()).unwrap(), vec![0x4d, 0x21, 0x00]);
    }

    #[test]
    fn typed_and_dynamic_encodings_agree() {
        let typed = encode_payload(&Some(vec![1u16, 2u16])).unwrap();
        let dynamic = ManifestValue::some(ManifestValue::array(
            ValueKind::U16,
            [ManifestValue::U16(1), ManifestValue::U16(2)],
        ));
        assert_eq!(encode_payload(&dynamic).unwrap(), typed);
    }

    #[test]
    fn mismatched_array_element_is_an_encode_error() {
        let value = ManifestValue::array(ValueKind::U8, [ManifestValue::U16(1)]);
        assert_eq!(
            encode_payload(&value),
            Err(EncodeError::MismatchedElementKind {
                expected: ValueKind::U8,
                actual: ValueKind::U16
            })
        );
    }

    #[test]
    fn visitors_collect_nested_references() {
        let account = NodeId::from_parts(EntityType::GlobalAccount, &[1u8; 29]);
        let value = ManifestValue::tuple([
            ManifestValue::Bucket(ManifestBucket(0)),
            ManifestValue::some(ManifestValue::Proof(ManifestProof(3))),
            ManifestValue::array(
                ValueKind::Address,
                [
                    ManifestValue::static_address(account),
                    ManifestValue::Address(ManifestAddress::Named(0)),
                ],
            ),
        ]);
        assert_eq!(value.buckets(), vec![ManifestBucket(0)]);
        assert_eq!(value.proofs(), vec![ManifestProof(3)]);
        assert_eq!(
            value.addresses(),
            vec![ManifestAddress::Static(account), ManifestAddress::Named(0)]
        );
    }

    #[test]
    fn decodes_every_kind() {
        let value = ManifestValue::tuple([
            ManifestValue::Bool(true),
            ManifestValue::I8(-1),
            ManifestValue::I128(-5),
            ManifestValue::U128(u128::MAX),
            ManifestValue::string("hello"),
            ManifestValue::bytes(vec![1, 2, 3]),
            ManifestValue::Map {
                key_kind: ValueKind::String,
                value_kind: ValueKind::Decimal,
                entries: vec![(ManifestValue::string("k"), ManifestValue::Decimal(Decimal::ONE))],
            },
            ManifestValue::Expression(ManifestExpression::EntireAuthZone),
            ManifestValue::Blob(ManifestBlobRef(txkit_types::Hash::of(b"blob"))),
            ManifestValue::NonFungibleLocalId(NonFungibleLocalId::integer(9)),
            ManifestValue::AddressReservation(ManifestAddressReservation(1)),
        ]);
        let bytes = encode_payload(&value).unwrap();
        assert_eq!(decode_payload::<ManifestValue>(&bytes).unwrap(), value);
    }

    #[test]
    fn generic_map_keeps_duplicate_and_unordered_keys() {
        // Map<U8, U8> with entries 2 => 1, 1 => 2, 1 => 3.
        let bytes = vec![
            0x4d, 0x23, 0x07, 0x07, 0x03, 0x02, 0x01, 0x01, 0x02, 0x01, 0x03,
        ];
        let value = decode_payload::<ManifestValue>(&bytes).unwrap();
        assert_eq!(
            value,
            ManifestValue::Map {
                key_kind: ValueKind::U8,
                value_kind: ValueKind::U8,
                entries: vec![
                    (ManifestValue::U8(2), ManifestValue::U8(1)),
                    (ManifestValue::U8(1), ManifestValue::U8(2)),
                    (ManifestValue::U8(1), ManifestValue::U8(3)),
                ],
            }
        );
        assert_eq!(encode_payload(&value).unwrap(), bytes);
        assert!(decode_payload::<std::collections::BTreeMap<u8, u8>>(&bytes).is_err());
    }

    #[test]
    fn truncated_nested_value_fails() {
        let value = ManifestValue::tuple([ManifestValue::string("abc"), ManifestValue::U64(1)]);
        let bytes = encode_payload(&value).unwrap();
        for cut in 1..bytes.len() {
            assert!(
                decode_payload::<ManifestValue>(&bytes[..cut]).is_err(),
                "prefix of {cut} bytes decoded"
            );
        }
    }

    fn leaf() -> impl Strategy<Value = ManifestValue> {
        prop_oneof![
            any::<bool>().prop_map(ManifestValue::Bool),
            any::<i64>().prop_map(ManifestValue::I64),
            any::<u32>().prop_map(ManifestValue::U32),
            "[a-z]{0,12}".prop_map(ManifestValue::String),
            any::<u32>().prop_map(|id| ManifestValue::Bucket(ManifestBucket(id))),
            any::<[u8; 24]>().prop_map(|b| ManifestValue::Decimal(Decimal::from_le_bytes(&b))),
        ]
    }

    fn value() -> impl Strategy<Value = ManifestValue> {
        leaf().prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(ManifestValue::tuple),
                (any::<u8>(), prop::collection::vec(inner, 0..4))
                    .prop_map(|(d, fields)| ManifestValue::enum_variant(d, fields)),
            ]
        })
    }

    proptest! {
        #[test]
        fn payload_roundtrip(value in value()) {
            let bytes = encode_payload(&value).unwrap();
            prop_assert_eq!(decode_payload::<ManifestValue>(&bytes).unwrap(), value);
        }
    }
}
