use std::collections::BTreeMap;

use crate::decoder::{expect_kind, Decoder};
use crate::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};
use crate::value_kind::ValueKind;

/// Types whose value kind is fixed, so they can be array elements or map
/// keys/values.
pub trait Categorize {
    const VALUE_KIND: ValueKind;
}

/// A value that can be written in the canonical format.
pub trait Encode {
    /// Kind byte written in front of the body.
    fn value_kind(&self) -> ValueKind;

    /// Write the body, without the kind byte.
    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError>;
}

/// A value that can be read from the canonical format.
pub trait Decode: Sized {
    /// Read the body of a value whose kind byte was already consumed.
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError>;
}

macro_rules! impl_integer {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(
            impl Categorize for $t {
                const VALUE_KIND: ValueKind = ValueKind::$kind;
            }

            impl Encode for $t {
                fn value_kind(&self) -> ValueKind {
                    ValueKind::$kind
                }

                fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
                    encoder.write_slice(&self.to_le_bytes());
                    Ok(())
                }
            }

            impl Decode for $t {
                fn decode_body_with_kind(
                    decoder: &mut Decoder<'_>,
                    kind: ValueKind,
                ) -> Result<Self, DecodeError> {
                    expect_kind(ValueKind::$kind, kind)?;
                    Ok(<$t>::from_le_bytes(decoder.read_array()?))
                }
            }
        )*
    };
}

impl_integer! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
}

impl Categorize for bool {
    const VALUE_KIND: ValueKind = ValueKind::Bool;
}

impl Encode for bool {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encoder.write_byte(u8::from(*self));
        Ok(())
    }
}

impl Decode for bool {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError> {
        expect_kind(ValueKind::Bool, kind)?;
        match decoder.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other)),
        }
    }
}

impl Categorize for str {
    const VALUE_KIND: ValueKind = ValueKind::String;
}

impl Encode for str {
    fn value_kind(&self) -> ValueKind {
        ValueKind::String
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encoder.write_size(self.len())?;
        encoder.write_slice(self.as_bytes());
        Ok(())
    }
}

impl Categorize for String {
    const VALUE_KIND: ValueKind = ValueKind::String;
}

impl Encode for String {
    fn value_kind(&self) -> ValueKind {
        ValueKind::String
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        self.as_str().encode_body(encoder)
    }
}

impl Decode for String {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError> {
        expect_kind(ValueKind::String, kind)?;
        let len = decoder.read_collection_size(1)?;
        let bytes = decoder.read_slice(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| DecodeError::InvalidUtf8)
    }
}

impl<T: Categorize + Encode> Categorize for [T] {
    const VALUE_KIND: ValueKind = ValueKind::Array;
}

impl<T: Categorize + Encode> Encode for [T] {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Array
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encoder.nested(|e| {
            e.write_kind(T::VALUE_KIND);
            e.write_size(self.len())?;
            for element in self {
                element.encode_body(e)?;
            }
            Ok(())
        })
    }
}

impl<T: Categorize + Encode> Categorize for Vec<T> {
    const VALUE_KIND: ValueKind = ValueKind::Array;
}

impl<T: Categorize + Encode> Encode for Vec<T> {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Array
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        self.as_slice().encode_body(encoder)
    }
}

impl<T: Categorize + Decode> Decode for Vec<T> {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError> {
        expect_kind(ValueKind::Array, kind)?;
        decoder.nested(|d| {
            let element_kind = d.read_kind()?;
            expect_kind(T::VALUE_KIND, element_kind)?;
            let len = d.read_collection_size(1)?;
            let mut elements = Vec::with_capacity(len);
            for _ in 0..len {
                elements.push(T::decode_body_with_kind(d, element_kind)?);
            }
            Ok(elements)
        })
    }
}

impl<T> Categorize for Option<T> {
    const VALUE_KIND: ValueKind = ValueKind::Enum;
}

impl<T: Encode> Encode for Option<T> {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Enum
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encoder.nested(|e| match self {
            None => e.write_enum_header(0, 0),
            Some(value) => {
                e.write_enum_header(1, 1)?;
                e.encode(value)
            }
        })
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError> {
        expect_kind(ValueKind::Enum, kind)?;
        decoder.nested(|d| match d.read_enum_header()? {
            (0, 0) => Ok(None),
            (1, 1) => Ok(Some(d.decode()?)),
            (0, actual) => Err(DecodeError::UnexpectedSize {
                expected: 0,
                actual,
            }),
            (1, actual) => Err(DecodeError::UnexpectedSize {
                expected: 1,
                actual,
            }),
            (discriminator, _) => Err(DecodeError::UnknownDiscriminator {
                type_name: "Option",
                discriminator,
            }),
        })
    }
}

impl<K, V> Categorize for BTreeMap<K, V> {
    const VALUE_KIND: ValueKind = ValueKind::Map;
}

impl<K, V> Encode for BTreeMap<K, V>
where
    K: Categorize + Encode,
    V: Categorize + Encode,
{
    fn value_kind(&self) -> ValueKind {
        ValueKind::Map
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encoder.nested(|e| {
            e.write_kind(K::VALUE_KIND);
            e.write_kind(V::VALUE_KIND);
            e.write_size(self.len())?;
            for (key, value) in self {
                key.encode_body(e)?;
                value.encode_body(e)?;
            }
            Ok(())
        })
    }
}

impl<K, V> Decode for BTreeMap<K, V>
where
    K: Categorize + Decode + Ord,
    V: Categorize + Decode,
{
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError> {
        expect_kind(ValueKind::Map, kind)?;
        decoder.nested(|d| {
            let key_kind = d.read_kind()?;
            expect_kind(K::VALUE_KIND, key_kind)?;
            let value_kind = d.read_kind()?;
            expect_kind(V::VALUE_KIND, value_kind)?;
            let len = d.read_collection_size(2)?;
            let mut map = BTreeMap::new();
            for _ in 0..len {
                let key = K::decode_body_with_kind(d, key_kind)?;
                let value = V::decode_body_with_kind(d, value_kind)?;
                // Entries must arrive in the order the encoder writes them.
                if let Some((last, _)) = map.last_key_value() {
                    if key == *last {
                        return Err(DecodeError::DuplicateKey);
                    }
                    if key < *last {
                        return Err(DecodeError::InvalidValue(
                            "map keys are not in canonical order".into(),
                        ));
                    }
                }
                map.insert(key, value);
            }
            Ok(map)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_payload, encode_payload, DecoderLimits};

    fn body_bytes<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
        let mut encoder = Encoder::default();
        encoder.encode(value).unwrap();
        encoder.into_bytes()
    }

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(body_bytes(&0x1234u16), vec![0x08, 0x34, 0x12]);
        assert_eq!(body_bytes(&-1i32), vec![0x04, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(body_bytes(&7u8), vec![0x07, 0x07]);
    }

    #[test]
    fn strings_are_size_prefixed() {
        assert_eq!(
            body_bytes("free"),
            vec![0x0c, 0x04, b'f', b'r', b'e', b'e']
        );
    }

    #[test]
    fn vectors_carry_element_kind() {
        assert_eq!(
            body_bytes(&vec![1u32, 2u32]),
            vec![0x20, 0x09, 0x02, 1, 0, 0, 0, 2, 0, 0, 0]
        );
        assert_eq!(body_bytes(&Vec::<u8>::new()), vec![0x20, 0x07, 0x00]);
    }

    #[test]
    fn options_are_enums() {
        assert_eq!(body_bytes(&None::<u8>), vec![0x22, 0x00, 0x00]);
        assert_eq!(body_bytes(&Some(5u8)), vec![0x22, 0x01, 0x01, 0x07, 0x05]);
    }

    #[test]
    fn payload_roundtrip_for_nested_types() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), vec![Some(1u64), None]);
        map.insert("a".to_string(), vec![]);
        let bytes = encode_payload(&map).unwrap();
        let decoded: BTreeMap<String, Vec<Option<u64>>> = decode_payload(&bytes).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn decode_rejects_wrong_kind() {
        let bytes = encode_payload(&5u32).unwrap();
        assert_eq!(
            decode_payload::<u64>(&bytes),
            Err(DecodeError::UnexpectedValueKind {
                expected: ValueKind::U64,
                actual: ValueKind::U32
            })
        );
    }

    #[test]
    fn decode_rejects_invalid_bool_and_utf8() {
        assert_eq!(
            decode_payload::<bool>(&[0x4d, 0x01, 0x02]),
            Err(DecodeError::InvalidBool(2))
        );
        assert_eq!(
            decode_payload::<String>(&[0x4d, 0x0c, 0x01, 0xff]),
            Err(DecodeError::InvalidUtf8)
        );
    }

    #[test]
    fn decode_rejects_unknown_option_variant() {
        assert_eq!(
            decode_payload::<Option<u8>>(&[0x4d, 0x22, 0x02, 0x00]),
            Err(DecodeError::UnknownDiscriminator {
                type_name: "Option",
                discriminator: 2
            })
        );
    }

    #[test]
    fn decode_rejects_unordered_or_duplicate_map_keys() {
        // Map<U8, U8> with keys 2, 1
        let unordered = [0x4d, 0x23, 0x07, 0x07, 0x02, 0x02, 0x00, 0x01, 0x00];
        assert!(matches!(
            decode_payload::<BTreeMap<u8, u8>>(&unordered),
            Err(DecodeError::InvalidValue(_))
        ));
        let duplicate = [0x4d, 0x23, 0x07, 0x07, 0x02, 0x01, 0x00, 0x01, 0x00];
        assert_eq!(
            decode_payload::<BTreeMap<u8, u8>>(&duplicate),
            Err(DecodeError::DuplicateKey)
        );
    }

    #[test]
    fn array_one_element_short_is_truncated() {
        // Declares three u32 elements but carries two.
        let bytes = [0x4d, 0x20, 0x09, 0x03, 1, 0, 0, 0, 2, 0, 0, 0];
        assert!(matches!(
            decode_payload::<Vec<u32>>(&bytes),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn depth_limit_applies_to_decoding() {
        let value = Some(Some(Some(1u8)));
        let bytes = encode_payload(&value).unwrap();
        let limits = DecoderLimits {
            max_depth: 2,
            ..DecoderLimits::default()
        };
        assert_eq!(
            crate::decode_payload_with_limits::<Option<Option<Option<u8>>>>(&bytes, limits),
            Err(DecodeError::MaxDepthExceeded(2))
        );
    }
}
