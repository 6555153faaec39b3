use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag byte written in front of every self-describing value.
///
/// Kinds below `0x80` are the basic kinds; the rest are custom kinds for
/// manifest-specific values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ValueKind {
    Bool = 0x01,
    I8 = 0x02,
    I16 = 0x03,
    I32 = 0x04,
    I64 = 0x05,
    I128 = 0x06,
    U8 = 0x07,
    U16 = 0x08,
    U32 = 0x09,
    U64 = 0x0a,
    U128 = 0x0b,
    String = 0x0c,
    Array = 0x20,
    Tuple = 0x21,
    Enum = 0x22,
    Map = 0x23,
    Address = 0x80,
    Bucket = 0x81,
    Proof = 0x82,
    Expression = 0x83,
    Blob = 0x84,
    Decimal = 0x85,
    NonFungibleLocalId = 0x87,
    AddressReservation = 0x88,
}

impl ValueKind {
    const ALL: [ValueKind; 24] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::I128,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::U128,
        Self::String,
        Self::Array,
        Self::Tuple,
        Self::Enum,
        Self::Map,
        Self::Address,
        Self::Bucket,
        Self::Proof,
        Self::Expression,
        Self::Blob,
        Self::Decimal,
        Self::NonFungibleLocalId,
        Self::AddressReservation,
    ];

    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| *kind as u8 == byte)
    }

    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    pub const fn is_custom(self) -> bool {
        self.as_byte() >= 0x80
    }

    /// Kinds that contain further values.
    pub const fn is_compound(self) -> bool {
        matches!(self, Self::Array | Self::Tuple | Self::Enum | Self::Map)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_roundtrip() {
        for kind in ValueKind::ALL {
            assert_eq!(ValueKind::from_byte(kind.as_byte()), Some(kind));
        }
    }

    #[test]
    fn unassigned_bytes_are_unknown() {
        assert_eq!(ValueKind::from_byte(0x00), None);
        assert_eq!(ValueKind::from_byte(0x86), None);
        assert_eq!(ValueKind::from_byte(0xff), None);
    }

    #[test]
    fn custom_and_compound() {
        assert!(ValueKind::Decimal.is_custom());
        assert!(!ValueKind::U128.is_custom());
        assert!(ValueKind::Map.is_compound());
        assert!(!ValueKind::String.is_compound());
    }
}
