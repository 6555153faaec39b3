use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entity::EntityType;
use crate::error::TypeError;

/// Raw 30-byte entity identifier. The first byte is the [`EntityType`].
///
/// A `NodeId` is network-agnostic; pair it with a network id through
/// [`Address`](crate::Address) to get a printable address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId([u8; NodeId::LENGTH]);

impl NodeId {
    pub const LENGTH: usize = 30;

    /// Wrap raw bytes without checking the entity byte.
    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, checking the length and the entity byte.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; Self::LENGTH] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: Self::LENGTH,
            actual: bytes.len(),
        })?;
        EntityType::from_byte(arr[0])?;
        Ok(Self(arr))
    }

    /// Compose an id from an entity byte and a 29-byte body.
    pub fn from_parts(entity_type: EntityType, body: &[u8; Self::LENGTH - 1]) -> Self {
        let mut arr = [0u8; Self::LENGTH];
        arr[0] = entity_type.as_byte();
        arr[1..].copy_from_slice(body);
        Self(arr)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    pub fn entity_type(&self) -> Option<EntityType> {
        EntityType::from_byte(self.0[0]).ok()
    }

    pub fn is_global(&self) -> bool {
        self.entity_type().is_some_and(EntityType::is_global)
    }

    pub fn is_internal(&self) -> bool {
        self.entity_type().is_some_and(EntityType::is_internal)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.to_hex())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_checks_entity_byte() {
        let mut bytes = [0u8; 30];
        bytes[0] = 0xc1;
        let id = NodeId::from_slice(&bytes).unwrap();
        assert_eq!(id.entity_type(), Some(EntityType::GlobalAccount));

        bytes[0] = 0x01;
        assert_eq!(
            NodeId::from_slice(&bytes),
            Err(TypeError::UnknownEntityType(0x01))
        );
    }

    #[test]
    fn from_slice_checks_length() {
        assert_eq!(
            NodeId::from_slice(&[0xc1; 29]),
            Err(TypeError::InvalidLength {
                expected: 30,
                actual: 29
            })
        );
    }

    #[test]
    fn from_parts_places_entity_byte_first() {
        let id = NodeId::from_parts(EntityType::InternalFungibleVault, &[7u8; 29]);
        assert_eq!(id.as_bytes()[0], 0x58);
        assert!(id.is_internal());
        assert!(!id.is_global());
    }

    #[test]
    fn hex_roundtrip() {
        let id = NodeId::from_parts(EntityType::GlobalPackage, &[3u8; 29]);
        assert_eq!(NodeId::from_hex(&id.to_hex()).unwrap(), id);
    }
}
