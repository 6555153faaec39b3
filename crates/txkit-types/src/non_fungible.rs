use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Local id of a non-fungible unit within its resource.
///
/// String form: `<name>`, `#123#`, `[c0ffee]`, or
/// `{0000000000000000-0000000000000000-0000000000000000-0000000000000000}`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NonFungibleLocalId {
    String(String),
    Integer(u64),
    Bytes(Vec<u8>),
    Ruid([u8; 32]),
}

impl NonFungibleLocalId {
    pub const MAX_LENGTH: usize = 64;

    /// String id: 1 to 64 characters from `[A-Za-z0-9_]`.
    pub fn string(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        Self::check_string(&value)?;
        Ok(Self::String(value))
    }

    pub fn integer(value: u64) -> Self {
        Self::Integer(value)
    }

    /// Byte id: 1 to 64 bytes.
    pub fn bytes(value: impl Into<Vec<u8>>) -> Result<Self, TypeError> {
        let value = value.into();
        Self::check_bytes(&value)?;
        Ok(Self::Bytes(value))
    }

    pub fn ruid(value: [u8; 32]) -> Self {
        Self::Ruid(value)
    }

    /// Re-check the length and alphabet rules, e.g. after decoding.
    pub fn validate(&self) -> Result<(), TypeError> {
        match self {
            Self::String(value) => Self::check_string(value),
            Self::Bytes(value) => Self::check_bytes(value),
            Self::Integer(_) | Self::Ruid(_) => Ok(()),
        }
    }

    fn check_string(value: &str) -> Result<(), TypeError> {
        if value.is_empty() || value.len() > Self::MAX_LENGTH {
            return Err(TypeError::InvalidNonFungibleLocalId(format!(
                "string id must be 1..={} characters",
                Self::MAX_LENGTH
            )));
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(TypeError::InvalidNonFungibleLocalId(format!(
                "invalid character {c:?} in string id"
            )));
        }
        Ok(())
    }

    fn check_bytes(value: &[u8]) -> Result<(), TypeError> {
        if value.is_empty() || value.len() > Self::MAX_LENGTH {
            return Err(TypeError::InvalidNonFungibleLocalId(format!(
                "byte id must be 1..={} bytes",
                Self::MAX_LENGTH
            )));
        }
        Ok(())
    }
}

impl fmt::Display for NonFungibleLocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "<{value}>"),
            Self::Integer(value) => write!(f, "#{value}#"),
            Self::Bytes(value) => write!(f, "[{}]", hex::encode(value)),
            Self::Ruid(value) => {
                let hex = hex::encode(value);
                write!(
                    f,
                    "{{{}-{}-{}-{}}}",
                    &hex[0..16],
                    &hex[16..32],
                    &hex[32..48],
                    &hex[48..64]
                )
            }
        }
    }
}

impl fmt::Debug for NonFungibleLocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NonFungibleLocalId({self})")
    }
}

impl FromStr for NonFungibleLocalId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidNonFungibleLocalId(s.to_string());
        if let Some(inner) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            Self::string(inner)
        } else if let Some(inner) = s.strip_prefix('#').and_then(|r| r.strip_suffix('#')) {
            inner.parse::<u64>().map(Self::Integer).map_err(|_| invalid())
        } else if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            let bytes = hex::decode(inner).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
            Self::bytes(bytes)
        } else if let Some(inner) = s.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            let parts: Vec<&str> = inner.split('-').collect();
            if parts.len() != 4 || parts.iter().any(|p| p.len() != 16) {
                return Err(invalid());
            }
            let bytes = hex::decode(parts.concat()).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
            let ruid: [u8; 32] = bytes.try_into().map_err(|_| invalid())?;
            Ok(Self::Ruid(ruid))
        } else {
            Err(invalid())
        }
    }
}

impl Serialize for NonFungibleLocalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NonFungibleLocalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
