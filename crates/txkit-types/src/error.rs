use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid decimal string: {0}")]
    InvalidDecimal(String),

    #[error("decimal has {digits} fractional digits, at most 18 are allowed")]
    DecimalScale { digits: usize },

    #[error("decimal overflows the 192-bit range")]
    DecimalOverflow,

    #[error("unknown entity type byte: 0x{0:02x}")]
    UnknownEntityType(u8),

    #[error("unknown network id: 0x{0:02x}")]
    UnknownNetwork(u8),

    #[error("no network id can be derived from hrp: {0}")]
    UnknownHrp(String),

    #[error("bech32m error: {0}")]
    Bech32(String),

    #[error("hrp mismatch: expected {expected}, got {actual}")]
    HrpMismatch { expected: String, actual: String },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid non-fungible local id: {0}")]
    InvalidNonFungibleLocalId(String),
}
