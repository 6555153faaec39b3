use thiserror::Error;

use crate::value_kind::ValueKind;

/// Errors from encoding a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("maximum nesting depth of {0} exceeded")]
    MaxDepthExceeded(usize),

    #[error("size {size} exceeds the maximum of {max}")]
    SizeTooLarge { size: usize, max: usize },

    #[error("element kind mismatch: container declares {expected}, element is {actual}")]
    MismatchedElementKind {
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Errors from decoding bytes. Every malformed input maps to one of these;
/// a decoder never returns a partially decoded value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input at offset {offset}: {needed} more byte(s) required")]
    Truncated { offset: usize, needed: usize },

    #[error("{remaining} trailing byte(s) after the value")]
    TrailingBytes { remaining: usize },

    #[error("invalid payload prefix: expected 0x{expected:02x}, got 0x{actual:02x}")]
    InvalidPrefix { expected: u8, actual: u8 },

    #[error("payload of {size} bytes exceeds the limit of {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("unknown value kind: 0x{0:02x}")]
    UnknownValueKind(u8),

    #[error("unexpected value kind: expected {expected}, got {actual}")]
    UnexpectedValueKind {
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("size at offset {offset} is longer than 4 bytes or exceeds 0x0fffffff")]
    OverlongSize { offset: usize },

    #[error("size at offset {offset} is not minimally encoded")]
    NonCanonicalSize { offset: usize },

    #[error("unexpected size: expected {expected}, got {actual}")]
    UnexpectedSize { expected: usize, actual: usize },

    #[error("unknown discriminator {discriminator} for {type_name}")]
    UnknownDiscriminator {
        type_name: &'static str,
        discriminator: u8,
    },

    #[error("maximum nesting depth of {0} exceeded")]
    MaxDepthExceeded(usize),

    #[error("invalid bool byte: 0x{0:02x}")]
    InvalidBool(u8),

    #[error("string is not valid utf-8")]
    InvalidUtf8,

    #[error("duplicate map key")]
    DuplicateKey,

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl DecodeError {
    /// Whether this error reports an unrecognized variant or kind rather than
    /// structurally malformed bytes.
    pub fn is_unsupported_variant(&self) -> bool {
        matches!(
            self,
            Self::UnknownDiscriminator { .. } | Self::UnknownValueKind(_)
        )
    }
}
