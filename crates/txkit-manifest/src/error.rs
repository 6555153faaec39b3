//! Error types for manifest building, encoding, and validation.

use std::fmt;

use thiserror::Error;
use txkit_sbor::{DecodeError, EncodeError};
use txkit_types::{Hash, NetworkId, TypeError};

/// The kinds of builder-local names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NameKind {
    Bucket,
    Proof,
    AddressReservation,
    NamedAddress,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bucket => "bucket",
            Self::Proof => "proof",
            Self::AddressReservation => "address reservation",
            Self::NamedAddress => "named address",
        };
        f.write_str(s)
    }
}

/// Errors raised while building a manifest.
///
/// A builder step that fails produces no builder; nothing of the partial
/// chain is usable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// The name does not satisfy the naming rules.
    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        kind: NameKind,
        name: String,
        reason: String,
    },

    /// A name was declared twice.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: NameKind, name: String },

    /// A name was used before being declared.
    #[error("unknown {kind} name: {name}")]
    UnknownName { kind: NameKind, name: String },

    /// A bucket, proof, or reservation was used after being consumed.
    #[error("{kind} {name} has already been consumed")]
    NameConsumed { kind: NameKind, name: String },

    /// An argument references an id the builder never handed out.
    #[error("unknown {kind} id: {id}")]
    UnknownId { kind: NameKind, id: u32 },

    /// An argument references an id whose value was already consumed.
    #[error("{kind} id {id} has already been consumed")]
    IdConsumed { kind: NameKind, id: u32 },

    /// An argument references a blob that was never added.
    #[error("unknown blob: {0}")]
    UnknownBlob(Hash),

    /// The address has the wrong entity type for this instruction.
    #[error("address {address} is not a {expected}")]
    UnexpectedEntity {
        address: String,
        expected: &'static str,
    },

    /// An address belongs to a network other than the build target.
    #[error("address {address} is on network {actual}, manifest is for network {expected}")]
    NetworkMismatch {
        address: String,
        expected: NetworkId,
        actual: NetworkId,
    },

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Errors raised by manifest encoding, decoding, and structural validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Type(#[from] TypeError),

    /// An instruction references a bucket, proof, reservation, or named
    /// address that is not live at that point.
    #[error("instruction {index}: invalid {kind} reference {id}")]
    InvalidReference {
        index: usize,
        kind: NameKind,
        id: u32,
    },

    /// An instruction references a blob the manifest does not carry.
    #[error("instruction {index}: unknown blob {hash}")]
    UnknownBlob { index: usize, hash: Hash },

    /// An assertion was to be inserted past the end of the instruction list.
    #[error("cannot insert assertion at {index}, manifest has {length} instructions")]
    AssertionIndexOutOfBounds { index: usize, length: usize },

    /// A call's arguments do not have the shape its method expects.
    #[error("instruction {index}: invalid arguments for {method_name}")]
    InvalidArguments { index: usize, method_name: String },

    /// The address has the wrong entity type for this modification.
    #[error("address {address} is not a {expected}")]
    UnexpectedEntity {
        address: String,
        expected: &'static str,
    },

    /// An address belongs to a network other than the manifest's.
    #[error("address {address} is on network {actual}, manifest is for network {expected}")]
    NetworkMismatch {
        address: String,
        expected: NetworkId,
        actual: NetworkId,
    },
}

/// Convenience type alias for builder operations.
pub type BuilderResult<T> = std::result::Result<T, BuilderError>;

/// Convenience type alias for manifest operations.
pub type Result<T> = std::result::Result<T, ManifestError>;
