use thiserror::Error;
use txkit_crypto::SignatureError;
use txkit_manifest::ManifestError;
use txkit_sbor::{DecodeError, EncodeError};
use txkit_types::{NetworkId, PublicKey, TypeError};

use crate::payload::PayloadKind;

/// Errors raised while assembling, encoding, or decoding transactions.
///
/// Assembly stops at the first error; no partially assembled value is
/// returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// The header's epoch window is empty or inverted.
    #[error("invalid epoch window: start {start} must be below end {end}")]
    InvalidEpochWindow { start: u64, end: u64 },

    /// The header and the manifest disagree on the network.
    #[error("header is for network {header}, manifest is for network {manifest}")]
    NetworkMismatch { header: NetworkId, manifest: NetworkId },

    /// The message is structurally invalid.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// A required signatory did not sign the intent.
    #[error("missing signature from {0:?}")]
    MissingSignature(PublicKey),

    /// The same key signed the intent twice, or the notary signed the
    /// intent while also counting as a signatory.
    #[error("duplicate signer {0:?}")]
    DuplicateSigner(PublicKey),

    /// The notary signature was not made by the header's notary key.
    #[error("notary key mismatch: header names {expected:?}, signer is {actual:?}")]
    NotaryMismatch {
        expected: PublicKey,
        actual: PublicKey,
    },

    /// A required part was never supplied to the builder.
    #[error("missing {0}")]
    MissingPart(&'static str),

    /// The payload discriminator is not a known transaction payload.
    #[error("unsupported transaction payload version: {0}")]
    UnsupportedVersion(u8),

    /// The payload is a known transaction payload, but not the one asked for.
    #[error("expected {expected} payload, found {actual}")]
    UnexpectedPayload {
        expected: PayloadKind,
        actual: PayloadKind,
    },

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

pub type Result<T> = std::result::Result<T, TransactionError>;
