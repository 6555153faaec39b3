use txkit_types::Curve;

/// Errors from key handling, signing, and verification.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid key")]
    InvalidKey,
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("curve mismatch: {key:?} key with {signature:?} signature")]
    CurveMismatch { key: Curve, signature: Curve },
    #[error("signing failed")]
    SigningFailed,
}
