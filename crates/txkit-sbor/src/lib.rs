//! Canonical binary value encoding for manifests and transactions.
//!
//! Every encoded value is a kind byte followed by a kind-specific body.
//! Top-level payloads carry a one-byte prefix. Sizes are LEB128 and capped
//! at [`MAX_SIZE`]; decoding rejects any non-canonical form, so a value has
//! exactly one encoding.
//!
//! # Key Types
//!
//! - [`ValueKind`]: The kind byte registry, including manifest custom kinds
//! - [`Encoder`] / [`Decoder`]: Low-level writer and bounds-checked cursor
//! - [`Encode`] / [`Decode`] / [`Categorize`]: Traits implemented by every
//!   encodable type
//! - [`ManifestValue`]: Self-describing value tree for untyped arguments
//! - [`ManifestBucket`], [`ManifestProof`], [`ManifestAddress`]: Manifest
//!   custom values

pub mod codec;
pub mod custom;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod value;
pub mod value_kind;

pub use codec::{Categorize, Decode, Encode};
pub use custom::{
    ManifestAddress, ManifestAddressReservation, ManifestBlobRef, ManifestBucket,
    ManifestExpression, ManifestProof,
};
pub use decoder::{expect_kind, Decoder, DecoderLimits};
pub use encoder::Encoder;
pub use error::{DecodeError, EncodeError};
pub use value::ManifestValue;
pub use value_kind::ValueKind;

/// Prefix byte of every manifest-family payload.
pub const MANIFEST_PAYLOAD_PREFIX: u8 = 0x4d;

/// Default nesting limit for compound values.
pub const DEFAULT_MAX_DEPTH: usize = 24;

/// Default upper bound on accepted payload length (1 MiB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1_048_576;

/// Largest size a length prefix may carry.
pub const MAX_SIZE: usize = 0x0FFF_FFFF;

/// Encode `value` as a prefixed payload.
pub fn encode_payload<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = Encoder::for_payload(MANIFEST_PAYLOAD_PREFIX);
    encoder.encode(value)?;
    Ok(encoder.into_bytes())
}

/// Decode a prefixed payload with default limits.
pub fn decode_payload<T: Decode>(bytes: &[u8]) -> Result<T, DecodeError> {
    decode_payload_with_limits(bytes, DecoderLimits::default())
}

/// Decode a prefixed payload, requiring every byte to be consumed.
pub fn decode_payload_with_limits<T: Decode>(
    bytes: &[u8],
    limits: DecoderLimits,
) -> Result<T, DecodeError> {
    let mut decoder = Decoder::new(bytes, limits)?;
    decoder.read_payload_prefix(MANIFEST_PAYLOAD_PREFIX)?;
    let value = decoder.decode()?;
    decoder.check_end()?;
    Ok(value)
}
