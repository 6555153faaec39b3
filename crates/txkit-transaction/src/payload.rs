use std::fmt;

use txkit_sbor::{
    DecodeError, Decoder, DecoderLimits, EncodeError, Encoder, ValueKind, MANIFEST_PAYLOAD_PREFIX,
};

use crate::error::{Result, TransactionError};

/// Top-level transaction payloads, told apart by the discriminator of the
/// enum that follows the payload prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Intent,
    SignedIntent,
    NotarizedTransaction,
}

impl PayloadKind {
    pub const fn discriminator(self) -> u8 {
        match self {
            Self::Intent => 1,
            Self::SignedIntent => 2,
            Self::NotarizedTransaction => 3,
        }
    }

    /// Unknown discriminators are rejected rather than guessed at.
    pub fn from_discriminator(discriminator: u8) -> Result<Self> {
        match discriminator {
            1 => Ok(Self::Intent),
            2 => Ok(Self::SignedIntent),
            3 => Ok(Self::NotarizedTransaction),
            other => Err(TransactionError::UnsupportedVersion(other)),
        }
    }

    /// Which payload `bytes` holds, without decoding the rest.
    pub fn of(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(bytes, DecoderLimits::default())?;
        decoder.read_payload_prefix(MANIFEST_PAYLOAD_PREFIX)?;
        decoder.read_expected_kind(ValueKind::Enum)?;
        Self::from_discriminator(decoder.read_discriminator()?)
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Intent => "intent",
            Self::SignedIntent => "signed intent",
            Self::NotarizedTransaction => "notarized transaction",
        };
        f.write_str(s)
    }
}

/// Write a prefixed payload enum of `kind` whose fields `f` writes.
pub(crate) fn compile_payload<F>(kind: PayloadKind, field_count: usize, f: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut Encoder) -> std::result::Result<(), EncodeError>,
{
    let mut encoder = Encoder::for_payload(MANIFEST_PAYLOAD_PREFIX);
    encoder.write_kind(ValueKind::Enum);
    encoder.nested(|e| {
        e.write_enum_header(kind.discriminator(), field_count)?;
        f(e)
    })?;
    Ok(encoder.into_bytes())
}

/// Read a payload written by [`compile_payload`], requiring it to be of
/// `expected` kind and consuming every byte.
pub(crate) fn decompile_payload<T, F>(
    bytes: &[u8],
    limits: DecoderLimits,
    expected: PayloadKind,
    field_count: usize,
    f: F,
) -> Result<T>
where
    F: FnOnce(&mut Decoder<'_>) -> std::result::Result<T, DecodeError>,
{
    let mut decoder = Decoder::new(bytes, limits)?;
    decoder.read_payload_prefix(MANIFEST_PAYLOAD_PREFIX)?;
    decoder.read_expected_kind(ValueKind::Enum)?;
    let outcome = decoder.nested(|d| {
        let (discriminator, fields) = d.read_enum_header()?;
        let actual = match PayloadKind::from_discriminator(discriminator) {
            Ok(actual) => actual,
            Err(e) => return Ok(Err(e)),
        };
        if actual != expected {
            return Ok(Err(TransactionError::UnexpectedPayload { expected, actual }));
        }
        if fields != field_count {
            return Err(DecodeError::UnexpectedSize {
                expected: field_count,
                actual: fields,
            });
        }
        f(d).map(Ok)
    })?;
    let value = outcome?;
    decoder.check_end()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_kind_is_read_from_the_discriminator() {
        assert_eq!(
            PayloadKind::of(&[0x4d, 0x22, 0x02, 0x02]).unwrap(),
            PayloadKind::SignedIntent
        );
        assert_eq!(
            PayloadKind::of(&[0x4d, 0x22, 0x09]),
            Err(TransactionError::UnsupportedVersion(9))
        );
        assert!(matches!(
            PayloadKind::of(&[0x5c, 0x22, 0x01]),
            Err(TransactionError::Decode(DecodeError::InvalidPrefix { .. }))
        ));
    }

    #[test]
    fn wrong_payload_kind_is_rejected() {
        let bytes = compile_payload(PayloadKind::Intent, 1, |e| e.encode(&7u8)).unwrap();
        assert_eq!(bytes, vec![0x4d, 0x22, 0x01, 0x01, 0x07, 0x07]);

        let read = |d: &mut Decoder<'_>| d.decode::<u8>();
        assert_eq!(
            decompile_payload(&bytes, DecoderLimits::default(), PayloadKind::Intent, 1, read),
            Ok(7)
        );
        assert_eq!(
            decompile_payload(
                &bytes,
                DecoderLimits::default(),
                PayloadKind::NotarizedTransaction,
                1,
                read
            ),
            Err(TransactionError::UnexpectedPayload {
                expected: PayloadKind::NotarizedTransaction,
                actual: PayloadKind::Intent,
            })
        );
    }

    #[test]
    fn truncated_payload_fails() {
        let bytes = compile_payload(PayloadKind::Intent, 1, |e| e.encode(&7u32)).unwrap();
        let read = |d: &mut Decoder<'_>| d.decode::<u32>();
        let err = decompile_payload(
            &bytes[..bytes.len() - 1],
            DecoderLimits::default(),
            PayloadKind::Intent,
            1,
            read,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Decode(DecodeError::Truncated { .. })
        ));
    }
}
