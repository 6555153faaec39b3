use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::codec::Decode;
use crate::error::DecodeError;
use crate::value_kind::ValueKind;
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAYLOAD_SIZE};

/// Resource limits applied while decoding untrusted bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderLimits {
    /// Maximum nesting of arrays, tuples, enums, and maps.
    pub max_depth: usize,
    /// Maximum accepted input length in bytes.
    pub max_payload_size: usize,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}

/// Cursor over an encoded payload.
#[derive(Debug)]
pub struct Decoder<'a> {
    input: &'a [u8],
    offset: usize,
    depth: usize,
    limits: DecoderLimits,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8], limits: DecoderLimits) -> Result<Self, DecodeError> {
        if input.len() > limits.max_payload_size {
            return Err(DecodeError::PayloadTooLarge {
                size: input.len(),
                max: limits.max_payload_size,
            });
        }
        Ok(Self {
            input,
            offset: 0,
            depth: 0,
            limits,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    pub fn read_payload_prefix(&mut self, expected: u8) -> Result<(), DecodeError> {
        let actual = self.read_byte()?;
        if actual != expected {
            return Err(DecodeError::InvalidPrefix { expected, actual });
        }
        Ok(())
    }

    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_slice(1)?[0])
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.input[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    pub fn read_kind(&mut self) -> Result<ValueKind, DecodeError> {
        let byte = self.read_byte()?;
        ValueKind::from_byte(byte).ok_or_else(|| {
            trace!(offset = self.offset - 1, byte, "unknown value kind");
            DecodeError::UnknownValueKind(byte)
        })
    }

    /// Read a kind byte and require it to be `expected`.
    pub fn read_expected_kind(&mut self, expected: ValueKind) -> Result<(), DecodeError> {
        let actual = self.read_kind()?;
        expect_kind(expected, actual)
    }

    pub fn read_discriminator(&mut self) -> Result<u8, DecodeError> {
        self.read_byte()
    }

    /// LEB128 size, at most 4 bytes, minimally encoded.
    pub fn read_size(&mut self) -> Result<usize, DecodeError> {
        let start = self.offset;
        let mut value: usize = 0;
        for i in 0..4 {
            let byte = self.read_byte()?;
            if i > 0 && byte == 0 {
                return Err(DecodeError::NonCanonicalSize { offset: start });
            }
            value |= usize::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::OverlongSize { offset: start })
    }

    /// Size of a collection of `min_element_len`-byte elements, checked
    /// against the bytes left so a bad size cannot trigger a huge allocation.
    pub fn read_collection_size(&mut self, min_element_len: usize) -> Result<usize, DecodeError> {
        let size = self.read_size()?;
        let needed = size.saturating_mul(min_element_len);
        if needed > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: needed - self.remaining(),
            });
        }
        Ok(size)
    }

    pub fn read_tuple_header(&mut self, expected_fields: usize) -> Result<(), DecodeError> {
        let actual = self.read_size()?;
        if actual != expected_fields {
            return Err(DecodeError::UnexpectedSize {
                expected: expected_fields,
                actual,
            });
        }
        Ok(())
    }

    /// Discriminator and field count of an enum body.
    pub fn read_enum_header(&mut self) -> Result<(u8, usize), DecodeError> {
        let discriminator = self.read_discriminator()?;
        let fields = self.read_collection_size(1)?;
        Ok((discriminator, fields))
    }

    /// Read a `U8` array body (element kind, size, bytes).
    pub fn read_bytes_body(&mut self) -> Result<Vec<u8>, DecodeError> {
        self.nested(|d| {
            d.read_expected_kind(ValueKind::U8)?;
            let len = d.read_collection_size(1)?;
            Ok(d.read_slice(len)?.to_vec())
        })
    }

    /// Read a `U8` array with its kind byte.
    pub fn decode_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        self.read_expected_kind(ValueKind::Array)?;
        self.read_bytes_body()
    }

    /// Read a `U8` array of exactly `N` bytes.
    pub fn decode_byte_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.decode_bytes()?;
        let actual = bytes.len();
        bytes.try_into().map_err(|_| DecodeError::UnexpectedSize {
            expected: N,
            actual,
        })
    }

    /// Read a value with its kind byte.
    pub fn decode<T: Decode>(&mut self) -> Result<T, DecodeError> {
        let kind = self.read_kind()?;
        T::decode_body_with_kind(self, kind)
    }

    /// Run `f` one nesting level deeper.
    pub fn nested<T, F>(&mut self, f: F) -> Result<T, DecodeError>
    where
        F: FnOnce(&mut Self) -> Result<T, DecodeError>,
    {
        if self.depth >= self.limits.max_depth {
            return Err(DecodeError::MaxDepthExceeded(self.limits.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Fail unless every input byte has been consumed.
    pub fn check_end(&self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(DecodeError::TrailingBytes { remaining }),
        }
    }
}

/// Compare a decoded kind against the kind a type requires.
pub fn expect_kind(expected: ValueKind, actual: ValueKind) -> Result<(), DecodeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(DecodeError::UnexpectedValueKind { expected, actual })
    }
}
