use crate::codec::Encode;
use crate::error::EncodeError;
use crate::value_kind::ValueKind;
use crate::{DEFAULT_MAX_DEPTH, MAX_SIZE};

/// Append-only writer for the canonical value format.
///
/// Compound values are written inside [`Encoder::nested`], which enforces the
/// depth limit.
#[derive(Debug)]
pub struct Encoder {
    buf: Vec<u8>,
    depth: usize,
    max_depth: usize,
}

impl Encoder {
    pub fn new(max_depth: usize) -> Self {
        Self {
            buf: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Encoder that has already written the payload prefix byte.
    pub fn for_payload(prefix: u8) -> Self {
        let mut encoder = Self::default();
        encoder.write_byte(prefix);
        encoder
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_kind(&mut self, kind: ValueKind) {
        self.write_byte(kind.as_byte());
    }

    pub fn write_discriminator(&mut self, discriminator: u8) {
        self.write_byte(discriminator);
    }

    /// LEB128 size prefix, at most 4 bytes.
    pub fn write_size(&mut self, size: usize) -> Result<(), EncodeError> {
        if size > MAX_SIZE {
            return Err(EncodeError::SizeTooLarge {
                size,
                max: MAX_SIZE,
            });
        }
        let mut value = size;
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value > 0 {
                byte |= 0x80;
            }
            self.buf.push(byte);
            if value == 0 {
                return Ok(());
            }
        }
    }

    /// Field count of a tuple body. The tuple kind byte is written by
    /// [`Encoder::encode`].
    pub fn write_tuple_header(&mut self, field_count: usize) -> Result<(), EncodeError> {
        self.write_size(field_count)
    }

    /// Discriminator and field count of an enum body.
    pub fn write_enum_header(
        &mut self,
        discriminator: u8,
        field_count: usize,
    ) -> Result<(), EncodeError> {
        self.write_discriminator(discriminator);
        self.write_size(field_count)
    }

    /// Write a `U8` array: kind, element kind, size, raw bytes.
    pub fn encode_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.write_kind(ValueKind::Array);
        self.nested(|e| {
            e.write_kind(ValueKind::U8);
            e.write_size(bytes.len())?;
            e.write_slice(bytes);
            Ok(())
        })
    }

    /// Write a value with its kind byte.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.write_kind(value.value_kind());
        value.encode_body(self)
    }

    /// Run `f` one nesting level deeper.
    pub fn nested<F>(&mut self, f: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        if self.depth >= self.max_depth {
            return Err(EncodeError::MaxDepthExceeded(self.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_bytes(size: usize) -> Vec<u8> {
        let mut encoder = Encoder::default();
        encoder.write_size(size).unwrap();
        encoder.into_bytes()
    }

    #[test]
    fn sizes_use_leb128() {
        assert_eq!(size_bytes(0), vec![0x00]);
        assert_eq!(size_bytes(127), vec![0x7f]);
        assert_eq!(size_bytes(128), vec![0x80, 0x01]);
        assert_eq!(size_bytes(300), vec![0xac, 0x02]);
        assert_eq!(size_bytes(MAX_SIZE), vec![0xff, 0xff, 0xff, 0x7f]);
    }

    #[test]
    fn size_above_limit_is_rejected() {
        let mut encoder = Encoder::default();
        assert_eq!(
            encoder.write_size(MAX_SIZE + 1),
            Err(EncodeError::SizeTooLarge {
                size: MAX_SIZE + 1,
                max: MAX_SIZE
            })
        );
    }

    #[test]
    fn nested_enforces_depth() {
        let mut encoder = Encoder::new(2);
        let result = encoder.nested(|e| e.nested(|e| e.nested(|_| Ok(()))));
        assert_eq!(result, Err(EncodeError::MaxDepthExceeded(2)));

        let mut encoder = Encoder::new(2);
        assert!(encoder.nested(|e| e.nested(|_| Ok(()))).is_ok());
    }

    #[test]
    fn byte_arrays() {
        let mut encoder = Encoder::default();
        encoder.encode_bytes(&[0xaa, 0xbb]).unwrap();
        assert_eq!(encoder.into_bytes(), vec![0x20, 0x07, 0x02, 0xaa, 0xbb]);
    }
}
