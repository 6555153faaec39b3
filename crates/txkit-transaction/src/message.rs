use std::collections::BTreeMap;

use txkit_sbor::{
    expect_kind, Categorize, Decode, DecodeError, Decoder, Encode, EncodeError, Encoder, ValueKind,
};
use txkit_types::{Curve, Ed25519PublicKey, PublicKeyFingerprint, Secp256k1PublicKey};

use crate::error::{Result, TransactionError};

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Optional message attached to an intent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Message {
    #[default]
    None,
    PlainText(PlainTextMessage),
    Encrypted(EncryptedMessage),
}

impl Message {
    /// Plain-text message with a `text/plain` mime type.
    pub fn text(content: impl Into<String>) -> Self {
        Self::PlainText(PlainTextMessage {
            mime_type: "text/plain".into(),
            content: MessageContent::String(content.into()),
        })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Check the message against `limits`.
    pub fn validate(&self, limits: &MessageLimits) -> Result<()> {
        match self {
            Self::None => Ok(()),
            Self::PlainText(message) => message.validate(limits),
            Self::Encrypted(message) => message.validate(limits),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlainTextMessage {
    pub mime_type: String,
    pub content: MessageContent,
}

impl PlainTextMessage {
    fn validate(&self, limits: &MessageLimits) -> Result<()> {
        if self.mime_type.len() > limits.max_mime_type_length {
            return Err(invalid(format!(
                "mime type is {} bytes, limit is {}",
                self.mime_type.len(),
                limits.max_mime_type_length
            )));
        }
        let len = self.content.len();
        if len > limits.max_plaintext_length {
            return Err(invalid(format!(
                "plain-text content is {len} bytes, limit is {}",
                limits.max_plaintext_length
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageContent {
    String(String),
    Bytes(Vec<u8>),
}

impl MessageContent {
    pub fn len(&self) -> usize {
        match self {
            Self::String(s) => s.len(),
            Self::Bytes(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// AES-GCM ciphertext with one wrapped content key per recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedMessage {
    /// Nonce, ciphertext, and tag.
    pub encrypted: Vec<u8>,
    pub decryptors_by_curve: BTreeMap<Curve, DecryptorsByCurve>,
}

impl EncryptedMessage {
    /// AES-GCM nonce plus tag.
    pub const MIN_ENCRYPTED_LENGTH: usize = 12 + 16;

    fn validate(&self, limits: &MessageLimits) -> Result<()> {
        let len = self.encrypted.len();
        if len < Self::MIN_ENCRYPTED_LENGTH {
            return Err(invalid(format!(
                "encrypted payload is {len} bytes, shorter than nonce and tag"
            )));
        }
        if len > limits.max_encrypted_length {
            return Err(invalid(format!(
                "encrypted payload is {len} bytes, limit is {}",
                limits.max_encrypted_length
            )));
        }
        if self.decryptors_by_curve.is_empty() {
            return Err(invalid("encrypted message has no decryptors".into()));
        }

        let mut total = 0;
        for (curve, decryptors) in &self.decryptors_by_curve {
            if decryptors.curve() != *curve {
                return Err(invalid(format!(
                    "{:?} decryptors filed under {curve:?}",
                    decryptors.curve()
                )));
            }
            if decryptors.decryptors().is_empty() {
                return Err(invalid(format!("no {curve:?} decryptors")));
            }
            total += decryptors.decryptors().len();
        }
        if total > limits.max_decryptors {
            return Err(invalid(format!(
                "{total} decryptors, limit is {}",
                limits.max_decryptors
            )));
        }
        Ok(())
    }
}

/// The recipients on one curve: the sender's ephemeral Diffie-Hellman key
/// and each recipient's wrapped content key, by recipient fingerprint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecryptorsByCurve {
    Secp256k1 {
        dh_ephemeral_public_key: Secp256k1PublicKey,
        decryptors: BTreeMap<PublicKeyFingerprint, AesWrappedKey>,
    },
    Ed25519 {
        dh_ephemeral_public_key: Ed25519PublicKey,
        decryptors: BTreeMap<PublicKeyFingerprint, AesWrappedKey>,
    },
}

impl DecryptorsByCurve {
    pub fn curve(&self) -> Curve {
        match self {
            Self::Secp256k1 { .. } => Curve::Secp256k1,
            Self::Ed25519 { .. } => Curve::Ed25519,
        }
    }

    pub fn decryptors(&self) -> &BTreeMap<PublicKeyFingerprint, AesWrappedKey> {
        match self {
            Self::Secp256k1 { decryptors, .. } | Self::Ed25519 { decryptors, .. } => decryptors,
        }
    }

    fn dh_ephemeral_key_bytes(&self) -> &[u8] {
        match self {
            Self::Secp256k1 {
                dh_ephemeral_public_key,
                ..
            } => &dh_ephemeral_public_key.0,
            Self::Ed25519 {
                dh_ephemeral_public_key,
                ..
            } => &dh_ephemeral_public_key.0,
        }
    }
}

/// A 128-bit AES key wrapped with AES-KW.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AesWrappedKey(pub [u8; AesWrappedKey::LENGTH]);

impl AesWrappedKey {
    pub const LENGTH: usize = 24;
}

// ---------------------------------------------------------------------------
// MessageLimits
// ---------------------------------------------------------------------------

/// Size limits a message must respect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageLimits {
    pub max_plaintext_length: usize,
    pub max_encrypted_length: usize,
    pub max_mime_type_length: usize,
    pub max_decryptors: usize,
}

impl Default for MessageLimits {
    fn default() -> Self {
        Self {
            max_plaintext_length: 2048,
            max_encrypted_length: 2048 + EncryptedMessage::MIN_ENCRYPTED_LENGTH,
            max_mime_type_length: 128,
            max_decryptors: 20,
        }
    }
}

fn invalid(reason: String) -> TransactionError {
    TransactionError::InvalidMessage(reason)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn curve_discriminator(curve: Curve) -> u8 {
    match curve {
        Curve::Secp256k1 => 0,
        Curve::Ed25519 => 1,
    }
}

fn curve_from_discriminator(
    discriminator: u8,
    type_name: &'static str,
) -> std::result::Result<Curve, DecodeError> {
    match discriminator {
        0 => Ok(Curve::Secp256k1),
        1 => Ok(Curve::Ed25519),
        discriminator => Err(DecodeError::UnknownDiscriminator {
            type_name,
            discriminator,
        }),
    }
}

fn expect_fields(expected: usize, actual: usize) -> std::result::Result<(), DecodeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(DecodeError::UnexpectedSize { expected, actual })
    }
}

/// Body of a `U8` array, as used for map keys and values.
fn write_bytes_body(encoder: &mut Encoder, bytes: &[u8]) -> std::result::Result<(), EncodeError> {
    encoder.nested(|e| {
        e.write_kind(ValueKind::U8);
        e.write_size(bytes.len())?;
        e.write_slice(bytes);
        Ok(())
    })
}

fn read_byte_array_body<const N: usize>(
    decoder: &mut Decoder<'_>,
) -> std::result::Result<[u8; N], DecodeError> {
    let bytes = decoder.read_bytes_body()?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| DecodeError::UnexpectedSize {
        expected: N,
        actual,
    })
}

impl Categorize for Message {
    const VALUE_KIND: ValueKind = ValueKind::Enum;
}

impl Encode for Message {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Enum
    }

    fn encode_body(&self, encoder: &mut Encoder) -> std::result::Result<(), EncodeError> {
        encoder.nested(|e| match self {
            Self::None => e.write_enum_header(0, 0),
            Self::PlainText(message) => {
                e.write_enum_header(1, 1)?;
                e.write_kind(ValueKind::Tuple);
                e.nested(|e| {
                    e.write_tuple_header(2)?;
                    e.encode(message.mime_type.as_str())?;
                    e.write_kind(ValueKind::Enum);
                    e.nested(|e| match &message.content {
                        MessageContent::String(s) => {
                            e.write_enum_header(0, 1)?;
                            e.encode(s.as_str())
                        }
                        MessageContent::Bytes(b) => {
                            e.write_enum_header(1, 1)?;
                            e.encode_bytes(b)
                        }
                    })
                })
            }
            Self::Encrypted(message) => {
                e.write_enum_header(2, 1)?;
                e.write_kind(ValueKind::Tuple);
                e.nested(|e| {
                    e.write_tuple_header(2)?;
                    e.encode_bytes(&message.encrypted)?;
                    encode_decryptors_by_curve(e, &message.decryptors_by_curve)
                })
            }
        })
    }
}

fn encode_decryptors_by_curve(
    encoder: &mut Encoder,
    map: &BTreeMap<Curve, DecryptorsByCurve>,
) -> std::result::Result<(), EncodeError> {
    encoder.write_kind(ValueKind::Map);
    encoder.nested(|e| {
        e.write_kind(ValueKind::Enum);
        e.write_kind(ValueKind::Enum);
        e.write_size(map.len())?;
        for (curve, decryptors) in map {
            e.nested(|e| e.write_enum_header(curve_discriminator(*curve), 0))?;
            e.nested(|e| {
                e.write_enum_header(curve_discriminator(decryptors.curve()), 2)?;
                e.encode_bytes(decryptors.dh_ephemeral_key_bytes())?;
                e.write_kind(ValueKind::Map);
                e.nested(|e| {
                    e.write_kind(ValueKind::Array);
                    e.write_kind(ValueKind::Array);
                    e.write_size(decryptors.decryptors().len())?;
                    for (fingerprint, key) in decryptors.decryptors() {
                        write_bytes_body(e, fingerprint.as_bytes())?;
                        write_bytes_body(e, &key.0)?;
                    }
                    Ok(())
                })
            })?;
        }
        Ok(())
    })
}

impl Decode for Message {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> std::result::Result<Self, DecodeError> {
        expect_kind(ValueKind::Enum, kind)?;
        decoder.nested(|d| {
            let (discriminator, fields) = d.read_enum_header()?;
            match discriminator {
                0 => {
                    expect_fields(0, fields)?;
                    Ok(Self::None)
                }
                1 => {
                    expect_fields(1, fields)?;
                    d.read_expected_kind(ValueKind::Tuple)?;
                    d.nested(|d| {
                        d.read_tuple_header(2)?;
                        let mime_type = d.decode()?;
                        d.read_expected_kind(ValueKind::Enum)?;
                        let content = d.nested(|d| {
                            let (discriminator, fields) = d.read_enum_header()?;
                            expect_fields(1, fields)?;
                            match discriminator {
                                0 => Ok(MessageContent::String(d.decode()?)),
                                1 => Ok(MessageContent::Bytes(d.decode_bytes()?)),
                                discriminator => Err(DecodeError::UnknownDiscriminator {
                                    type_name: "MessageContent",
                                    discriminator,
                                }),
                            }
                        })?;
                        Ok(Self::PlainText(PlainTextMessage { mime_type, content }))
                    })
                }
                2 => {
                    expect_fields(1, fields)?;
                    d.read_expected_kind(ValueKind::Tuple)?;
                    d.nested(|d| {
                        d.read_tuple_header(2)?;
                        let encrypted = d.decode_bytes()?;
                        let decryptors_by_curve = decode_decryptors_by_curve(d)?;
                        Ok(Self::Encrypted(EncryptedMessage {
                            encrypted,
                            decryptors_by_curve,
                        }))
                    })
                }
                discriminator => Err(DecodeError::UnknownDiscriminator {
                    type_name: "Message",
                    discriminator,
                }),
            }
        })
    }
}

fn decode_decryptors_by_curve(
    decoder: &mut Decoder<'_>,
) -> std::result::Result<BTreeMap<Curve, DecryptorsByCurve>, DecodeError> {
    decoder.read_expected_kind(ValueKind::Map)?;
    decoder.nested(|d| {
        d.read_expected_kind(ValueKind::Enum)?;
        d.read_expected_kind(ValueKind::Enum)?;
        let len = d.read_collection_size(2)?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let curve = d.nested(|d| {
                let (discriminator, fields) = d.read_enum_header()?;
                expect_fields(0, fields)?;
                curve_from_discriminator(discriminator, "Curve")
            })?;
            let decryptors = d.nested(decode_decryptors)?;
            if map.insert(curve, decryptors).is_some() {
                return Err(DecodeError::DuplicateKey);
            }
        }
        Ok(map)
    })
}

fn decode_decryptors(decoder: &mut Decoder<'_>) -> std::result::Result<DecryptorsByCurve, DecodeError> {
    let (discriminator, fields) = decoder.read_enum_header()?;
    let curve = curve_from_discriminator(discriminator, "DecryptorsByCurve")?;
    expect_fields(2, fields)?;
    let key_bytes = decoder.decode_bytes()?;

    decoder.read_expected_kind(ValueKind::Map)?;
    let decryptors = decoder.nested(|d| {
        d.read_expected_kind(ValueKind::Array)?;
        d.read_expected_kind(ValueKind::Array)?;
        let len = d.read_collection_size(2)?;
        let mut decryptors = BTreeMap::new();
        for _ in 0..len {
            let fingerprint = PublicKeyFingerprint(read_byte_array_body(d)?);
            let key = AesWrappedKey(read_byte_array_body(d)?);
            if decryptors.insert(fingerprint, key).is_some() {
                return Err(DecodeError::DuplicateKey);
            }
        }
        Ok(decryptors)
    })?;

    let bad_key = |e: txkit_types::TypeError| DecodeError::InvalidValue(e.to_string());
    Ok(match curve {
        Curve::Secp256k1 => DecryptorsByCurve::Secp256k1 {
            dh_ephemeral_public_key: Secp256k1PublicKey::from_slice(&key_bytes).map_err(bad_key)?,
            decryptors,
        },
        Curve::Ed25519 => DecryptorsByCurve::Ed25519 {
            dh_ephemeral_public_key: Ed25519PublicKey::from_slice(&key_bytes).map_err(bad_key)?,
            decryptors,
        },
    })
}
