use tracing::debug;
use txkit_crypto::ContentHasher;
use txkit_manifest::{Instruction, Manifest};
use txkit_sbor::{DecodeError, Decoder, DecoderLimits, EncodeError, Encoder, ValueKind};
use txkit_types::NetworkId;

use crate::error::{Result, TransactionError};
use crate::hash::IntentHash;
use crate::header::TransactionHeader;
use crate::message::{Message, MessageLimits};
use crate::payload::{compile_payload, decompile_payload, PayloadKind};

/// Number of fields in an encoded intent.
pub(crate) const INTENT_FIELDS: usize = 4;

/// Header, manifest, and message: the unit signatories sign.
///
/// An intent is checked and compiled once, at construction. Identical
/// inputs give identical bytes and therefore the same hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Intent {
    header: TransactionHeader,
    manifest: Manifest,
    message: Message,
    compiled: Vec<u8>,
    hash: IntentHash,
}

impl Intent {
    /// Check the parts and compile them.
    ///
    /// Fails when the epoch window is empty, when the header and the
    /// manifest are for different networks, when the manifest references
    /// something it never declared, or when the message breaks the default
    /// [`MessageLimits`].
    pub fn new(header: TransactionHeader, manifest: Manifest, message: Message) -> Result<Self> {
        Self::with_message_limits(header, manifest, message, &MessageLimits::default())
    }

    pub fn with_message_limits(
        header: TransactionHeader,
        manifest: Manifest,
        message: Message,
        limits: &MessageLimits,
    ) -> Result<Self> {
        header.validate()?;
        if header.network_id != manifest.network_id() {
            return Err(TransactionError::NetworkMismatch {
                header: header.network_id,
                manifest: manifest.network_id(),
            });
        }
        manifest.validate()?;
        message.validate(limits)?;

        let compiled = compile_payload(PayloadKind::Intent, INTENT_FIELDS, |e| {
            encode_intent_fields(e, &header, &manifest, &message)
        })?;
        let hash = IntentHash(ContentHasher::INTENT.hash(&compiled));
        debug!(
            network_id = header.network_id,
            instructions = manifest.len(),
            bytes = compiled.len(),
            hash = %hash.0.short_hex(),
            "compiled intent"
        );
        Ok(Self {
            header,
            manifest,
            message,
            compiled,
            hash,
        })
    }

    pub fn header(&self) -> &TransactionHeader {
        &self.header
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn network_id(&self) -> NetworkId {
        self.header.network_id
    }

    /// The transaction id.
    pub fn hash(&self) -> IntentHash {
        self.hash
    }

    /// Canonical bytes of the intent payload.
    pub fn compile(&self) -> Vec<u8> {
        self.compiled.clone()
    }

    pub fn compiled(&self) -> &[u8] {
        &self.compiled
    }

    pub fn decompile(bytes: &[u8]) -> Result<Self> {
        Self::decompile_with_limits(bytes, DecoderLimits::default())
    }

    /// Decode an intent payload and run the [`Intent::new`] checks on it.
    pub fn decompile_with_limits(bytes: &[u8], limits: DecoderLimits) -> Result<Self> {
        decompile_payload(
            bytes,
            limits,
            PayloadKind::Intent,
            INTENT_FIELDS,
            IntentParts::decode_fields,
        )?
        .into_intent()
    }

    /// Write the four intent fields, without an enclosing header.
    pub(crate) fn encode_fields(&self, encoder: &mut Encoder) -> std::result::Result<(), EncodeError> {
        encode_intent_fields(encoder, &self.header, &self.manifest, &self.message)
    }

    /// Write the intent as a four-field tuple.
    pub(crate) fn encode_tuple(&self, encoder: &mut Encoder) -> std::result::Result<(), EncodeError> {
        encoder.write_kind(ValueKind::Tuple);
        encoder.nested(|e| {
            e.write_tuple_header(INTENT_FIELDS)?;
            self.encode_fields(e)
        })
    }
}

fn encode_intent_fields(
    encoder: &mut Encoder,
    header: &TransactionHeader,
    manifest: &Manifest,
    message: &Message,
) -> std::result::Result<(), EncodeError> {
    encoder.encode(header)?;
    manifest.encode_parts(encoder)?;
    encoder.encode(message)
}

/// Decoded but unchecked intent fields.
#[derive(Debug)]
pub(crate) struct IntentParts {
    header: TransactionHeader,
    instructions: Vec<Instruction>,
    blobs: Vec<Vec<u8>>,
    message: Message,
}

impl IntentParts {
    pub(crate) fn decode_fields(decoder: &mut Decoder<'_>) -> std::result::Result<Self, DecodeError> {
        let header = decoder.decode()?;
        let (instructions, blobs) = Manifest::decode_parts(decoder)?;
        let message = decoder.decode()?;
        Ok(Self {
            header,
            instructions,
            blobs,
            message,
        })
    }

    /// Read the four-field tuple [`Intent::encode_tuple`] writes.
    pub(crate) fn decode_tuple(decoder: &mut Decoder<'_>) -> std::result::Result<Self, DecodeError> {
        decoder.read_expected_kind(ValueKind::Tuple)?;
        decoder.nested(|d| {
            d.read_tuple_header(INTENT_FIELDS)?;
            Self::decode_fields(d)
        })
    }

    /// The manifest takes the header's network, which is the only network
    /// the encoded form records.
    pub(crate) fn into_intent(self) -> Result<Intent> {
        let manifest = Manifest::new(self.instructions, self.blobs, self.header.network_id)?;
        Intent::new(self.header, manifest, self.message)
    }
}
