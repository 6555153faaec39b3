use serde::{Deserialize, Serialize};
use txkit_sbor::{
    expect_kind, Categorize, Decode, DecodeError, Decoder, Encode, EncodeError, Encoder, ValueKind,
};
use txkit_types::{NetworkId, PublicKey};

use crate::error::{Result, TransactionError};

/// Validity window, replay nonce, and notary of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    pub network_id: NetworkId,
    pub start_epoch_inclusive: u64,
    pub end_epoch_exclusive: u64,
    pub nonce: u32,
    pub notary_public_key: PublicKey,
    /// Whether the notary key also counts as an intent signatory.
    pub notary_is_signatory: bool,
    pub tip_percentage: u16,
}

impl TransactionHeader {
    /// The epoch window must contain at least one epoch.
    pub fn validate(&self) -> Result<()> {
        if self.start_epoch_inclusive >= self.end_epoch_exclusive {
            return Err(TransactionError::InvalidEpochWindow {
                start: self.start_epoch_inclusive,
                end: self.end_epoch_exclusive,
            });
        }
        Ok(())
    }

    pub fn epoch_range(&self) -> u64 {
        self.end_epoch_exclusive
            .saturating_sub(self.start_epoch_inclusive)
    }

    pub fn is_valid_at(&self, epoch: u64) -> bool {
        (self.start_epoch_inclusive..self.end_epoch_exclusive).contains(&epoch)
    }
}

impl Categorize for TransactionHeader {
    const VALUE_KIND: ValueKind = ValueKind::Tuple;
}

impl Encode for TransactionHeader {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Tuple
    }

    fn encode_body(&self, encoder: &mut Encoder) -> std::result::Result<(), EncodeError> {
        encoder.nested(|e| {
            e.write_tuple_header(7)?;
            e.encode(&self.network_id)?;
            e.encode(&self.start_epoch_inclusive)?;
            e.encode(&self.end_epoch_exclusive)?;
            e.encode(&self.nonce)?;
            e.encode(&self.notary_public_key)?;
            e.encode(&self.notary_is_signatory)?;
            e.encode(&self.tip_percentage)
        })
    }
}

impl Decode for TransactionHeader {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> std::result::Result<Self, DecodeError> {
        expect_kind(ValueKind::Tuple, kind)?;
        decoder.nested(|d| {
            d.read_tuple_header(7)?;
            Ok(Self {
                network_id: d.decode()?,
                start_epoch_inclusive: d.decode()?,
                end_epoch_exclusive: d.decode()?,
                nonce: d.decode()?,
                notary_public_key: d.decode()?,
                notary_is_signatory: d.decode()?,
                tip_percentage: d.decode()?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txkit_types::Ed25519PublicKey;

    fn header(start: u64, end: u64) -> TransactionHeader {
        TransactionHeader {
            network_id: 1,
            start_epoch_inclusive: start,
            end_epoch_exclusive: end,
            nonce: 7,
            notary_public_key: PublicKey::Ed25519(Ed25519PublicKey([0x11; 32])),
            notary_is_signatory: false,
            tip_percentage: 0,
        }
    }

    #[test]
    fn epoch_window_must_be_non_empty() {
        assert!(header(10, 11).validate().is_ok());
        assert_eq!(
            header(10, 10).validate(),
            Err(TransactionError::InvalidEpochWindow { start: 10, end: 10 })
        );
        assert!(header(11, 10).validate().is_err());
    }

    #[test]
    fn window_is_half_open() {
        let header = header(10, 12);
        assert!(!header.is_valid_at(9));
        assert!(header.is_valid_at(10));
        assert!(header.is_valid_at(11));
        assert!(!header.is_valid_at(12));
        assert_eq!(header.epoch_range(), 2);
    }

    #[test]
    fn field_layout() {
        let mut encoder = Encoder::default();
        encoder.encode(&header(1, 2)).unwrap();
        let bytes = encoder.into_bytes();
        // tuple of 7, then network id as u8
        assert_eq!(&bytes[..4], &[0x21, 0x07, 0x07, 0x01]);
        // nonce follows the two u64 epochs
        assert_eq!(&bytes[22..27], &[0x09, 0x07, 0x00, 0x00, 0x00]);
        // bool then u16 tip close the tuple
        assert_eq!(&bytes[bytes.len() - 5..], &[0x01, 0x00, 0x08, 0x00, 0x00]);
    }
}
