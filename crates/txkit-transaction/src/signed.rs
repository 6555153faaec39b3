use std::collections::BTreeSet;

use tracing::debug;
use txkit_crypto::{ContentHasher, SignatureWithPublicKey};
use txkit_sbor::{DecodeError, Decoder, DecoderLimits, EncodeError, Encoder, ValueKind};
use txkit_types::PublicKey;

use crate::error::{Result, TransactionError};
use crate::hash::{IntentHash, SignedIntentHash};
use crate::intent::{Intent, IntentParts};
use crate::payload::{compile_payload, decompile_payload, PayloadKind};

pub(crate) const SIGNED_INTENT_FIELDS: usize = 2;

/// An intent with the signatures of its signatories, in signing order.
///
/// Signature order is part of the compiled form, so the same signatures in a
/// different order give a different signed-intent hash. The intent hash does
/// not depend on the signatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedIntent {
    intent: Intent,
    signatures: Vec<SignatureWithPublicKey>,
    compiled: Vec<u8>,
    hash: SignedIntentHash,
}

impl SignedIntent {
    /// Attach `signatures` to `intent`.
    ///
    /// Every signature must verify against the intent hash, and no key may
    /// sign twice.
    pub fn new(intent: Intent, signatures: Vec<SignatureWithPublicKey>) -> Result<Self> {
        verify_signatures(&intent.hash(), &signatures)?;
        Self::assemble(intent, signatures)
    }

    /// Attach signatures without checking them. Used for decoded payloads,
    /// whose signatures are checked by the validator instead.
    fn assemble(intent: Intent, signatures: Vec<SignatureWithPublicKey>) -> Result<Self> {
        let compiled = compile_payload(PayloadKind::SignedIntent, SIGNED_INTENT_FIELDS, |e| {
            encode_signed_fields(e, &intent, &signatures)
        })?;
        let hash = SignedIntentHash(ContentHasher::SIGNED_INTENT.hash(&compiled));
        debug!(
            intent_hash = %intent.hash().0.short_hex(),
            signatures = signatures.len(),
            hash = %hash.0.short_hex(),
            "compiled signed intent"
        );
        Ok(Self {
            intent,
            signatures,
            compiled,
            hash,
        })
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn signatures(&self) -> &[SignatureWithPublicKey] {
        &self.signatures
    }

    pub fn intent_hash(&self) -> IntentHash {
        self.intent.hash()
    }

    /// What the notary signs.
    pub fn hash(&self) -> SignedIntentHash {
        self.hash
    }

    pub fn compile(&self) -> Vec<u8> {
        self.compiled.clone()
    }

    pub fn compiled(&self) -> &[u8] {
        &self.compiled
    }

    /// Keys of the signatories, in signing order.
    pub fn signer_keys(&self) -> Result<Vec<PublicKey>> {
        let message = self.intent.hash().0;
        self.signatures
            .iter()
            .map(|signature| signature.verify(&message).map_err(TransactionError::from))
            .collect()
    }

    pub fn decompile(bytes: &[u8]) -> Result<Self> {
        Self::decompile_with_limits(bytes, DecoderLimits::default())
    }

    /// Decode a signed intent payload.
    ///
    /// The intent is checked as in [`Intent::new`]; the signatures are only
    /// decoded. Use [`crate::TransactionValidator`] to verify them.
    pub fn decompile_with_limits(bytes: &[u8], limits: DecoderLimits) -> Result<Self> {
        let parts = decompile_payload(
            bytes,
            limits,
            PayloadKind::SignedIntent,
            SIGNED_INTENT_FIELDS,
            SignedIntentParts::decode_fields,
        )?;
        parts.into_signed_intent()
    }

    /// Write the signed intent as a two-field tuple.
    pub(crate) fn encode_tuple(&self, encoder: &mut Encoder) -> std::result::Result<(), EncodeError> {
        encoder.write_kind(ValueKind::Tuple);
        encoder.nested(|e| {
            e.write_tuple_header(SIGNED_INTENT_FIELDS)?;
            encode_signed_fields(e, &self.intent, &self.signatures)
        })
    }
}

fn encode_signed_fields(
    encoder: &mut Encoder,
    intent: &Intent,
    signatures: &[SignatureWithPublicKey],
) -> std::result::Result<(), EncodeError> {
    intent.encode_tuple(encoder)?;
    encoder.encode(signatures)
}

/// Verify every signature over `intent_hash` and reject repeated signers.
pub(crate) fn verify_signatures(
    intent_hash: &IntentHash,
    signatures: &[SignatureWithPublicKey],
) -> Result<Vec<PublicKey>> {
    let mut seen = BTreeSet::new();
    let mut keys = Vec::with_capacity(signatures.len());
    for signature in signatures {
        let key = signature.verify(&intent_hash.0)?;
        if !seen.insert(key) {
            return Err(TransactionError::DuplicateSigner(key));
        }
        keys.push(key);
    }
    Ok(keys)
}

/// Decoded but unchecked signed intent fields.
pub(crate) struct SignedIntentParts {
    intent: IntentParts,
    signatures: Vec<SignatureWithPublicKey>,
}

impl SignedIntentParts {
    fn decode_fields(decoder: &mut Decoder<'_>) -> std::result::Result<Self, DecodeError> {
        let intent = IntentParts::decode_tuple(decoder)?;
        let signatures = decoder.decode()?;
        Ok(Self { intent, signatures })
    }

    /// Read the two-field tuple [`SignedIntent::encode_tuple`] writes.
    pub(crate) fn decode_tuple(decoder: &mut Decoder<'_>) -> std::result::Result<Self, DecodeError> {
        decoder.read_expected_kind(ValueKind::Tuple)?;
        decoder.nested(|d| {
            d.read_tuple_header(SIGNED_INTENT_FIELDS)?;
            Self::decode_fields(d)
        })
    }

    pub(crate) fn into_signed_intent(self) -> Result<SignedIntent> {
        SignedIntent::assemble(self.intent.into_intent()?, self.signatures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::TransactionHeader;
    use crate::message::Message;
    use txkit_crypto::{PrivateKey, Signer};
    use txkit_manifest::ManifestBuilder;

    fn intent(notary: &PrivateKey) -> Intent {
        let header = TransactionHeader {
            network_id: 1,
            start_epoch_inclusive: 0,
            end_epoch_exclusive: 10,
            nonce: 1,
            notary_public_key: notary.public_key(),
            notary_is_signatory: false,
            tip_percentage: 0,
        };
        let manifest = ManifestBuilder::new()
            .lock_fee_from_faucet()
            .build(1)
            .unwrap();
        Intent::new(header, manifest, Message::None).unwrap()
    }

    #[test]
    fn signature_order_changes_bytes_but_not_intent_hash() {
        let notary = PrivateKey::ed25519_from_bytes([1; 32]);
        let a = PrivateKey::ed25519_from_bytes([2; 32]);
        let b = PrivateKey::secp256k1_from_bytes(&[3; 32]).unwrap();
        let intent = intent(&notary);
        let hash = intent.hash().0;
        let sig_a = a.sign_with_public_key(&hash).unwrap();
        let sig_b = b.sign_with_public_key(&hash).unwrap();

        let ab = SignedIntent::new(intent.clone(), vec![sig_a, sig_b]).unwrap();
        let ba = SignedIntent::new(intent.clone(), vec![sig_b, sig_a]).unwrap();
        assert_ne!(ab.compile(), ba.compile());
        assert_ne!(ab.hash(), ba.hash());
        assert_eq!(ab.intent_hash(), ba.intent_hash());
        assert_eq!(ab.intent_hash(), intent.hash());
        assert_eq!(
            ab.signer_keys().unwrap(),
            vec![a.public_key(), b.public_key()]
        );
    }

    #[test]
    fn signatures_must_cover_the_intent_hash() {
        let notary = PrivateKey::ed25519_from_bytes([1; 32]);
        let signer = PrivateKey::ed25519_from_bytes([2; 32]);
        let wrong = signer
            .sign_with_public_key(&txkit_types::Hash::of(b"other"))
            .unwrap();
        assert!(matches!(
            SignedIntent::new(intent(&notary), vec![wrong]),
            Err(TransactionError::Signature(_))
        ));
    }

    #[test]
    fn a_key_signs_once() {
        let notary = PrivateKey::ed25519_from_bytes([1; 32]);
        let signer = PrivateKey::ed25519_from_bytes([2; 32]);
        let intent = intent(&notary);
        let signature = signer.sign_with_public_key(&intent.hash().0).unwrap();
        assert_eq!(
            SignedIntent::new(intent, vec![signature, signature]),
            Err(TransactionError::DuplicateSigner(signer.public_key()))
        );
    }

    #[test]
    fn decompile_keeps_signatures_in_order() {
        let notary = PrivateKey::ed25519_from_bytes([1; 32]);
        let intent = intent(&notary);
        let signatures: Vec<_> = (2u8..5)
            .map(|seed| {
                PrivateKey::ed25519_from_bytes([seed; 32])
                    .sign_with_public_key(&intent.hash().0)
                    .unwrap()
            })
            .collect();
        let signed = SignedIntent::new(intent, signatures).unwrap();
        let back = SignedIntent::decompile(signed.compiled()).unwrap();
        assert_eq!(back, signed);
        assert_eq!(back.hash(), signed.hash());
    }

    #[test]
    fn an_intent_payload_is_not_a_signed_intent() {
        let notary = PrivateKey::ed25519_from_bytes([1; 32]);
        let intent = intent(&notary);
        assert_eq!(
            SignedIntent::decompile(intent.compiled()),
            Err(TransactionError::UnexpectedPayload {
                expected: PayloadKind::SignedIntent,
                actual: PayloadKind::Intent,
            })
        );
    }
}
