use tracing::debug;
use txkit_crypto::{ContentHasher, Signature};
use txkit_sbor::{DecodeError, Decoder, DecoderLimits};

use crate::error::{Result, TransactionError};
use crate::hash::{IntentHash, NotarizedTransactionHash, SignedIntentHash};
use crate::intent::Intent;
use crate::payload::{compile_payload, decompile_payload, PayloadKind};
use crate::signed::{SignedIntent, SignedIntentParts};

const NOTARIZED_FIELDS: usize = 2;

/// A signed intent sealed by the notary: the submittable transaction.
///
/// The notary signs the signed-intent hash with the key named in the header.
/// Nothing can be added once notarized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotarizedTransaction {
    signed_intent: SignedIntent,
    notary_signature: Signature,
    compiled: Vec<u8>,
    hash: NotarizedTransactionHash,
}

impl NotarizedTransaction {
    /// Seal `signed_intent` with `notary_signature`.
    ///
    /// The signature must verify over the signed-intent hash with the
    /// header's notary key. A notary that counts as a signatory must not
    /// also appear among the intent signatures.
    pub fn new(signed_intent: SignedIntent, notary_signature: Signature) -> Result<Self> {
        let header = signed_intent.intent().header();
        notary_signature.verify(&signed_intent.hash().0, &header.notary_public_key)?;
        if header.notary_is_signatory {
            let notary = header.notary_public_key;
            if signed_intent.signer_keys()?.contains(&notary) {
                return Err(TransactionError::DuplicateSigner(notary));
            }
        }
        Self::assemble(signed_intent, notary_signature)
    }

    fn assemble(signed_intent: SignedIntent, notary_signature: Signature) -> Result<Self> {
        let compiled = compile_payload(PayloadKind::NotarizedTransaction, NOTARIZED_FIELDS, |e| {
            signed_intent.encode_tuple(e)?;
            e.encode(&notary_signature)
        })?;
        let hash = NotarizedTransactionHash(ContentHasher::NOTARIZED_TRANSACTION.hash(&compiled));
        debug!(
            intent_hash = %signed_intent.intent_hash().0.short_hex(),
            bytes = compiled.len(),
            hash = %hash.0.short_hex(),
            "notarized transaction"
        );
        Ok(Self {
            signed_intent,
            notary_signature,
            compiled,
            hash,
        })
    }

    pub fn signed_intent(&self) -> &SignedIntent {
        &self.signed_intent
    }

    pub fn intent(&self) -> &Intent {
        self.signed_intent.intent()
    }

    pub fn notary_signature(&self) -> &Signature {
        &self.notary_signature
    }

    pub fn intent_hash(&self) -> IntentHash {
        self.signed_intent.intent_hash()
    }

    pub fn signed_intent_hash(&self) -> SignedIntentHash {
        self.signed_intent.hash()
    }

    pub fn hash(&self) -> NotarizedTransactionHash {
        self.hash
    }

    pub fn compile(&self) -> Vec<u8> {
        self.compiled.clone()
    }

    pub fn compiled(&self) -> &[u8] {
        &self.compiled
    }

    pub fn decompile(bytes: &[u8]) -> Result<Self> {
        Self::decompile_with_limits(bytes, DecoderLimits::default())
    }

    /// Decode a notarized transaction payload. Signatures are decoded but not
    /// verified; see [`crate::TransactionValidator`].
    pub fn decompile_with_limits(bytes: &[u8], limits: DecoderLimits) -> Result<Self> {
        let (signed, notary_signature) = decompile_payload(
            bytes,
            limits,
            PayloadKind::NotarizedTransaction,
            NOTARIZED_FIELDS,
            decode_fields,
        )?;
        Self::assemble(signed.into_signed_intent()?, notary_signature)
    }
}

fn decode_fields(
    decoder: &mut Decoder<'_>,
) -> std::result::Result<(SignedIntentParts, Signature), DecodeError> {
    let signed = SignedIntentParts::decode_tuple(decoder)?;
    let notary_signature = decoder.decode()?;
    Ok((signed, notary_signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::TransactionHeader;
    use crate::message::Message;
    use txkit_crypto::{PrivateKey, Signer};
    use txkit_manifest::ManifestBuilder;

    fn signed(notary: &PrivateKey, notary_is_signatory: bool, signers: &[&PrivateKey]) -> SignedIntent {
        let header = TransactionHeader {
            network_id: 2,
            start_epoch_inclusive: 5,
            end_epoch_exclusive: 6,
            nonce: 9,
            notary_public_key: notary.public_key(),
            notary_is_signatory,
            tip_percentage: 1,
        };
        let manifest = ManifestBuilder::new()
            .lock_fee_from_faucet()
            .get_free_xrd_from_faucet()
            .build(2)
            .unwrap();
        let intent = Intent::new(header, manifest, Message::None).unwrap();
        let signatures = signers
            .iter()
            .map(|signer| signer.sign_with_public_key(&intent.hash().0).unwrap())
            .collect();
        SignedIntent::new(intent, signatures).unwrap()
    }

    #[test]
    fn notary_signs_the_signed_intent_hash() {
        let notary = PrivateKey::secp256k1_from_bytes(&[7; 32]).unwrap();
        let signer = PrivateKey::ed25519_from_bytes([8; 32]);
        let signed = signed(&notary, false, &[&signer]);
        let signature = notary.sign(&signed.hash().0).unwrap();
        let notarized = NotarizedTransaction::new(signed.clone(), signature).unwrap();

        assert_eq!(notarized.intent_hash(), signed.intent_hash());
        assert_eq!(notarized.signed_intent_hash(), signed.hash());
        assert_eq!(
            notarized.hash().0,
            ContentHasher::NOTARIZED_TRANSACTION.hash(notarized.compiled())
        );
        assert_eq!(&notarized.compiled()[..3], &[0x4d, 0x22, 0x03]);
    }

    #[test]
    fn signature_over_intent_hash_is_not_a_notarization() {
        let notary = PrivateKey::ed25519_from_bytes([7; 32]);
        let signed = signed(&notary, false, &[]);
        let signature = notary.sign(&signed.intent_hash().0).unwrap();
        assert!(matches!(
            NotarizedTransaction::new(signed, signature),
            Err(TransactionError::Signature(_))
        ));
    }

    #[test]
    fn notary_signatory_must_not_sign_twice() {
        let notary = PrivateKey::ed25519_from_bytes([7; 32]);
        let signed = signed(&notary, true, &[&notary]);
        let signature = notary.sign(&signed.hash().0).unwrap();
        assert_eq!(
            NotarizedTransaction::new(signed, signature),
            Err(TransactionError::DuplicateSigner(notary.public_key()))
        );
    }

    #[test]
    fn decompile_restores_the_transaction() {
        let notary = PrivateKey::ed25519_from_bytes([7; 32]);
        let a = PrivateKey::ed25519_from_bytes([8; 32]);
        let b = PrivateKey::secp256k1_from_bytes(&[9; 32]).unwrap();
        let signed = signed(&notary, false, &[&a, &b]);
        let signature = notary.sign(&signed.hash().0).unwrap();
        let notarized = NotarizedTransaction::new(signed, signature).unwrap();

        let back = NotarizedTransaction::decompile(notarized.compiled()).unwrap();
        assert_eq!(back, notarized);
        assert_eq!(back.hash(), notarized.hash());

        let bytes = notarized.compile();
        assert!(matches!(
            NotarizedTransaction::decompile(&bytes[..bytes.len() - 1]),
            Err(TransactionError::Decode(_))
        ));
    }
}
