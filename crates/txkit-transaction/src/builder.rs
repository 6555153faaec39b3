//! Step-wise transaction assembly.
//!
//! [`TransactionBuilder`] collects the header, manifest, and message and
//! turns them into an [`Intent`]. The resulting [`SigningBuilder`] gathers
//! signatures in call order and ends with notarization. Each step consumes
//! the previous value, so a failed step leaves nothing half-built.
//!
//! ```
//! use txkit_crypto::{PrivateKey, Signer};
//! use txkit_manifest::ManifestBuilder;
//! use txkit_transaction::{TransactionBuilder, TransactionHeader};
//!
//! let notary = PrivateKey::ed25519_from_bytes([1; 32]);
//! let header = TransactionHeader {
//!     network_id: 2,
//!     start_epoch_inclusive: 10,
//!     end_epoch_exclusive: 20,
//!     nonce: 1,
//!     notary_public_key: notary.public_key(),
//!     notary_is_signatory: true,
//!     tip_percentage: 0,
//! };
//! let manifest = ManifestBuilder::new().lock_fee_from_faucet().build(2).unwrap();
//!
//! let transaction = TransactionBuilder::new()
//!     .header(header)
//!     .manifest(manifest)
//!     .prepare()
//!     .unwrap()
//!     .notarize(&notary)
//!     .unwrap();
//! assert_eq!(transaction.signed_intent().signatures().len(), 0);
//! ```

use tracing::debug;
use txkit_crypto::{Signature, SignatureWithPublicKey, Signer};
use txkit_manifest::Manifest;
use txkit_types::PublicKey;

use crate::error::{Result, TransactionError};
use crate::hash::IntentHash;
use crate::header::TransactionHeader;
use crate::intent::Intent;
use crate::message::Message;
use crate::notarized::NotarizedTransaction;
use crate::signed::{verify_signatures, SignedIntent};

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Collects the parts of an intent.
#[derive(Clone, Debug, Default)]
pub struct TransactionBuilder {
    header: Option<TransactionHeader>,
    manifest: Option<Manifest>,
    message: Message,
    required_signers: Vec<PublicKey>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header: TransactionHeader) -> Self {
        self.header = Some(header);
        self
    }

    pub fn manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Defaults to [`Message::None`].
    pub fn message(mut self, message: Message) -> Self {
        self.message = message;
        self
    }

    /// Require `public_key` to sign before notarization succeeds.
    pub fn require_signature(mut self, public_key: PublicKey) -> Self {
        if !self.required_signers.contains(&public_key) {
            self.required_signers.push(public_key);
        }
        self
    }

    /// Assemble the intent and move on to signing.
    pub fn prepare(self) -> Result<SigningBuilder> {
        let header = self.header.ok_or(TransactionError::MissingPart("header"))?;
        let manifest = self
            .manifest
            .ok_or(TransactionError::MissingPart("manifest"))?;
        let intent = Intent::new(header, manifest, self.message)?;
        Ok(SigningBuilder {
            intent,
            signatures: Vec::new(),
            signers: Vec::new(),
            required_signers: self.required_signers,
        })
    }
}

// ---------------------------------------------------------------------------
// SigningBuilder
// ---------------------------------------------------------------------------

/// An intent gathering signatures, ready to be notarized.
#[derive(Clone, Debug)]
pub struct SigningBuilder {
    intent: Intent,
    signatures: Vec<SignatureWithPublicKey>,
    signers: Vec<PublicKey>,
    required_signers: Vec<PublicKey>,
}

impl SigningBuilder {
    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    /// What every signatory signs.
    pub fn intent_hash(&self) -> IntentHash {
        self.intent.hash()
    }

    pub fn signers(&self) -> &[PublicKey] {
        &self.signers
    }

    /// Sign the intent hash with `signer` and append the signature.
    pub fn sign<S: Signer + ?Sized>(self, signer: &S) -> Result<Self> {
        let signature = signer.sign_with_public_key(&self.intent.hash().0)?;
        self.add_signature(signature)
    }

    /// Append an externally produced signature. It must verify over the
    /// intent hash and come from a key that has not signed yet.
    pub fn add_signature(mut self, signature: SignatureWithPublicKey) -> Result<Self> {
        let keys = verify_signatures(&self.intent.hash(), std::slice::from_ref(&signature))?;
        for key in keys {
            if self.signers.contains(&key) {
                return Err(TransactionError::DuplicateSigner(key));
            }
            debug!(
                signer = %key.to_hex(),
                position = self.signatures.len(),
                "added intent signature"
            );
            self.signers.push(key);
        }
        self.signatures.push(signature);
        Ok(self)
    }

    /// Fix the signatures without notarizing.
    pub fn into_signed_intent(self) -> Result<SignedIntent> {
        self.check_required_signers()?;
        SignedIntent::new(self.intent, self.signatures)
    }

    /// Sign the signed-intent hash with `notary`, whose key must be the
    /// header's notary key.
    pub fn notarize<S: Signer + ?Sized>(self, notary: &S) -> Result<NotarizedTransaction> {
        let expected = self.intent.header().notary_public_key;
        let actual = notary.public_key();
        if actual != expected {
            return Err(TransactionError::NotaryMismatch { expected, actual });
        }
        let signed = self.into_signed_intent()?;
        let signature = notary.sign(&signed.hash().0)?;
        NotarizedTransaction::new(signed, signature)
    }

    /// Notarize with a signature made elsewhere over the signed-intent hash,
    /// as reported by [`SigningBuilder::into_signed_intent`].
    pub fn notarize_with_signature(self, signature: Signature) -> Result<NotarizedTransaction> {
        let signed = self.into_signed_intent()?;
        NotarizedTransaction::new(signed, signature)
    }

    /// Every required key must have signed, except a notary that counts as
    /// a signatory.
    fn check_required_signers(&self) -> Result<()> {
        let header = self.intent.header();
        let missing = self.required_signers.iter().find(|key| {
            !self.signers.contains(key)
                && !(header.notary_is_signatory && **key == header.notary_public_key)
        });
        match missing {
            Some(key) => Err(TransactionError::MissingSignature(*key)),
            None => Ok(()),
        }
    }
}
