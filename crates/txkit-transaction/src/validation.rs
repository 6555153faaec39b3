use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use txkit_sbor::DecoderLimits;
use txkit_types::{NetworkId, PublicKey};

use crate::error::Result;
use crate::hash::IntentHash;
use crate::message::MessageLimits;
use crate::notarized::NotarizedTransaction;

/// Static rules a notarized transaction is checked against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationConfig {
    pub network_id: NetworkId,
    /// Longest accepted epoch window.
    pub max_epoch_range: u64,
    /// Most intent signatures accepted.
    pub max_signatures: usize,
    pub message_limits: MessageLimits,
    pub decoder_limits: DecoderLimits,
}

impl ValidationConfig {
    /// About 30 days of 5-minute epochs.
    pub const DEFAULT_MAX_EPOCH_RANGE: u64 = 8640;
    pub const DEFAULT_MAX_SIGNATURES: usize = 16;

    pub fn for_network(network_id: NetworkId) -> Self {
        Self {
            network_id,
            max_epoch_range: Self::DEFAULT_MAX_EPOCH_RANGE,
            max_signatures: Self::DEFAULT_MAX_SIGNATURES,
            message_limits: MessageLimits::default(),
            decoder_limits: DecoderLimits::default(),
        }
    }
}

/// Result of validating one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub intent_hash: IntentHash,
    pub signature_count: usize,
    /// Keys of the intent signatures that verified, in signing order.
    pub signers: Vec<PublicKey>,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

/// A rule the transaction breaks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    NetworkMismatch,
    EpochRangeTooLarge,
    EpochOutOfWindow,
    TooManySignatures,
    InvalidIntentSignature,
    DuplicateSigner,
    InvalidNotarySignature,
    NotaryAlsoSigned,
    InvalidMessage,
}

/// Static transaction validator.
///
/// Checks everything that can be decided without ledger state: network,
/// epoch window, signatures, and message limits.
#[derive(Clone, Debug)]
pub struct TransactionValidator {
    config: ValidationConfig,
}

impl TransactionValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Decode a notarized transaction payload and validate it. Payloads that
    /// fail to decode are errors rather than violations.
    pub fn validate_bytes(
        &self,
        bytes: &[u8],
        current_epoch: Option<u64>,
    ) -> Result<ValidationReport> {
        let transaction =
            NotarizedTransaction::decompile_with_limits(bytes, self.config.decoder_limits)?;
        Ok(self.validate(&transaction, current_epoch))
    }

    /// Validate `transaction`. With `current_epoch`, the epoch window must
    /// also contain it.
    pub fn validate(
        &self,
        transaction: &NotarizedTransaction,
        current_epoch: Option<u64>,
    ) -> ValidationReport {
        let mut violations = Vec::new();
        let mut violate = |kind, description: String| {
            violations.push(Violation { kind, description });
        };

        let signed = transaction.signed_intent();
        let intent = signed.intent();
        let header = intent.header();

        if header.network_id != self.config.network_id {
            violate(
                ViolationKind::NetworkMismatch,
                format!(
                    "transaction is for network {}, validator is for network {}",
                    header.network_id, self.config.network_id
                ),
            );
        }

        if header.epoch_range() > self.config.max_epoch_range {
            violate(
                ViolationKind::EpochRangeTooLarge,
                format!(
                    "epoch window spans {} epochs, limit is {}",
                    header.epoch_range(),
                    self.config.max_epoch_range
                ),
            );
        }
        if let Some(epoch) = current_epoch {
            if !header.is_valid_at(epoch) {
                violate(
                    ViolationKind::EpochOutOfWindow,
                    format!(
                        "epoch {epoch} is outside [{}, {})",
                        header.start_epoch_inclusive, header.end_epoch_exclusive
                    ),
                );
            }
        }

        if let Err(e) = intent.message().validate(&self.config.message_limits) {
            violate(ViolationKind::InvalidMessage, e.to_string());
        }

        let signatures = signed.signatures();
        if signatures.len() > self.config.max_signatures {
            violate(
                ViolationKind::TooManySignatures,
                format!(
                    "{} intent signatures, limit is {}",
                    signatures.len(),
                    self.config.max_signatures
                ),
            );
        }

        let intent_hash = intent.hash();
        let mut signers = Vec::with_capacity(signatures.len());
        let mut seen = BTreeSet::new();
        for (index, signature) in signatures.iter().enumerate() {
            match signature.verify(&intent_hash.0) {
                Ok(key) => {
                    if !seen.insert(key) {
                        violate(
                            ViolationKind::DuplicateSigner,
                            format!("signature {index} repeats signer {}", key.to_hex()),
                        );
                    }
                    signers.push(key);
                }
                Err(e) => violate(
                    ViolationKind::InvalidIntentSignature,
                    format!("signature {index}: {e}"),
                ),
            }
        }

        if let Err(e) = transaction
            .notary_signature()
            .verify(&signed.hash().0, &header.notary_public_key)
        {
            violate(
                ViolationKind::InvalidNotarySignature,
                format!("notary signature: {e}"),
            );
        }
        if header.notary_is_signatory && seen.contains(&header.notary_public_key) {
            violate(
                ViolationKind::NotaryAlsoSigned,
                "notary is a signatory and also signed the intent".into(),
            );
        }

        let report = ValidationReport {
            intent_hash,
            signature_count: signatures.len(),
            signers,
            violations,
        };
        if report.is_valid() {
            debug!(intent_hash = %intent_hash.0.short_hex(), "transaction valid");
        } else {
            warn!(
                intent_hash = %intent_hash.0.short_hex(),
                violations = report.violations.len(),
                "transaction invalid"
            );
        }
        report
    }
}
