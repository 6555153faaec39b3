use tracing::{debug, warn};
use txkit_analysis::{summarize, ManifestSummary};
use txkit_crypto::Signer;
use txkit_manifest::{Manifest, ManifestBuilder};
use txkit_transaction::{
    Intent, IntentHash, NotarizedTransaction, PayloadKind, SignedIntent, SigningBuilder,
    TransactionBuilder, TransactionValidator, ValidationReport,
};
use txkit_types::{known_addresses, Address, KnownAddresses, NetworkDefinition, NetworkId, PublicKey};

use crate::config::ToolkitConfig;
use crate::error::{SdkError, SdkResult};

/// One entry point over the txkit crates, bound to a [`ToolkitConfig`].
///
/// The configured network is used wherever a call would otherwise need a
/// network id, and the configured decoder limits apply to every decompile.
#[derive(Clone, Debug)]
pub struct Toolkit {
    config: ToolkitConfig,
    validator: TransactionValidator,
}

impl Toolkit {
    pub fn new(config: ToolkitConfig) -> SdkResult<Self> {
        config.validate()?;
        let validator = TransactionValidator::new(config.validation_config());
        debug!(network_id = config.network_id, "toolkit ready");
        Ok(Self { config, validator })
    }

    pub fn for_network(network_id: NetworkId) -> SdkResult<Self> {
        Self::new(ToolkitConfig::for_network(network_id))
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    // ---- Network ----

    pub fn network_id(&self) -> NetworkId {
        self.config.network_id
    }

    pub fn network_definition(&self) -> NetworkDefinition {
        NetworkDefinition::from_id(self.config.network_id)
    }

    pub fn known_addresses(&self) -> SdkResult<KnownAddresses> {
        Ok(known_addresses(self.config.network_id)?)
    }

    pub fn virtual_account_address(&self, public_key: &PublicKey) -> Address {
        Address::virtual_account(public_key, self.config.network_id)
    }

    pub fn virtual_identity_address(&self, public_key: &PublicKey) -> Address {
        Address::virtual_identity(public_key, self.config.network_id)
    }

    // ---- Manifests ----

    pub fn manifest_builder(&self) -> ManifestBuilder {
        ManifestBuilder::new()
    }

    /// Finish `builder` on the configured network.
    pub fn build_manifest(&self, builder: ManifestBuilder) -> SdkResult<Manifest> {
        Ok(builder.build(self.config.network_id)?)
    }

    pub fn summarize(&self, manifest: &Manifest) -> SdkResult<ManifestSummary> {
        Ok(summarize(manifest, self.config.network_id)?)
    }

    pub fn compile_manifest(&self, manifest: &Manifest) -> SdkResult<Vec<u8>> {
        Ok(manifest.compile()?)
    }

    pub fn decompile_manifest(&self, bytes: &[u8]) -> SdkResult<Manifest> {
        Ok(Manifest::decompile_with_limits(
            bytes,
            self.config.network_id,
            self.config.decoder_limits(),
        )?)
    }

    // ---- Transactions ----

    pub fn transaction_builder(&self) -> TransactionBuilder {
        TransactionBuilder::new()
    }

    /// Notarize `signing` with `notary`, then check the result the same way
    /// [`Toolkit::compile_notarized`] does.
    pub fn notarize<S: Signer + ?Sized>(
        &self,
        signing: SigningBuilder,
        notary: &S,
    ) -> SdkResult<NotarizedTransaction> {
        let transaction = signing.notarize(notary)?;
        self.check(&transaction)?;
        Ok(transaction)
    }

    /// Canonical bytes of `transaction`. When `validate_on_compile` is set,
    /// a transaction with any violation is refused.
    pub fn compile_notarized(&self, transaction: &NotarizedTransaction) -> SdkResult<Vec<u8>> {
        self.check(transaction)?;
        Ok(transaction.compile())
    }

    pub fn decompile_intent(&self, bytes: &[u8]) -> SdkResult<Intent> {
        Ok(Intent::decompile_with_limits(bytes, self.config.decoder_limits())?)
    }

    pub fn decompile_signed_intent(&self, bytes: &[u8]) -> SdkResult<SignedIntent> {
        Ok(SignedIntent::decompile_with_limits(
            bytes,
            self.config.decoder_limits(),
        )?)
    }

    pub fn decompile_notarized(&self, bytes: &[u8]) -> SdkResult<NotarizedTransaction> {
        Ok(NotarizedTransaction::decompile_with_limits(
            bytes,
            self.config.decoder_limits(),
        )?)
    }

    /// Which of the three transaction payloads `bytes` holds.
    pub fn payload_kind(&self, bytes: &[u8]) -> SdkResult<PayloadKind> {
        Ok(PayloadKind::of(bytes)?)
    }

    pub fn validate(
        &self,
        transaction: &NotarizedTransaction,
        current_epoch: Option<u64>,
    ) -> ValidationReport {
        self.validator.validate(transaction, current_epoch)
    }

    pub fn validate_bytes(
        &self,
        bytes: &[u8],
        current_epoch: Option<u64>,
    ) -> SdkResult<ValidationReport> {
        Ok(self.validator.validate_bytes(bytes, current_epoch)?)
    }

    /// The transaction id string on the configured network.
    pub fn intent_hash_string(&self, hash: &IntentHash) -> SdkResult<String> {
        Ok(hash.to_bech32(self.config.network_id)?)
    }

    pub fn parse_intent_hash(&self, s: &str) -> SdkResult<IntentHash> {
        Ok(IntentHash::from_bech32(s, self.config.network_id)?)
    }

    fn check(&self, transaction: &NotarizedTransaction) -> SdkResult<()> {
        if !self.config.validate_on_compile {
            return Ok(());
        }
        let report = self.validator.validate(transaction, None);
        if report.is_valid() {
            Ok(())
        } else {
            warn!(
                violations = report.violations.len(),
                "refusing invalid transaction"
            );
            Err(SdkError::InvalidTransaction(report.violations))
        }
    }
}

impl Default for Toolkit {
    fn default() -> Self {
        let config = ToolkitConfig::default();
        let validator = TransactionValidator::new(config.validation_config());
        Self { config, validator }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txkit_crypto::PrivateKey;
    use txkit_transaction::{TransactionHeader, ViolationKind};

    fn header(notary: &PrivateKey, network_id: NetworkId) -> TransactionHeader {
        TransactionHeader {
            network_id,
            start_epoch_inclusive: 100,
            end_epoch_exclusive: 110,
            nonce: 42,
            notary_public_key: notary.public_key(),
            notary_is_signatory: false,
            tip_percentage: 0,
        }
    }

    fn signing(toolkit: &Toolkit, notary: &PrivateKey, network_id: NetworkId) -> SigningBuilder {
        let builder = toolkit
            .manifest_builder()
            .lock_fee_from_faucet()
            .get_free_xrd_from_faucet();
        let manifest = builder.build(network_id).unwrap();
        toolkit
            .transaction_builder()
            .header(header(notary, network_id))
            .manifest(manifest)
            .prepare()
            .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ToolkitConfig {
            max_payload_size: 0,
            ..ToolkitConfig::default()
        };
        assert!(matches!(Toolkit::new(config), Err(SdkError::Config(_))));
    }

    #[test]
    fn network_helpers_use_the_configured_network() {
        let toolkit = Toolkit::for_network(2).unwrap();
        assert_eq!(toolkit.network_definition().hrp_suffix, "tdx_2_");
        let xrd = toolkit.known_addresses().unwrap().resource_addresses.xrd;
        assert_eq!(xrd.network_id(), 2);

        let key = PrivateKey::ed25519_from_bytes([5; 32]).public_key();
        let account = toolkit.virtual_account_address(&key);
        assert!(account.is_account());
        assert!(account.to_bech32().unwrap().starts_with("account_tdx_2_"));
        assert!(toolkit.virtual_identity_address(&key).is_identity());
    }

    #[test]
    fn manifest_roundtrip_through_the_toolkit() {
        let toolkit = Toolkit::default();
        let manifest = toolkit
            .build_manifest(toolkit.manifest_builder().lock_fee_from_faucet())
            .unwrap();
        let bytes = toolkit.compile_manifest(&manifest).unwrap();
        assert_eq!(toolkit.decompile_manifest(&bytes).unwrap(), manifest);
    }

    #[test]
    fn notarize_validates_by_default() {
        let notary = PrivateKey::ed25519_from_bytes([1; 32]);
        let toolkit = Toolkit::for_network(2).unwrap();

        let transaction = toolkit.notarize(signing(&toolkit, &notary, 2), &notary).unwrap();
        let bytes = toolkit.compile_notarized(&transaction).unwrap();
        assert_eq!(
            toolkit.payload_kind(&bytes).unwrap(),
            PayloadKind::NotarizedTransaction
        );
        assert_eq!(toolkit.decompile_notarized(&bytes).unwrap(), transaction);

        // Built for another network than the toolkit checks against.
        let err = toolkit
            .notarize(signing(&toolkit, &notary, 1), &notary)
            .unwrap_err();
        match err {
            SdkError::InvalidTransaction(violations) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].kind, ViolationKind::NetworkMismatch);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validation_can_be_switched_off() {
        let notary = PrivateKey::ed25519_from_bytes([1; 32]);
        let toolkit = Toolkit::new(ToolkitConfig {
            validate_on_compile: false,
            ..ToolkitConfig::for_network(2)
        })
        .unwrap();
        let transaction = toolkit.notarize(signing(&toolkit, &notary, 1), &notary).unwrap();
        assert!(toolkit.compile_notarized(&transaction).is_ok());
        assert!(!toolkit.validate(&transaction, None).is_valid());
    }

    #[test]
    fn intent_hash_strings() {
        let notary = PrivateKey::ed25519_from_bytes([1; 32]);
        let toolkit = Toolkit::for_network(2).unwrap();
        let hash = signing(&toolkit, &notary, 2).intent_hash();
        let s = toolkit.intent_hash_string(&hash).unwrap();
        assert!(s.starts_with("txid_tdx_2_"));
        assert_eq!(toolkit.parse_intent_hash(&s).unwrap(), hash);
        assert!(Toolkit::default().parse_intent_hash(&s).is_err());
    }

    #[test]
    fn decoder_limits_come_from_the_config() {
        let notary = PrivateKey::ed25519_from_bytes([1; 32]);
        let toolkit = Toolkit::for_network(2).unwrap();
        let intent = signing(&toolkit, &notary, 2).intent().clone();
        assert_eq!(toolkit.decompile_intent(intent.compiled()).unwrap(), intent);

        let tight = Toolkit::new(ToolkitConfig {
            max_payload_size: 8,
            ..ToolkitConfig::for_network(2)
        })
        .unwrap();
        assert!(matches!(
            tight.decompile_intent(intent.compiled()),
            Err(SdkError::Transaction(_))
        ));
    }
}
