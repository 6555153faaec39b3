use tracing::debug;
use txkit_manifest::{idents, Instruction, Manifest};
use txkit_sbor::{ManifestAddress, ManifestValue};
use txkit_types::{Address, NetworkId, NodeId};

use crate::classifier::{Classifier, ClassifierRun};
use crate::classifiers::default_classifiers;
use crate::context::{EntityGroup, InstructionContext, NamedAddressStore};
use crate::error::{AnalysisError, Result};
use crate::summary::{ManifestSummary, ProofSpecifier, ReservedInstruction};

/// Account methods that need the owner's signature.
const ACCOUNT_AUTH_METHODS: &[&str] = &[
    idents::ACCOUNT_SECURIFY,
    idents::ACCOUNT_LOCK_FEE,
    idents::ACCOUNT_LOCK_CONTINGENT_FEE,
    idents::ACCOUNT_DEPOSIT,
    idents::ACCOUNT_DEPOSIT_BATCH,
    idents::ACCOUNT_WITHDRAW,
    idents::ACCOUNT_WITHDRAW_NON_FUNGIBLES,
    idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW,
    idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW_NON_FUNGIBLES,
    idents::ACCOUNT_CREATE_PROOF_OF_AMOUNT,
    idents::ACCOUNT_CREATE_PROOF_OF_NON_FUNGIBLES,
    idents::ACCOUNT_SET_DEFAULT_DEPOSIT_RULE,
    idents::ACCOUNT_SET_RESOURCE_PREFERENCE,
    idents::ACCOUNT_REMOVE_RESOURCE_PREFERENCE,
    idents::ACCOUNT_ADD_AUTHORIZED_DEPOSITOR,
    idents::ACCOUNT_REMOVE_AUTHORIZED_DEPOSITOR,
];

const ACCOUNT_LOCK_FEE_METHODS: &[&str] = &[
    idents::ACCOUNT_LOCK_FEE,
    idents::ACCOUNT_LOCK_CONTINGENT_FEE,
    idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW,
    idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW_NON_FUNGIBLES,
];

/// Static analysis over a manifest: a set of classifiers plus the fixed
/// address and account interaction collectors.
///
/// Summaries are computed in a single pass and depend only on the manifest,
/// so the analyzer can be shared and reused freely.
pub struct ManifestAnalyzer {
    classifiers: Vec<Box<dyn Classifier>>,
}

impl ManifestAnalyzer {
    /// An analyzer with no classifiers. Summaries still collect addresses
    /// and account interactions.
    pub fn new() -> Self {
        Self {
            classifiers: Vec::new(),
        }
    }

    /// An analyzer with every built-in classifier.
    pub fn with_default_classifiers() -> Self {
        Self {
            classifiers: default_classifiers(),
        }
    }

    pub fn add_classifier(&mut self, classifier: Box<dyn Classifier>) {
        self.classifiers.push(classifier);
    }

    pub fn classifier_count(&self) -> usize {
        self.classifiers.len()
    }

    /// Summarize `manifest`, resolving its addresses on `network_id`.
    pub fn summarize(&self, manifest: &Manifest, network_id: NetworkId) -> Result<ManifestSummary> {
        if manifest.network_id() != network_id {
            return Err(AnalysisError::NetworkMismatch {
                manifest: manifest.network_id(),
                requested: network_id,
            });
        }

        let mut runs: Vec<ClassifierRun<'_>> = self
            .classifiers
            .iter()
            .map(|classifier| ClassifierRun::start(classifier.as_ref()))
            .collect();
        let mut named = NamedAddressStore::default();
        let mut summary = ManifestSummary::default();

        for (index, instruction) in manifest.instructions().iter().enumerate() {
            let context = InstructionContext::new(index, instruction, &named);
            for run in &mut runs {
                run.observe(&context);
            }

            let resolve = |node_id: NodeId| {
                Address::new(node_id, network_id)
                    .map_err(|source| AnalysisError::InvalidAddress { index, source })
            };
            for address in instruction.addresses() {
                if let ManifestAddress::Static(node_id) = address {
                    summary.encountered_entities.insert(resolve(node_id)?);
                }
            }
            collect_interactions(&mut summary, &context, resolve)?;

            if let Instruction::AllocateGlobalAddress {
                package_address,
                blueprint_name,
            } = instruction
            {
                named.allocate(package_address, blueprint_name);
            }
        }

        summary.classification = runs.into_iter().filter_map(ClassifierRun::finish).collect();
        debug!(
            network_id,
            instructions = manifest.len(),
            classes = ?summary.classification,
            entities = summary.encountered_entities.len(),
            "summarized manifest"
        );
        Ok(summary)
    }
}

impl Default for ManifestAnalyzer {
    fn default() -> Self {
        Self::with_default_classifiers()
    }
}

/// Summarize a manifest with the built-in classifiers.
pub fn summarize(manifest: &Manifest, network_id: NetworkId) -> Result<ManifestSummary> {
    ManifestAnalyzer::with_default_classifiers().summarize(manifest, network_id)
}

/// Record what one instruction does to accounts and identities. Calls on
/// named addresses are skipped; those entities do not exist yet.
fn collect_interactions(
    summary: &mut ManifestSummary,
    context: &InstructionContext<'_>,
    resolve: impl Fn(NodeId) -> Result<Address>,
) -> Result<()> {
    let (receiver, args) = match context.instruction {
        Instruction::CallMethod {
            address: ManifestAddress::Static(node_id),
            args,
            ..
        } => (resolve(*node_id)?, args),
        Instruction::CallRoyaltyMethod {
            address: ManifestAddress::Static(node_id),
            ..
        }
        | Instruction::CallRoleAssignmentMethod {
            address: ManifestAddress::Static(node_id),
            ..
        } => {
            record_module_auth(summary, resolve(*node_id)?);
            return Ok(());
        }
        Instruction::CallMetadataMethod {
            address: ManifestAddress::Static(node_id),
            method_name,
            args,
        } => {
            let receiver = resolve(*node_id)?;
            record_module_auth(summary, receiver);
            record_owner_keys_update(summary, &receiver, method_name, args);
            return Ok(());
        }
        _ => return Ok(()),
    };

    match context.receiver_group() {
        Some(EntityGroup::Account) => {
            if context.calls(EntityGroup::Account, &idents::ACCOUNT_DEPOSIT_METHODS) {
                summary.accounts_deposited_into.insert(receiver);
            }
            if context.calls(EntityGroup::Account, &idents::ACCOUNT_WITHDRAW_METHODS) {
                summary.accounts_withdrawn_from.insert(receiver);
            }
            if context.calls(EntityGroup::Account, ACCOUNT_AUTH_METHODS) {
                summary.accounts_requiring_auth.insert(receiver);
            }
            if context.calls(EntityGroup::Account, ACCOUNT_LOCK_FEE_METHODS) {
                summary
                    .reserved_instructions
                    .insert(ReservedInstruction::AccountLockFee);
            }
            if context.calls(EntityGroup::Account, &[idents::ACCOUNT_SECURIFY]) {
                summary
                    .reserved_instructions
                    .insert(ReservedInstruction::AccountSecurify);
            }
            if let Some(proof) = presented_proof(context, args, &resolve)? {
                summary
                    .presented_proofs
                    .entry(receiver)
                    .or_default()
                    .push(proof);
            }
        }
        Some(EntityGroup::Identity) => {
            if context.calls(EntityGroup::Identity, &[idents::IDENTITY_SECURIFY]) {
                summary.identities_requiring_auth.insert(receiver);
                summary
                    .reserved_instructions
                    .insert(ReservedInstruction::IdentitySecurify);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Module calls on an account or identity act with its owner's authority.
fn record_module_auth(summary: &mut ManifestSummary, receiver: Address) {
    if receiver.is_account() {
        summary.accounts_requiring_auth.insert(receiver);
    } else if receiver.is_identity() {
        summary.identities_requiring_auth.insert(receiver);
    }
}

fn record_owner_keys_update(
    summary: &mut ManifestSummary,
    receiver: &Address,
    method_name: &str,
    args: &ManifestValue,
) {
    let touches_owner_keys = matches!(
        args.as_tuple(),
        Some([ManifestValue::String(key), ..]) if key == idents::OWNER_KEYS_METADATA_KEY
    );
    if !touches_owner_keys {
        return;
    }
    let reserved = match (receiver.is_account(), receiver.is_identity(), method_name) {
        (true, _, idents::METADATA_SET) => ReservedInstruction::AccountUpdateOwnerKeysMetadataField,
        (true, _, idents::METADATA_LOCK) => ReservedInstruction::AccountLockOwnerKeysMetadataField,
        (_, true, idents::METADATA_SET) => ReservedInstruction::IdentityUpdateOwnerKeysMetadataField,
        (_, true, idents::METADATA_LOCK) => ReservedInstruction::IdentityLockOwnerKeysMetadataField,
        _ => return,
    };
    summary.reserved_instructions.insert(reserved);
}

/// The proof an account `create_proof_of_*` call presents, when its
/// arguments have the expected shape.
fn presented_proof(
    context: &InstructionContext<'_>,
    args: &ManifestValue,
    resolve: &impl Fn(NodeId) -> Result<Address>,
) -> Result<Option<ProofSpecifier>> {
    let Some(
        [ManifestValue::Address(ManifestAddress::Static(resource)), second],
    ) = args.as_tuple()
    else {
        return Ok(None);
    };
    let proof = match (context.method_name(), second) {
        (Some(idents::ACCOUNT_CREATE_PROOF_OF_AMOUNT), ManifestValue::Decimal(amount)) => {
            ProofSpecifier::Amount {
                resource_address: resolve(*resource)?,
                amount: *amount,
            }
        }
        (
            Some(idents::ACCOUNT_CREATE_PROOF_OF_NON_FUNGIBLES),
            ManifestValue::Array { elements, .. },
        ) => ProofSpecifier::Ids {
            resource_address: resolve(*resource)?,
            ids: elements
                .iter()
                .filter_map(|element| match element {
                    ManifestValue::NonFungibleLocalId(id) => Some(id.clone()),
                    _ => None,
                })
                .collect(),
        },
        _ => return Ok(None),
    };
    Ok(Some(proof))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ManifestClass;
    use std::collections::BTreeSet;
    use txkit_manifest::{DefaultDepositRule, ManifestBuilder};
    use txkit_types::known_addresses::node_ids;
    use txkit_types::{known_addresses, Decimal, EntityType};

    const NETWORK: NetworkId = 0x01;

    fn entity(entity_type: EntityType, fill: u8) -> Address {
        Address::new(NodeId::from_parts(entity_type, &[fill; 29]), NETWORK).unwrap()
    }

    fn xrd() -> Address {
        known_addresses(NETWORK).unwrap().resource_addresses.xrd
    }

    fn classes(classes: &[ManifestClass]) -> BTreeSet<ManifestClass> {
        classes.iter().copied().collect()
    }

    fn faucet_manifest(account: Address) -> Manifest {
        ManifestBuilder::new()
            .lock_fee_from_faucet()
            .get_free_xrd_from_faucet()
            .take_all_from_worktop(xrd(), "xrd")
            .unwrap()
            .try_deposit_or_abort(account, "xrd")
            .unwrap()
            .build(NETWORK)
            .unwrap()
    }

    #[test]
    fn faucet_manifest_is_general_only() {
        let account = entity(EntityType::GlobalPreallocatedEd25519Account, 0x11);
        let summary = summarize(&faucet_manifest(account), NETWORK).unwrap();

        assert_eq!(summary.classification, classes(&[ManifestClass::General]));
        let faucet = Address::new(node_ids::FAUCET, NETWORK).unwrap();
        assert_eq!(
            summary.encountered_entities.iter().copied().collect::<Vec<_>>(),
            vec![faucet, xrd(), account]
        );
        assert_eq!(
            summary.accounts_deposited_into.iter().copied().collect::<Vec<_>>(),
            vec![account]
        );
        assert!(summary.accounts_withdrawn_from.is_empty());
        assert!(summary.accounts_requiring_auth.is_empty());
        assert!(summary.reserved_instructions.is_empty());
    }

    #[test]
    fn summarizing_twice_gives_equal_summaries() {
        let manifest = faucet_manifest(entity(EntityType::GlobalAccount, 1));
        let analyzer = ManifestAnalyzer::default();
        assert_eq!(
            analyzer.summarize(&manifest, NETWORK).unwrap(),
            analyzer.summarize(&manifest, NETWORK).unwrap()
        );
    }

    #[test]
    fn account_to_account_transfer() {
        let from = entity(EntityType::GlobalAccount, 1);
        let to = entity(EntityType::GlobalAccount, 2);
        let manifest = ManifestBuilder::new()
            .lock_fee(from, Decimal::from(10i64))
            .unwrap()
            .withdraw_from_account(from, xrd(), Decimal::from(100i64))
            .unwrap()
            .take_from_worktop(xrd(), Decimal::from(100i64), "xrd")
            .unwrap()
            .try_deposit_or_abort(to, "xrd")
            .unwrap()
            .build(NETWORK)
            .unwrap();
        let summary = summarize(&manifest, NETWORK).unwrap();

        assert_eq!(
            summary.classification,
            classes(&[ManifestClass::General, ManifestClass::Transfer])
        );
        assert_eq!(summary.accounts_withdrawn_from.len(), 1);
        assert!(summary.accounts_withdrawn_from.contains(&from));
        assert!(summary.accounts_deposited_into.contains(&to));
        assert_eq!(
            summary.accounts_requiring_auth.iter().copied().collect::<Vec<_>>(),
            vec![from]
        );
        assert!(summary
            .reserved_instructions
            .contains(&ReservedInstruction::AccountLockFee));
    }

    #[test]
    fn validator_stake() {
        let account = entity(EntityType::GlobalAccount, 1);
        let validator = entity(EntityType::GlobalValidator, 3);
        let manifest = ManifestBuilder::new()
            .lock_fee(account, Decimal::from(10i64))
            .unwrap()
            .withdraw_from_account(account, xrd(), Decimal::from(500i64))
            .unwrap()
            .take_all_from_worktop(xrd(), "xrd")
            .unwrap()
            .stake_validator(validator, "xrd")
            .unwrap()
            .deposit_entire_worktop(account)
            .unwrap()
            .build(NETWORK)
            .unwrap();
        let summary = summarize(&manifest, NETWORK).unwrap();
        assert_eq!(
            summary.classification,
            classes(&[ManifestClass::General, ManifestClass::ValidatorStake])
        );
    }

    #[test]
    fn pool_contribution() {
        let account = entity(EntityType::GlobalAccount, 1);
        let pool = entity(EntityType::GlobalOneResourcePool, 4);
        let manifest = ManifestBuilder::new()
            .withdraw_from_account(account, xrd(), Decimal::ONE)
            .unwrap()
            .take_all_from_worktop(xrd(), "xrd")
            .unwrap()
            .contribute_to_pool(pool, &["xrd"])
            .unwrap()
            .deposit_entire_worktop(account)
            .unwrap()
            .build(NETWORK)
            .unwrap();
        let summary = summarize(&manifest, NETWORK).unwrap();
        assert!(summary.is_classified_as(ManifestClass::PoolContribution));
        assert!(!summary.is_classified_as(ManifestClass::PoolRedemption));
        assert!(!summary.is_classified_as(ManifestClass::Transfer));
    }

    #[test]
    fn deposit_rule_update_is_not_general() {
        let account = entity(EntityType::GlobalAccount, 1);
        let manifest = ManifestBuilder::new()
            .set_default_deposit_rule(account, DefaultDepositRule::Reject)
            .unwrap()
            .build(NETWORK)
            .unwrap();
        let summary = summarize(&manifest, NETWORK).unwrap();
        assert_eq!(
            summary.classification,
            classes(&[ManifestClass::AccountDepositSettingsUpdate])
        );
        assert!(summary.accounts_requiring_auth.contains(&account));
    }

    #[test]
    fn owner_keys_update_is_reserved() {
        let account = entity(EntityType::GlobalAccount, 1);
        let manifest = ManifestBuilder::new()
            .call_metadata_method(
                account,
                idents::METADATA_SET,
                [ManifestValue::string(idents::OWNER_KEYS_METADATA_KEY)],
            )
            .unwrap()
            .build(NETWORK)
            .unwrap();
        let summary = summarize(&manifest, NETWORK).unwrap();
        assert!(summary.classification.is_empty());
        assert!(summary
            .reserved_instructions
            .contains(&ReservedInstruction::AccountUpdateOwnerKeysMetadataField));
        assert!(summary.accounts_requiring_auth.contains(&account));
    }

    #[test]
    fn presented_proofs_are_collected() {
        let account = entity(EntityType::GlobalAccount, 1);
        let manifest = ManifestBuilder::new()
            .create_proof_from_account_of_amount(account, xrd(), Decimal::ONE)
            .unwrap()
            .build(NETWORK)
            .unwrap();
        let summary = summarize(&manifest, NETWORK).unwrap();
        assert_eq!(
            summary.presented_proofs.get(&account),
            Some(&vec![ProofSpecifier::Amount {
                resource_address: xrd(),
                amount: Decimal::ONE
            }])
        );
    }

    #[test]
    fn empty_manifest_has_no_class() {
        let manifest = ManifestBuilder::new().build(NETWORK).unwrap();
        let summary = summarize(&manifest, NETWORK).unwrap();
        assert!(summary.classification.is_empty());
        assert!(summary.encountered_entities.is_empty());
    }

    #[test]
    fn analyzer_without_classifiers_still_collects() {
        let account = entity(EntityType::GlobalAccount, 1);
        let summary = ManifestAnalyzer::new()
            .summarize(&faucet_manifest(account), NETWORK)
            .unwrap();
        assert!(summary.classification.is_empty());
        assert_eq!(summary.encountered_entities.len(), 3);
    }

    #[test]
    fn network_must_match() {
        let manifest = faucet_manifest(entity(EntityType::GlobalAccount, 1));
        assert_eq!(
            summarize(&manifest, 0x02).unwrap_err(),
            AnalysisError::NetworkMismatch {
                manifest: NETWORK,
                requested: 0x02
            }
        );
    }

    #[test]
    fn summary_serializes() {
        let manifest = faucet_manifest(entity(EntityType::GlobalAccount, 1));
        let summary = summarize(&manifest, NETWORK).unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        let back: ManifestSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
