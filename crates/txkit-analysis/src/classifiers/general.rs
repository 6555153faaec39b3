use txkit_manifest::idents;

use crate::classifier::{Classifier, ManifestClass, Requirement};
use crate::classifiers::{ACCESS_CONTROLLER_METHODS, ACCOUNT_MOVEMENT_METHODS};
use crate::context::{EntityGroup, InstructionContext, InstructionGroup};

const VALIDATOR_METHODS: &[&str] = &[
    idents::VALIDATOR_STAKE,
    idents::VALIDATOR_UNSTAKE,
    idents::VALIDATOR_CLAIM_XRD,
];

const POOL_METHODS: &[&str] = &[idents::POOL_CONTRIBUTE, idents::POOL_REDEEM];

/// Manifests a wallet can summarize without special handling.
///
/// Accounts, validators, pools, and access controllers may only be called
/// through their well-understood methods; generic components and account
/// lockers through any method. Module and direct vault calls are refused.
pub struct GeneralClassifier;

impl Classifier for GeneralClassifier {
    fn class(&self) -> ManifestClass {
        ManifestClass::General
    }

    fn permits(&self, context: &InstructionContext<'_>) -> bool {
        match context.group {
            InstructionGroup::CallMethod => match context.receiver_group() {
                Some(EntityGroup::Account) => {
                    context.calls(EntityGroup::Account, ACCOUNT_MOVEMENT_METHODS)
                }
                Some(EntityGroup::AccessController) => {
                    context.calls(EntityGroup::AccessController, ACCESS_CONTROLLER_METHODS)
                }
                Some(EntityGroup::Validator) => {
                    context.calls(EntityGroup::Validator, VALIDATOR_METHODS)
                }
                Some(EntityGroup::Pool) => context.calls(EntityGroup::Pool, POOL_METHODS),
                Some(EntityGroup::GenericComponent | EntityGroup::AccountLocker) => true,
                _ => false,
            },
            InstructionGroup::CallFunction
            | InstructionGroup::BurnResource
            | InstructionGroup::AddressAllocation => true,
            InstructionGroup::CallModuleMethod | InstructionGroup::CallDirectVaultMethod => false,
            group => group.is_resource_plumbing(),
        }
    }

    fn requirement(&self) -> Requirement {
        Requirement::AnyInstruction
    }
}
