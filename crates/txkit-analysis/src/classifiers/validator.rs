use txkit_manifest::idents;

use crate::classifier::{Classifier, ManifestClass, Requirement};
use crate::classifiers::{ACCESS_CONTROLLER_METHODS, ACCOUNT_FUNGIBLE_METHODS, ACCOUNT_MOVEMENT_METHODS};
use crate::context::{EntityGroup, InstructionContext, InstructionGroup};

const STAKE: &[&str] = &[idents::VALIDATOR_STAKE];
const UNSTAKE: &[&str] = &[idents::VALIDATOR_UNSTAKE];
const CLAIM_XRD: &[&str] = &[idents::VALIDATOR_CLAIM_XRD];

fn permits_validator_call(
    context: &InstructionContext<'_>,
    account_methods: &[&str],
    validator_methods: &[&str],
) -> bool {
    match context.group {
        InstructionGroup::CallMethod => {
            context.calls(EntityGroup::Account, account_methods)
                || context.calls(EntityGroup::AccessController, ACCESS_CONTROLLER_METHODS)
                || context.calls(EntityGroup::Validator, validator_methods)
        }
        group => group.is_resource_plumbing(),
    }
}

/// Staking XRD to validators.
pub struct ValidatorStakeClassifier;

impl Classifier for ValidatorStakeClassifier {
    fn class(&self) -> ManifestClass {
        ManifestClass::ValidatorStake
    }

    fn permits(&self, context: &InstructionContext<'_>) -> bool {
        context.group != InstructionGroup::TakeNonFungiblesFromWorktop
            && permits_validator_call(context, ACCOUNT_FUNGIBLE_METHODS, STAKE)
    }

    fn requirement(&self) -> Requirement {
        Requirement::method_call(EntityGroup::Validator, STAKE)
    }
}

/// Unstaking liquid stake units.
pub struct ValidatorUnstakeClassifier;

impl Classifier for ValidatorUnstakeClassifier {
    fn class(&self) -> ManifestClass {
        ManifestClass::ValidatorUnstake
    }

    fn permits(&self, context: &InstructionContext<'_>) -> bool {
        context.group != InstructionGroup::TakeNonFungiblesFromWorktop
            && permits_validator_call(context, ACCOUNT_FUNGIBLE_METHODS, UNSTAKE)
    }

    fn requirement(&self) -> Requirement {
        Requirement::method_call(EntityGroup::Validator, UNSTAKE)
    }
}

/// Claiming XRD with unstake claim NFTs.
pub struct ValidatorClaimXrdClassifier;

impl Classifier for ValidatorClaimXrdClassifier {
    fn class(&self) -> ManifestClass {
        ManifestClass::ValidatorClaimXrd
    }

    fn permits(&self, context: &InstructionContext<'_>) -> bool {
        // Claim NFTs are non-fungible, so non-fungible withdrawals are fine.
        permits_validator_call(context, ACCOUNT_MOVEMENT_METHODS, CLAIM_XRD)
    }

    fn requirement(&self) -> Requirement {
        Requirement::method_call(EntityGroup::Validator, CLAIM_XRD)
    }
}
