use txkit_manifest::idents;

use crate::classifier::{Classifier, ManifestClass, Requirement};
use crate::classifiers::{ACCESS_CONTROLLER_METHODS, ACCOUNT_FUNGIBLE_METHODS};
use crate::context::{EntityGroup, InstructionContext, InstructionGroup};

const CONTRIBUTE: &[&str] = &[idents::POOL_CONTRIBUTE];
const REDEEM: &[&str] = &[idents::POOL_REDEEM];

fn permits_pool_call(context: &InstructionContext<'_>, pool_methods: &[&str]) -> bool {
    match context.group {
        InstructionGroup::CallMethod => {
            context.calls(EntityGroup::Account, ACCOUNT_FUNGIBLE_METHODS)
                || context.calls(EntityGroup::AccessController, ACCESS_CONTROLLER_METHODS)
                || context.calls(EntityGroup::Pool, pool_methods)
        }
        // Pool units and pooled resources are fungible.
        InstructionGroup::TakeNonFungiblesFromWorktop => false,
        group => group.is_resource_plumbing(),
    }
}

/// Contributing resources to one or more pools.
pub struct PoolContributionClassifier;

impl Classifier for PoolContributionClassifier {
    fn class(&self) -> ManifestClass {
        ManifestClass::PoolContribution
    }

    fn permits(&self, context: &InstructionContext<'_>) -> bool {
        permits_pool_call(context, CONTRIBUTE)
    }

    fn requirement(&self) -> Requirement {
        Requirement::method_call(EntityGroup::Pool, CONTRIBUTE)
    }
}

/// Redeeming pool units for the pooled resources.
pub struct PoolRedemptionClassifier;

impl Classifier for PoolRedemptionClassifier {
    fn class(&self) -> ManifestClass {
        ManifestClass::PoolRedemption
    }

    fn permits(&self, context: &InstructionContext<'_>) -> bool {
        permits_pool_call(context, REDEEM)
    }

    fn requirement(&self) -> Requirement {
        Requirement::method_call(EntityGroup::Pool, REDEEM)
    }
}
