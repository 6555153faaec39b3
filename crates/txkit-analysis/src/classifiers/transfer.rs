use crate::classifier::{Classifier, ManifestClass, Requirement};
use crate::classifiers::{
    ACCESS_CONTROLLER_METHODS, ACCOUNT_DEPOSITS, ACCOUNT_MOVEMENT_METHODS, ACCOUNT_WITHDRAWS,
};
use crate::context::{EntityGroup, InstructionContext, InstructionGroup};

/// Resources moving between accounts and nothing else.
///
/// Only account and access controller calls are allowed, and the manifest
/// must both withdraw from and deposit into an account.
pub struct TransferClassifier;

impl Classifier for TransferClassifier {
    fn class(&self) -> ManifestClass {
        ManifestClass::Transfer
    }

    fn permits(&self, context: &InstructionContext<'_>) -> bool {
        match context.group {
            InstructionGroup::CallMethod => {
                context.calls(EntityGroup::Account, ACCOUNT_MOVEMENT_METHODS)
                    || context.calls(EntityGroup::AccessController, ACCESS_CONTROLLER_METHODS)
            }
            InstructionGroup::AddressAllocation => true,
            group => group.is_resource_plumbing(),
        }
    }

    fn requirement(&self) -> Requirement {
        Requirement::AllOf(vec![
            Requirement::method_call(EntityGroup::Account, ACCOUNT_WITHDRAWS),
            Requirement::method_call(EntityGroup::Account, ACCOUNT_DEPOSITS),
        ])
    }
}
