use txkit_manifest::idents;

use crate::classifier::{Classifier, ManifestClass, Requirement};
use crate::classifiers::ACCESS_CONTROLLER_METHODS;
use crate::context::{EntityGroup, InstructionContext, InstructionGroup};

const SETTINGS_METHODS: &[&str] = &[
    idents::ACCOUNT_SET_DEFAULT_DEPOSIT_RULE,
    idents::ACCOUNT_SET_RESOURCE_PREFERENCE,
    idents::ACCOUNT_REMOVE_RESOURCE_PREFERENCE,
    idents::ACCOUNT_ADD_AUTHORIZED_DEPOSITOR,
    idents::ACCOUNT_REMOVE_AUTHORIZED_DEPOSITOR,
];

const AUTH_AND_FEE_METHODS: &[&str] = &[
    idents::ACCOUNT_CREATE_PROOF_OF_AMOUNT,
    idents::ACCOUNT_CREATE_PROOF_OF_NON_FUNGIBLES,
    idents::ACCOUNT_LOCK_FEE,
    idents::ACCOUNT_LOCK_CONTINGENT_FEE,
];

/// Changes to account deposit rules, resource preferences, and authorized
/// depositors. No resources may move.
pub struct AccountDepositSettingsUpdateClassifier;

impl Classifier for AccountDepositSettingsUpdateClassifier {
    fn class(&self) -> ManifestClass {
        ManifestClass::AccountDepositSettingsUpdate
    }

    fn permits(&self, context: &InstructionContext<'_>) -> bool {
        match context.group {
            InstructionGroup::CallMethod => {
                context.calls(EntityGroup::Account, SETTINGS_METHODS)
                    || context.calls(EntityGroup::Account, AUTH_AND_FEE_METHODS)
                    || context.calls(EntityGroup::AccessController, ACCESS_CONTROLLER_METHODS)
            }
            InstructionGroup::Proof => true,
            _ => false,
        }
    }

    fn requirement(&self) -> Requirement {
        Requirement::method_call(EntityGroup::Account, SETTINGS_METHODS)
    }
}
