//! Built-in classifiers, one per [`ManifestClass`](crate::ManifestClass).

pub mod account_settings;
pub mod general;
pub mod pool;
pub mod transfer;
pub mod validator;

pub use account_settings::AccountDepositSettingsUpdateClassifier;
pub use general::GeneralClassifier;
pub use pool::{PoolContributionClassifier, PoolRedemptionClassifier};
pub use transfer::TransferClassifier;
pub use validator::{ValidatorClaimXrdClassifier, ValidatorStakeClassifier, ValidatorUnstakeClassifier};

use txkit_manifest::idents;

use crate::classifier::Classifier;

/// Account methods a general or transfer manifest may call.
pub(crate) const ACCOUNT_MOVEMENT_METHODS: &[&str] = &[
    idents::ACCOUNT_WITHDRAW,
    idents::ACCOUNT_WITHDRAW_NON_FUNGIBLES,
    idents::ACCOUNT_DEPOSIT,
    idents::ACCOUNT_DEPOSIT_BATCH,
    idents::ACCOUNT_TRY_DEPOSIT_OR_ABORT,
    idents::ACCOUNT_TRY_DEPOSIT_BATCH_OR_ABORT,
    idents::ACCOUNT_CREATE_PROOF_OF_AMOUNT,
    idents::ACCOUNT_CREATE_PROOF_OF_NON_FUNGIBLES,
    idents::ACCOUNT_LOCK_FEE,
    idents::ACCOUNT_LOCK_CONTINGENT_FEE,
    idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW,
    idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW_NON_FUNGIBLES,
];

/// Account methods allowed around a pool or validator interaction. Only
/// fungible withdrawals.
pub(crate) const ACCOUNT_FUNGIBLE_METHODS: &[&str] = &[
    idents::ACCOUNT_WITHDRAW,
    idents::ACCOUNT_DEPOSIT,
    idents::ACCOUNT_DEPOSIT_BATCH,
    idents::ACCOUNT_TRY_DEPOSIT_OR_ABORT,
    idents::ACCOUNT_TRY_DEPOSIT_BATCH_OR_ABORT,
    idents::ACCOUNT_CREATE_PROOF_OF_AMOUNT,
    idents::ACCOUNT_CREATE_PROOF_OF_NON_FUNGIBLES,
    idents::ACCOUNT_LOCK_FEE,
    idents::ACCOUNT_LOCK_CONTINGENT_FEE,
    idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW,
];

pub(crate) const ACCOUNT_WITHDRAWS: &[&str] = &idents::ACCOUNT_WITHDRAW_METHODS;

/// Deposits that cannot silently leave resources on the worktop.
pub(crate) const ACCOUNT_DEPOSITS: &[&str] = &[
    idents::ACCOUNT_DEPOSIT,
    idents::ACCOUNT_DEPOSIT_BATCH,
    idents::ACCOUNT_TRY_DEPOSIT_OR_ABORT,
    idents::ACCOUNT_TRY_DEPOSIT_BATCH_OR_ABORT,
];

pub(crate) const ACCESS_CONTROLLER_METHODS: &[&str] = &[idents::ACCESS_CONTROLLER_CREATE_PROOF];

/// Every built-in classifier, in [`ManifestClass`](crate::ManifestClass)
/// order.
pub fn default_classifiers() -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(GeneralClassifier),
        Box::new(TransferClassifier),
        Box::new(PoolContributionClassifier),
        Box::new(PoolRedemptionClassifier),
        Box::new(ValidatorStakeClassifier),
        Box::new(ValidatorUnstakeClassifier),
        Box::new(ValidatorClaimXrdClassifier),
        Box::new(AccountDepositSettingsUpdateClassifier),
    ]
}
