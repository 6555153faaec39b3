use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::context::{EntityGroup, InstructionContext};

// ---------------------------------------------------------------------------
// ManifestClass
// ---------------------------------------------------------------------------

/// A kind of transaction a manifest can be recognised as.
///
/// Classes overlap: a manifest may belong to several of them, or to none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManifestClass {
    General,
    Transfer,
    PoolContribution,
    PoolRedemption,
    ValidatorStake,
    ValidatorUnstake,
    ValidatorClaimXrd,
    AccountDepositSettingsUpdate,
}

impl fmt::Display for ManifestClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::General => "general",
            Self::Transfer => "transfer",
            Self::PoolContribution => "pool-contribution",
            Self::PoolRedemption => "pool-redemption",
            Self::ValidatorStake => "validator-stake",
            Self::ValidatorUnstake => "validator-unstake",
            Self::ValidatorClaimXrd => "validator-claim-xrd",
            Self::AccountDepositSettingsUpdate => "account-deposit-settings-update",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Requirement
// ---------------------------------------------------------------------------

/// Something a manifest must contain to belong to a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Requirement {
    /// At least one instruction of any kind.
    AnyInstruction,
    /// A `CallMethod` on an entity of `group` invoking one of `methods`.
    MethodCall {
        group: EntityGroup,
        methods: &'static [&'static str],
    },
    /// Every listed requirement, each met by some instruction.
    AllOf(Vec<Requirement>),
}

impl Requirement {
    pub fn method_call(group: EntityGroup, methods: &'static [&'static str]) -> Self {
        Self::MethodCall { group, methods }
    }

    /// Flatten nested `AllOf`s into the leaf requirements.
    fn into_leaves(self) -> Vec<Requirement> {
        match self {
            Self::AllOf(all) => all.into_iter().flat_map(Self::into_leaves).collect(),
            leaf => vec![leaf],
        }
    }

    fn is_met_by(&self, context: &InstructionContext<'_>) -> bool {
        match self {
            Self::AnyInstruction => true,
            Self::MethodCall { group, methods } => context.calls(*group, methods),
            Self::AllOf(all) => all.iter().all(|leaf| leaf.is_met_by(context)),
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier trait
// ---------------------------------------------------------------------------

/// The rules for one [`ManifestClass`].
///
/// A manifest belongs to the class when every instruction is permitted and
/// the requirement is met by the end of the manifest. Classifiers hold no
/// per-manifest state, so one set can summarize any number of manifests.
///
/// The trait is object-safe and `Send + Sync` so classifiers can be stored
/// in a `Vec<Box<dyn Classifier>>`.
pub trait Classifier: Send + Sync {
    fn class(&self) -> ManifestClass;

    /// Whether the instruction may appear in a manifest of this class.
    fn permits(&self, context: &InstructionContext<'_>) -> bool;

    fn requirement(&self) -> Requirement;
}

// ---------------------------------------------------------------------------
// ClassifierRun
// ---------------------------------------------------------------------------

/// Per-manifest progress of one classifier.
pub(crate) struct ClassifierRun<'c> {
    classifier: &'c dyn Classifier,
    permitted: bool,
    pending: Vec<Requirement>,
}

impl<'c> ClassifierRun<'c> {
    pub(crate) fn start(classifier: &'c dyn Classifier) -> Self {
        Self {
            classifier,
            permitted: true,
            pending: classifier.requirement().into_leaves(),
        }
    }

    pub(crate) fn observe(&mut self, context: &InstructionContext<'_>) {
        if !self.permitted {
            return;
        }
        if !self.classifier.permits(context) {
            trace!(
                class = %self.classifier.class(),
                index = context.index,
                "instruction not permitted"
            );
            self.permitted = false;
            return;
        }
        self.pending.retain(|leaf| !leaf.is_met_by(context));
    }

    /// The class, if the manifest qualified.
    pub(crate) fn finish(self) -> Option<ManifestClass> {
        (self.permitted && self.pending.is_empty()).then(|| self.classifier.class())
    }
}
