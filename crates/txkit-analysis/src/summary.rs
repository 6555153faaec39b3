use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use txkit_types::{Address, Decimal, NonFungibleLocalId};

use crate::classifier::ManifestClass;

/// Read-only projection of a manifest.
///
/// Every address collection keeps first-seen order and holds each address
/// once. Summarizing the same manifest twice gives equal summaries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSummary {
    /// Classes the manifest belongs to. May be empty.
    pub classification: BTreeSet<ManifestClass>,
    /// Every static address any instruction mentions.
    pub encountered_entities: IndexSet<Address>,
    pub accounts_deposited_into: IndexSet<Address>,
    pub accounts_withdrawn_from: IndexSet<Address>,
    /// Accounts whose owner must sign for the manifest to succeed.
    pub accounts_requiring_auth: IndexSet<Address>,
    pub identities_requiring_auth: IndexSet<Address>,
    /// Proofs created from accounts, per account.
    pub presented_proofs: IndexMap<Address, Vec<ProofSpecifier>>,
    /// Calls wallets should refuse to let third parties put in a manifest.
    pub reserved_instructions: IndexSet<ReservedInstruction>,
}

impl ManifestSummary {
    pub fn is_classified_as(&self, class: ManifestClass) -> bool {
        self.classification.contains(&class)
    }
}

/// What a proof created from an account proves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofSpecifier {
    Amount {
        resource_address: Address,
        amount: Decimal,
    },
    Ids {
        resource_address: Address,
        ids: Vec<NonFungibleLocalId>,
    },
}

impl ProofSpecifier {
    pub fn resource_address(&self) -> &Address {
        match self {
            Self::Amount {
                resource_address, ..
            }
            | Self::Ids {
                resource_address, ..
            } => resource_address,
        }
    }
}

/// Security-sensitive invocations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReservedInstruction {
    AccountLockFee,
    AccountSecurify,
    AccountUpdateOwnerKeysMetadataField,
    AccountLockOwnerKeysMetadataField,
    IdentitySecurify,
    IdentityUpdateOwnerKeysMetadataField,
    IdentityLockOwnerKeysMetadataField,
}
