use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use txkit_manifest::Instruction;
use txkit_sbor::ManifestAddress;
use txkit_types::known_addresses::node_ids;
use txkit_types::{EntityType, NodeId};

// ---------------------------------------------------------------------------
// EntityGroup
// ---------------------------------------------------------------------------

/// Coarse grouping of entity types that classification rules match on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityGroup {
    Account,
    Identity,
    Pool,
    Validator,
    AccessController,
    AccountLocker,
    GenericComponent,
    Resource,
    Package,
    Internal,
    System,
}

impl From<EntityType> for EntityGroup {
    fn from(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::GlobalAccount
            | EntityType::GlobalPreallocatedSecp256k1Account
            | EntityType::GlobalPreallocatedEd25519Account => Self::Account,
            EntityType::GlobalIdentity
            | EntityType::GlobalPreallocatedSecp256k1Identity
            | EntityType::GlobalPreallocatedEd25519Identity => Self::Identity,
            EntityType::GlobalOneResourcePool
            | EntityType::GlobalTwoResourcePool
            | EntityType::GlobalMultiResourcePool => Self::Pool,
            EntityType::GlobalValidator => Self::Validator,
            EntityType::GlobalAccessController => Self::AccessController,
            EntityType::GlobalAccountLocker => Self::AccountLocker,
            EntityType::GlobalGenericComponent => Self::GenericComponent,
            EntityType::GlobalFungibleResourceManager
            | EntityType::GlobalNonFungibleResourceManager => Self::Resource,
            EntityType::GlobalPackage => Self::Package,
            EntityType::InternalFungibleVault
            | EntityType::InternalNonFungibleVault
            | EntityType::InternalGenericComponent
            | EntityType::InternalKeyValueStore => Self::Internal,
            EntityType::GlobalConsensusManager | EntityType::GlobalTransactionTracker => {
                Self::System
            }
        }
    }
}

// ---------------------------------------------------------------------------
// InstructionGroup
// ---------------------------------------------------------------------------

/// Families of instructions that classification rules permit or forbid
/// wholesale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionGroup {
    TakeFromWorktop,
    /// Only `TakeNonFungiblesFromWorktop`; some rules single it out.
    TakeNonFungiblesFromWorktop,
    ReturnToWorktop,
    Assertion,
    Proof,
    BurnResource,
    CallFunction,
    CallMethod,
    /// Royalty, metadata, and role assignment module calls.
    CallModuleMethod,
    CallDirectVaultMethod,
    AddressAllocation,
}

impl InstructionGroup {
    pub fn of(instruction: &Instruction) -> Self {
        match instruction {
            Instruction::TakeFromWorktop { .. } | Instruction::TakeAllFromWorktop { .. } => {
                Self::TakeFromWorktop
            }
            Instruction::TakeNonFungiblesFromWorktop { .. } => Self::TakeNonFungiblesFromWorktop,
            Instruction::ReturnToWorktop { .. } => Self::ReturnToWorktop,
            Instruction::AssertWorktopContains { .. }
            | Instruction::AssertWorktopContainsNonFungibles { .. }
            | Instruction::AssertWorktopContainsAny { .. } => Self::Assertion,
            Instruction::PopFromAuthZone
            | Instruction::PushToAuthZone { .. }
            | Instruction::DropAuthZoneProofs
            | Instruction::DropAuthZoneRegularProofs
            | Instruction::DropAuthZoneSignatureProofs
            | Instruction::CreateProofFromAuthZoneOfAmount { .. }
            | Instruction::CreateProofFromAuthZoneOfNonFungibles { .. }
            | Instruction::CreateProofFromAuthZoneOfAll { .. }
            | Instruction::CreateProofFromBucketOfAmount { .. }
            | Instruction::CreateProofFromBucketOfNonFungibles { .. }
            | Instruction::CreateProofFromBucketOfAll { .. }
            | Instruction::CloneProof { .. }
            | Instruction::DropProof { .. }
            | Instruction::DropNamedProofs
            | Instruction::DropAllProofs => Self::Proof,
            Instruction::BurnResource { .. } => Self::BurnResource,
            Instruction::CallFunction { .. } => Self::CallFunction,
            Instruction::CallMethod { .. } => Self::CallMethod,
            Instruction::CallRoyaltyMethod { .. }
            | Instruction::CallMetadataMethod { .. }
            | Instruction::CallRoleAssignmentMethod { .. } => Self::CallModuleMethod,
            Instruction::CallDirectVaultMethod { .. } => Self::CallDirectVaultMethod,
            Instruction::AllocateGlobalAddress { .. } => Self::AddressAllocation,
        }
    }

    /// Worktop, assertion, and proof handling; every class except account
    /// settings updates allows these.
    pub fn is_resource_plumbing(self) -> bool {
        matches!(
            self,
            Self::TakeFromWorktop
                | Self::TakeNonFungiblesFromWorktop
                | Self::ReturnToWorktop
                | Self::Assertion
                | Self::Proof
        )
    }
}

// ---------------------------------------------------------------------------
// NamedAddressStore
// ---------------------------------------------------------------------------

/// Entity types of the addresses a manifest allocates, by named address id.
#[derive(Clone, Debug, Default)]
pub struct NamedAddressStore {
    entries: IndexMap<u32, EntityType>,
}

impl NamedAddressStore {
    /// Record an `AllocateGlobalAddress`. Ids are handed out in order.
    pub fn allocate(&mut self, package: &NodeId, blueprint_name: &str) {
        let id = self.entries.len() as u32;
        self.entries
            .insert(id, allocated_entity_type(package, blueprint_name));
    }

    pub fn get(&self, id: u32) -> Option<EntityType> {
        self.entries.get(&id).copied()
    }
}

/// Entity type of a component allocated from a blueprint. Blueprints outside
/// the native packages produce generic components.
fn allocated_entity_type(package: &NodeId, blueprint_name: &str) -> EntityType {
    match (*package, blueprint_name) {
        (node_ids::ACCOUNT_PACKAGE, "Account") => EntityType::GlobalAccount,
        (node_ids::IDENTITY_PACKAGE, "Identity") => EntityType::GlobalIdentity,
        (node_ids::ACCESS_CONTROLLER_PACKAGE, "AccessController") => {
            EntityType::GlobalAccessController
        }
        (node_ids::POOL_PACKAGE, "OneResourcePool") => EntityType::GlobalOneResourcePool,
        (node_ids::POOL_PACKAGE, "TwoResourcePool") => EntityType::GlobalTwoResourcePool,
        (node_ids::POOL_PACKAGE, "MultiResourcePool") => EntityType::GlobalMultiResourcePool,
        (node_ids::RESOURCE_PACKAGE, "FungibleResourceManager") => {
            EntityType::GlobalFungibleResourceManager
        }
        (node_ids::RESOURCE_PACKAGE, "NonFungibleResourceManager") => {
            EntityType::GlobalNonFungibleResourceManager
        }
        (node_ids::PACKAGE_PACKAGE, "Package") => EntityType::GlobalPackage,
        _ => EntityType::GlobalGenericComponent,
    }
}

// ---------------------------------------------------------------------------
// InstructionContext
// ---------------------------------------------------------------------------

/// Everything a classification rule sees about one instruction.
#[derive(Clone, Copy, Debug)]
pub struct InstructionContext<'a> {
    /// Position of the instruction in the manifest.
    pub index: usize,
    pub instruction: &'a Instruction,
    pub group: InstructionGroup,
    /// Entity type of the method receiver, when it can be resolved.
    pub receiver: Option<EntityType>,
}

impl<'a> InstructionContext<'a> {
    pub fn new(index: usize, instruction: &'a Instruction, named: &NamedAddressStore) -> Self {
        let receiver = match instruction {
            Instruction::CallMethod { address, .. }
            | Instruction::CallRoyaltyMethod { address, .. }
            | Instruction::CallMetadataMethod { address, .. }
            | Instruction::CallRoleAssignmentMethod { address, .. } => match address {
                ManifestAddress::Static(node_id) => node_id.entity_type(),
                ManifestAddress::Named(id) => named.get(*id),
            },
            Instruction::CallDirectVaultMethod { address, .. } => address.entity_type(),
            _ => None,
        };
        Self {
            index,
            instruction,
            group: InstructionGroup::of(instruction),
            receiver,
        }
    }

    pub fn receiver_group(&self) -> Option<EntityGroup> {
        self.receiver.map(EntityGroup::from)
    }

    /// Method name of a main-module `CallMethod`.
    pub fn method_name(&self) -> Option<&'a str> {
        match self.instruction {
            Instruction::CallMethod { method_name, .. } => Some(method_name),
            _ => None,
        }
    }

    /// Whether this is a `CallMethod` on `group` invoking one of `methods`.
    pub fn calls(&self, group: EntityGroup, methods: &[&str]) -> bool {
        self.receiver_group() == Some(group)
            && self
                .method_name()
                .is_some_and(|method| methods.contains(&method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txkit_sbor::ManifestValue;

    #[test]
    fn preallocated_accounts_group_with_accounts() {
        assert_eq!(
            EntityGroup::from(EntityType::GlobalPreallocatedEd25519Account),
            EntityGroup::Account
        );
        assert_eq!(
            EntityGroup::from(EntityType::InternalFungibleVault),
            EntityGroup::Internal
        );
    }

    #[test]
    fn named_receivers_resolve_through_allocations() {
        let mut named = NamedAddressStore::default();
        named.allocate(&node_ids::ACCOUNT_PACKAGE, "Account");
        named.allocate(&node_ids::FAUCET_PACKAGE, "Faucet");

        let call = Instruction::CallMethod {
            address: ManifestAddress::Named(0),
            method_name: "deposit".into(),
            args: ManifestValue::unit(),
        };
        let context = InstructionContext::new(3, &call, &named);
        assert_eq!(context.receiver, Some(EntityType::GlobalAccount));
        assert!(context.calls(EntityGroup::Account, &["deposit"]));
        assert!(!context.calls(EntityGroup::Account, &["withdraw"]));
        assert_eq!(named.get(1), Some(EntityType::GlobalGenericComponent));
        assert_eq!(named.get(2), None);
    }

    #[test]
    fn module_calls_are_not_main_method_calls() {
        let call = Instruction::CallMetadataMethod {
            address: ManifestAddress::Static(node_ids::FAUCET),
            method_name: "set".into(),
            args: ManifestValue::unit(),
        };
        let context = InstructionContext::new(0, &call, &NamedAddressStore::default());
        assert_eq!(context.group, InstructionGroup::CallModuleMethod);
        assert_eq!(context.receiver_group(), Some(EntityGroup::GenericComponent));
        assert_eq!(context.method_name(), None);
    }
}
