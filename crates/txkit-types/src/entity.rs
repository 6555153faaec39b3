use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Kind of on-ledger entity, encoded as the first byte of its [`NodeId`].
///
/// [`NodeId`]: crate::NodeId
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityType {
    GlobalPackage = 0x0d,
    GlobalConsensusManager = 0x86,
    GlobalValidator = 0x83,
    GlobalTransactionTracker = 0x82,
    GlobalGenericComponent = 0xc0,
    GlobalAccount = 0xc1,
    GlobalIdentity = 0xc2,
    GlobalAccessController = 0xc3,
    GlobalOneResourcePool = 0xc4,
    GlobalTwoResourcePool = 0xc5,
    GlobalMultiResourcePool = 0xc6,
    GlobalAccountLocker = 0xc7,
    GlobalPreallocatedSecp256k1Account = 0xd1,
    GlobalPreallocatedEd25519Account = 0x51,
    GlobalPreallocatedSecp256k1Identity = 0xd2,
    GlobalPreallocatedEd25519Identity = 0x52,
    GlobalFungibleResourceManager = 0x5d,
    GlobalNonFungibleResourceManager = 0x9a,
    InternalFungibleVault = 0x58,
    InternalNonFungibleVault = 0x98,
    InternalGenericComponent = 0xf8,
    InternalKeyValueStore = 0xb0,
}

impl EntityType {
    pub const ALL: [EntityType; 22] = [
        Self::GlobalPackage,
        Self::GlobalConsensusManager,
        Self::GlobalValidator,
        Self::GlobalTransactionTracker,
        Self::GlobalGenericComponent,
        Self::GlobalAccount,
        Self::GlobalIdentity,
        Self::GlobalAccessController,
        Self::GlobalOneResourcePool,
        Self::GlobalTwoResourcePool,
        Self::GlobalMultiResourcePool,
        Self::GlobalAccountLocker,
        Self::GlobalPreallocatedSecp256k1Account,
        Self::GlobalPreallocatedEd25519Account,
        Self::GlobalPreallocatedSecp256k1Identity,
        Self::GlobalPreallocatedEd25519Identity,
        Self::GlobalFungibleResourceManager,
        Self::GlobalNonFungibleResourceManager,
        Self::InternalFungibleVault,
        Self::InternalNonFungibleVault,
        Self::InternalGenericComponent,
        Self::InternalKeyValueStore,
    ];

    pub fn from_byte(byte: u8) -> Result<Self, TypeError> {
        Self::ALL
            .iter()
            .copied()
            .find(|entity| *entity as u8 == byte)
            .ok_or(TypeError::UnknownEntityType(byte))
    }

    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Entity part of the Bech32m HRP, before the network suffix.
    pub const fn hrp_prefix(self) -> &'static str {
        match self {
            Self::GlobalPackage => "package",
            Self::GlobalConsensusManager => "consensusmanager",
            Self::GlobalValidator => "validator",
            Self::GlobalTransactionTracker => "transactiontracker",
            Self::GlobalGenericComponent => "component",
            Self::GlobalAccount
            | Self::GlobalPreallocatedSecp256k1Account
            | Self::GlobalPreallocatedEd25519Account => "account",
            Self::GlobalIdentity
            | Self::GlobalPreallocatedSecp256k1Identity
            | Self::GlobalPreallocatedEd25519Identity => "identity",
            Self::GlobalAccessController => "accesscontroller",
            Self::GlobalOneResourcePool
            | Self::GlobalTwoResourcePool
            | Self::GlobalMultiResourcePool => "pool",
            Self::GlobalAccountLocker => "locker",
            Self::GlobalFungibleResourceManager | Self::GlobalNonFungibleResourceManager => {
                "resource"
            }
            Self::InternalFungibleVault | Self::InternalNonFungibleVault => "internal_vault",
            Self::InternalGenericComponent => "internal_component",
            Self::InternalKeyValueStore => "internal_keyvaluestore",
        }
    }

    pub const fn is_global(self) -> bool {
        !self.is_internal()
    }

    pub const fn is_internal(self) -> bool {
        matches!(
            self,
            Self::InternalFungibleVault
                | Self::InternalNonFungibleVault
                | Self::InternalGenericComponent
                | Self::InternalKeyValueStore
        )
    }

    pub const fn is_account(self) -> bool {
        matches!(
            self,
            Self::GlobalAccount
                | Self::GlobalPreallocatedSecp256k1Account
                | Self::GlobalPreallocatedEd25519Account
        )
    }

    pub const fn is_identity(self) -> bool {
        matches!(
            self,
            Self::GlobalIdentity
                | Self::GlobalPreallocatedSecp256k1Identity
                | Self::GlobalPreallocatedEd25519Identity
        )
    }

    /// Preallocated ("virtual") entities exist implicitly for every public key.
    pub const fn is_preallocated(self) -> bool {
        matches!(
            self,
            Self::GlobalPreallocatedSecp256k1Account
                | Self::GlobalPreallocatedEd25519Account
                | Self::GlobalPreallocatedSecp256k1Identity
                | Self::GlobalPreallocatedEd25519Identity
        )
    }

    pub const fn is_resource(self) -> bool {
        matches!(
            self,
            Self::GlobalFungibleResourceManager | Self::GlobalNonFungibleResourceManager
        )
    }

    pub const fn is_fungible_resource(self) -> bool {
        matches!(self, Self::GlobalFungibleResourceManager)
    }

    pub const fn is_non_fungible_resource(self) -> bool {
        matches!(self, Self::GlobalNonFungibleResourceManager)
    }

    pub const fn is_package(self) -> bool {
        matches!(self, Self::GlobalPackage)
    }

    pub const fn is_pool(self) -> bool {
        matches!(
            self,
            Self::GlobalOneResourcePool | Self::GlobalTwoResourcePool | Self::GlobalMultiResourcePool
        )
    }

    pub const fn is_validator(self) -> bool {
        matches!(self, Self::GlobalValidator)
    }

    pub const fn is_vault(self) -> bool {
        matches!(self, Self::InternalFungibleVault | Self::InternalNonFungibleVault)
    }

    /// Global entities that can receive method calls.
    pub const fn is_global_component(self) -> bool {
        self.is_global() && !self.is_resource() && !self.is_package()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl TryFrom<u8> for EntityType {
    type Error = TypeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte)
    }
}
