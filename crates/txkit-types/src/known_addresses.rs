use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::TypeError;
use crate::network::{NetworkDefinition, NetworkId};
use crate::node_id::NodeId;

/// Node ids of entities created at genesis. They are identical on every
/// network; only the rendered address differs.
pub mod node_ids {
    use crate::node_id::NodeId;

    pub const XRD: NodeId = NodeId::new([
        0x5d, 0xa6, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x61, 0xf5, 0xa6,
        0x1b, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0x94, 0xaa,
        0x8d, 0x29, 0x5f, 0x14, 0xe6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const SECP256K1_SIGNATURE_RESOURCE: NodeId = NodeId::new([
        0x9a, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x68, 0x67, 0x01,
        0x82, 0x0c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xd7, 0x51,
        0x39, 0xd5, 0xaa, 0xd5, 0xe6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const ED25519_SIGNATURE_RESOURCE: NodeId = NodeId::new([
        0x9a, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x6c, 0xb5, 0x54,
        0x82, 0x0c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xa9, 0x51,
        0xd7, 0xa9, 0xe5, 0x47, 0xc6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const PACKAGE_OF_DIRECT_CALLER_RESOURCE: NodeId = NodeId::new([
        0x9a, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x60, 0xdb, 0x1f,
        0xf8, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xc7, 0x54,
        0x56, 0xab, 0xa2, 0xfb, 0xc6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const GLOBAL_CALLER_RESOURCE: NodeId = NodeId::new([
        0x9a, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x64, 0x7f, 0x1f,
        0xf8, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xaa, 0x34,
        0x7b, 0xdf, 0xaa, 0x51, 0xe6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const SYSTEM_EXECUTION_RESOURCE: NodeId = NodeId::new([
        0x9a, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x68, 0x12, 0x0b,
        0x34, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xab, 0x47,
        0x8c, 0x55, 0x47, 0xc7, 0xc6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const PACKAGE_OWNER_BADGE: NodeId = NodeId::new([
        0x9a, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x60, 0xd9, 0x0e,
        0x98, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xaa, 0x94,
        0x3d, 0x29, 0x1a, 0x3e, 0x86, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const VALIDATOR_OWNER_BADGE: NodeId = NodeId::new([
        0x9a, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x66, 0x34, 0x6e,
        0x98, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xd6, 0x3a,
        0xa2, 0xa9, 0x13, 0xc6, 0xa6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const ACCOUNT_OWNER_BADGE: NodeId = NodeId::new([
        0x9a, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x6e, 0xe3, 0x0e,
        0x98, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xeb, 0x5a,
        0xab, 0xd4, 0xa7, 0xe9, 0x46, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const IDENTITY_OWNER_BADGE: NodeId = NodeId::new([
        0x9a, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x66, 0xcd, 0x6e,
        0x98, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xa8, 0xfe,
        0xd5, 0x6b, 0x52, 0xa8, 0xe6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const CONSENSUS_MANAGER: NodeId = NodeId::new([
        0x86, 0x0c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x6c, 0x4e, 0x1b,
        0x40, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xbc, 0xa5,
        0x2e, 0xb5, 0x4a, 0x6a, 0x86, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const FAUCET: NodeId = NodeId::new([
        0xc0, 0x56, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x64, 0xf7, 0x98,
        0xca, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xbe, 0x8a,
        0xf7, 0x8a, 0x78, 0xf8, 0xa6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const GENESIS_HELPER: NodeId = NodeId::new([
        0xc0, 0x56, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x64, 0x66, 0x70,
        0x81, 0x8c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xbc, 0xbe,
        0xf4, 0x5e, 0xaa, 0x44, 0xa6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const PACKAGE_PACKAGE: NodeId = NodeId::new([
        0x0d, 0x90, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x60, 0xf7, 0x16,
        0x46, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xbf, 0xca,
        0xd6, 0xa3, 0x15, 0x2b, 0x46, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const ACCOUNT_PACKAGE: NodeId = NodeId::new([
        0x0d, 0x90, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x6e, 0xe3, 0x13,
        0x59, 0x8c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xbc, 0xaa,
        0x2e, 0x95, 0x4a, 0x96, 0x26, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const FAUCET_PACKAGE: NodeId = NodeId::new([
        0x0d, 0x90, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x64, 0xf7, 0x98,
        0xca, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xbd, 0xf1,
        0xac, 0x69, 0x43, 0xea, 0x26, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const IDENTITY_PACKAGE: NodeId = NodeId::new([
        0x0d, 0x90, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x66, 0xcd, 0x64,
        0x31, 0x8c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0x9e, 0x9a,
        0x7f, 0x8f, 0x17, 0x9c, 0xa6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const RESOURCE_PACKAGE: NodeId = NodeId::new([
        0x0d, 0x90, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x61, 0xe6, 0x03,
        0xc6, 0x4c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xbe, 0x91,
        0x3d, 0x63, 0xaa, 0xfb, 0xc6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const POOL_PACKAGE: NodeId = NodeId::new([
        0x0d, 0x90, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x60, 0xfc, 0xc6,
        0x31, 0x8c, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf5, 0x3e, 0x3e,
        0x2a, 0x94, 0xfa, 0x2a, 0xa6, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const ACCESS_CONTROLLER_PACKAGE: NodeId = NodeId::new([
        0x0d, 0x90, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x6c, 0x4d, 0x63,
        0xf8, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xbf, 0x55,
        0x3d, 0x3c, 0xa5, 0x16, 0x86, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);

    pub const CONSENSUS_MANAGER_PACKAGE: NodeId = NodeId::new([
        0x0d, 0x90, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0x6c, 0x4e, 0x1b,
        0x40, 0xcc, 0x63, 0x18, 0xc6, 0x31, 0x8c, 0xf7, 0xbf, 0xd5,
        0xd4, 0x5f, 0x48, 0xc6, 0x86, 0x31, 0x8c, 0x63, 0x18, 0xc6,
    ]);
}

/// Well-known resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAddresses {
    pub xrd: Address,
    pub secp256k1_signature_resource: Address,
    pub ed25519_signature_resource: Address,
    pub package_of_direct_caller_resource: Address,
    pub global_caller_resource: Address,
    pub system_execution_resource: Address,
    pub package_owner_badge: Address,
    pub validator_owner_badge: Address,
    pub account_owner_badge: Address,
    pub identity_owner_badge: Address,
}

/// Well-known native packages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageAddresses {
    pub package_package: Address,
    pub resource_package: Address,
    pub account_package: Address,
    pub identity_package: Address,
    pub consensus_manager_package: Address,
    pub access_controller_package: Address,
    pub pool_package: Address,
    pub faucet_package: Address,
}

/// Well-known components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentAddresses {
    pub consensus_manager: Address,
    pub genesis_helper: Address,
    pub faucet: Address,
}

/// All well-known addresses of one network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownAddresses {
    pub resource_addresses: ResourceAddresses,
    pub package_addresses: PackageAddresses,
    pub component_addresses: ComponentAddresses,
}

/// Look up the well-known addresses of a registered network.
///
/// This is a static table; networks outside the registry are rejected.
pub fn known_addresses(network_id: NetworkId) -> Result<KnownAddresses, TypeError> {
    NetworkDefinition::known(network_id)?;
    let at = |node_id: NodeId| Address::new(node_id, network_id);
    Ok(KnownAddresses {
        resource_addresses: ResourceAddresses {
            xrd: at(node_ids::XRD)?,
            secp256k1_signature_resource: at(node_ids::SECP256K1_SIGNATURE_RESOURCE)?,
            ed25519_signature_resource: at(node_ids::ED25519_SIGNATURE_RESOURCE)?,
            package_of_direct_caller_resource: at(node_ids::PACKAGE_OF_DIRECT_CALLER_RESOURCE)?,
            global_caller_resource: at(node_ids::GLOBAL_CALLER_RESOURCE)?,
            system_execution_resource: at(node_ids::SYSTEM_EXECUTION_RESOURCE)?,
            package_owner_badge: at(node_ids::PACKAGE_OWNER_BADGE)?,
            validator_owner_badge: at(node_ids::VALIDATOR_OWNER_BADGE)?,
            account_owner_badge: at(node_ids::ACCOUNT_OWNER_BADGE)?,
            identity_owner_badge: at(node_ids::IDENTITY_OWNER_BADGE)?,
        },
        package_addresses: PackageAddresses {
            package_package: at(node_ids::PACKAGE_PACKAGE)?,
            resource_package: at(node_ids::RESOURCE_PACKAGE)?,
            account_package: at(node_ids::ACCOUNT_PACKAGE)?,
            identity_package: at(node_ids::IDENTITY_PACKAGE)?,
            consensus_manager_package: at(node_ids::CONSENSUS_MANAGER_PACKAGE)?,
            access_controller_package: at(node_ids::ACCESS_CONTROLLER_PACKAGE)?,
            pool_package: at(node_ids::POOL_PACKAGE)?,
            faucet_package: at(node_ids::FAUCET_PACKAGE)?,
        },
        component_addresses: ComponentAddresses {
            consensus_manager: at(node_ids::CONSENSUS_MANAGER)?,
            genesis_helper: at(node_ids::GENESIS_HELPER)?,
            faucet: at(node_ids::FAUCET)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityType;
    use crate::network::ids;

    #[test]
    fn mainnet_xrd_and_faucet() {
        let known = known_addresses(ids::MAINNET).unwrap();
        assert_eq!(
            known.resource_addresses.xrd.to_string(),
            "resource_rdx1tknxxxxxxxxxradxrdxxxxxxxxx009923554798xxxxxxxxxradxrd"
        );
        assert_eq!(
            known.component_addresses.faucet.to_string(),
            "component_rdx1cptxxxxxxxxxfaucetxxxxxxxxx000527798379xxxxxxxxxfaucet"
        );
    }

    #[test]
    fn node_ids_are_shared_across_networks() {
        let mainnet = known_addresses(ids::MAINNET).unwrap();
        let stokenet = known_addresses(ids::STOKENET).unwrap();
        assert_eq!(
            mainnet.resource_addresses.xrd.node_id(),
            stokenet.resource_addresses.xrd.node_id()
        );
        assert_eq!(
            stokenet.resource_addresses.xrd.to_string(),
            "resource_tdx_2_1tknxxxxxxxxxradxrdxxxxxxxxx009923554798xxxxxxxxxtfd2jc"
        );
    }

    #[test]
    fn entity_types_match_roles() {
        let known = known_addresses(ids::SIMULATOR).unwrap();
        assert_eq!(
            known.resource_addresses.xrd.entity_type(),
            EntityType::GlobalFungibleResourceManager
        );
        assert_eq!(
            known.resource_addresses.account_owner_badge.entity_type(),
            EntityType::GlobalNonFungibleResourceManager
        );
        assert!(known.package_addresses.pool_package.is_package());
        assert_eq!(
            known.component_addresses.consensus_manager.entity_type(),
            EntityType::GlobalConsensusManager
        );
        assert_eq!(
            known.component_addresses.faucet.entity_type(),
            EntityType::GlobalGenericComponent
        );
    }

    #[test]
    fn unknown_network_is_rejected() {
        assert_eq!(
            known_addresses(0x7e),
            Err(TypeError::UnknownNetwork(0x7e))
        );
    }
}
