use std::fmt;
use std::str::FromStr;

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32m, Hrp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entity::EntityType;
use crate::error::TypeError;
use crate::network::{network_id_from_hrp, NetworkDefinition, NetworkId};
use crate::node_id::NodeId;
use crate::public_key::{PublicKey, PublicKeyHash};

/// A network-scoped reference to an on-ledger entity.
///
/// The string form is Bech32m with HRP `<entity prefix>_<network suffix>`,
/// e.g. `account_rdx1...`. Parsing checks the checksum, the entity byte, and
/// that the HRP agrees with both the entity type and the network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    node_id: NodeId,
    network_id: NetworkId,
    entity_type: EntityType,
}

impl Address {
    /// Pair a node id with a network. Fails if the entity byte is unknown.
    pub fn new(node_id: NodeId, network_id: NetworkId) -> Result<Self, TypeError> {
        let entity_type = EntityType::from_byte(node_id.as_bytes()[0])?;
        Ok(Self {
            node_id,
            network_id,
            entity_type,
        })
    }

    /// The preallocated account controlled by `public_key`.
    pub fn virtual_account(public_key: &PublicKey, network_id: NetworkId) -> Self {
        let (entity_type, body) = match public_key.hash() {
            PublicKeyHash::Ed25519(body) => (EntityType::GlobalPreallocatedEd25519Account, body),
            PublicKeyHash::Secp256k1(body) => {
                (EntityType::GlobalPreallocatedSecp256k1Account, body)
            }
        };
        Self::from_parts(entity_type, &body, network_id)
    }

    /// The preallocated identity controlled by `public_key`.
    pub fn virtual_identity(public_key: &PublicKey, network_id: NetworkId) -> Self {
        let (entity_type, body) = match public_key.hash() {
            PublicKeyHash::Ed25519(body) => (EntityType::GlobalPreallocatedEd25519Identity, body),
            PublicKeyHash::Secp256k1(body) => {
                (EntityType::GlobalPreallocatedSecp256k1Identity, body)
            }
        };
        Self::from_parts(entity_type, &body, network_id)
    }

    fn from_parts(entity_type: EntityType, body: &[u8; 29], network_id: NetworkId) -> Self {
        Self {
            node_id: NodeId::from_parts(entity_type, body),
            network_id,
            entity_type,
        }
    }

    /// Parse a Bech32m address string.
    pub fn from_bech32(s: &str) -> Result<Self, TypeError> {
        let checked = CheckedHrpstring::new::<Bech32m>(s)
            .map_err(|e| TypeError::Bech32(e.to_string()))?;
        let hrp = checked.hrp().to_string();
        let data: Vec<u8> = checked.byte_iter().collect();

        let node_id = NodeId::from_slice(&data)?;
        let network_id = network_id_from_hrp(&hrp)?;
        let address = Self::new(node_id, network_id)?;

        let expected = address.hrp();
        if hrp != expected {
            return Err(TypeError::HrpMismatch {
                expected,
                actual: hrp,
            });
        }
        Ok(address)
    }

    /// Render the Bech32m string.
    pub fn to_bech32(&self) -> Result<String, TypeError> {
        let hrp = Hrp::parse(&self.hrp()).map_err(|e| TypeError::Bech32(e.to_string()))?;
        bech32::encode::<Bech32m>(hrp, self.node_id.as_bytes())
            .map_err(|e| TypeError::Bech32(e.to_string()))
    }

    /// Full HRP, e.g. `resource_tdx_2_`.
    pub fn hrp(&self) -> String {
        format!(
            "{}_{}",
            self.entity_type.hrp_prefix(),
            NetworkDefinition::from_id(self.network_id).hrp_suffix
        )
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// The same entity on another network.
    pub fn on_network(&self, network_id: NetworkId) -> Self {
        Self { network_id, ..*self }
    }

    pub fn is_global(&self) -> bool {
        self.entity_type.is_global()
    }

    pub fn is_account(&self) -> bool {
        self.entity_type.is_account()
    }

    pub fn is_identity(&self) -> bool {
        self.entity_type.is_identity()
    }

    pub fn is_resource(&self) -> bool {
        self.entity_type.is_resource()
    }

    pub fn is_package(&self) -> bool {
        self.entity_type.is_package()
    }

    pub fn is_pool(&self) -> bool {
        self.entity_type.is_pool()
    }

    pub fn is_validator(&self) -> bool {
        self.entity_type.is_validator()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_bech32().map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_bech32() {
            Ok(s) => write!(f, "Address({s})"),
            Err(_) => write!(f, "Address({:?}@{})", self.node_id, self.network_id),
        }
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let s = self.to_bech32().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_bech32(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known_addresses::node_ids;
    use crate::network::ids;
    use crate::public_key::{Ed25519PublicKey, Secp256k1PublicKey};

    const XRD_MAINNET: &str =
        "resource_rdx1tknxxxxxxxxxradxrdxxxxxxxxx009923554798xxxxxxxxxradxrd";
    const FAUCET_SIMULATOR: &str =
        "component_sim1cptxxxxxxxxxfaucetxxxxxxxxx000527798379xxxxxxxxxhkrefh";

    #[test]
    fn renders_well_known_addresses() {
        let xrd = Address::new(node_ids::XRD, ids::MAINNET).unwrap();
        assert_eq!(xrd.to_string(), XRD_MAINNET);
        let faucet = Address::new(node_ids::FAUCET, ids::SIMULATOR).unwrap();
        assert_eq!(faucet.to_string(), FAUCET_SIMULATOR);
    }

    #[test]
    fn parse_roundtrip() {
        let xrd: Address = XRD_MAINNET.parse().unwrap();
        assert_eq!(xrd.network_id(), ids::MAINNET);
        assert_eq!(xrd.entity_type(), EntityType::GlobalFungibleResourceManager);
        assert_eq!(xrd.node_id(), &node_ids::XRD);
        assert_eq!(xrd.to_string(), XRD_MAINNET);
    }

    #[test]
    fn same_node_differs_per_network() {
        let mainnet = Address::new(node_ids::XRD, ids::MAINNET).unwrap();
        let stokenet = mainnet.on_network(ids::STOKENET);
        assert_ne!(mainnet.to_string(), stokenet.to_string());
        assert!(stokenet.to_string().starts_with("resource_tdx_2_1"));
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut corrupted = XRD_MAINNET.to_string();
        corrupted.pop();
        corrupted.push('q');
        assert!(matches!(
            corrupted.parse::<Address>(),
            Err(TypeError::Bech32(_))
        ));
    }

    #[test]
    fn rejects_hrp_that_disagrees_with_entity() {
        let hrp = Hrp::parse("account_rdx").unwrap();
        let s = bech32::encode::<Bech32m>(hrp, node_ids::XRD.as_bytes()).unwrap();
        assert_eq!(
            s.parse::<Address>(),
            Err(TypeError::HrpMismatch {
                expected: "resource_rdx".into(),
                actual: "account_rdx".into(),
            })
        );
    }

    #[test]
    fn virtual_account_is_deterministic_and_typed() {
        let key = PublicKey::Ed25519(Ed25519PublicKey([0x11; 32]));
        let a = Address::virtual_account(&key, ids::MAINNET);
        let b = Address::virtual_account(&key, ids::MAINNET);
        assert_eq!(a, b);
        assert_eq!(a.entity_type(), EntityType::GlobalPreallocatedEd25519Account);
        assert_eq!(&a.node_id().as_bytes()[1..], key.hash().as_bytes());
        assert_eq!(
            a.to_string(),
            "account_rdx1284vgk4yrqj7p0plsa2hptcxrt9lpw2s446jlu8egcl7zwk4ad9rfj"
        );
    }

    #[test]
    fn virtual_identity_uses_identity_entity() {
        let key = PublicKey::Secp256k1(Secp256k1PublicKey([0x02; 33]));
        let identity = Address::virtual_identity(&key, ids::STOKENET);
        assert_eq!(
            identity.entity_type(),
            EntityType::GlobalPreallocatedSecp256k1Identity
        );
        assert!(identity.to_string().starts_with("identity_tdx_2_1"));
        let account = Address::virtual_account(&key, ids::STOKENET);
        assert_eq!(&account.node_id().as_bytes()[1..], &identity.node_id().as_bytes()[1..]);
    }

    #[test]
    fn serde_as_bech32_string() {
        let xrd: Address = XRD_MAINNET.parse().unwrap();
        let json = serde_json::to_string(&xrd).unwrap();
        assert_eq!(json, format!("\"{XRD_MAINNET}\""));
        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, xrd);
    }
}
