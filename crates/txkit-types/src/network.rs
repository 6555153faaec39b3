use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Network identifier. A small unsigned integer from a closed registry.
pub type NetworkId = u8;

/// Registered network ids.
pub mod ids {
    use super::NetworkId;

    pub const MAINNET: NetworkId = 0x01;
    pub const STOKENET: NetworkId = 0x02;
    pub const ADAPANET: NetworkId = 0x0a;
    pub const NEBUNET: NetworkId = 0x0b;
    pub const KISHARNET: NetworkId = 0x0c;
    pub const ANSHARNET: NetworkId = 0x0d;
    pub const GILGANET: NetworkId = 0x20;
    pub const ENKINET: NetworkId = 0x21;
    pub const HAMMUNET: NetworkId = 0x22;
    pub const NERGALNET: NetworkId = 0x23;
    pub const MARDUNET: NetworkId = 0x24;
    pub const DUMUNET: NetworkId = 0x25;
    pub const LOCALNET: NetworkId = 0xf0;
    pub const INTTESTNET: NetworkId = 0xf1;
    pub const SIMULATOR: NetworkId = 0xf2;
}

/// The closed registry: (id, logical name, hrp suffix).
const REGISTRY: &[(NetworkId, &str, &str)] = &[
    (ids::MAINNET, "mainnet", "rdx"),
    (ids::STOKENET, "stokenet", "tdx_2_"),
    (ids::ADAPANET, "adapanet", "tdx_a_"),
    (ids::NEBUNET, "nebunet", "tdx_b_"),
    (ids::KISHARNET, "kisharnet", "tdx_c_"),
    (ids::ANSHARNET, "ansharnet", "tdx_d_"),
    (ids::GILGANET, "gilganet", "tdx_20_"),
    (ids::ENKINET, "enkinet", "tdx_21_"),
    (ids::HAMMUNET, "hammunet", "tdx_22_"),
    (ids::NERGALNET, "nergalnet", "tdx_23_"),
    (ids::MARDUNET, "mardunet", "tdx_24_"),
    (ids::DUMUNET, "dumunet", "tdx_25_"),
    (ids::LOCALNET, "localnet", "loc"),
    (ids::INTTESTNET, "inttestnet", "test"),
    (ids::SIMULATOR, "simulator", "sim"),
];

/// Name and Bech32m HRP suffix of a network.
///
/// Every address and transaction hash string carries the suffix of the
/// network it belongs to, so the same node id renders differently on each
/// network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub id: NetworkId,
    pub logical_name: String,
    pub hrp_suffix: String,
}

impl NetworkDefinition {
    pub fn mainnet() -> Self {
        Self::from_id(ids::MAINNET)
    }

    pub fn stokenet() -> Self {
        Self::from_id(ids::STOKENET)
    }

    pub fn localnet() -> Self {
        Self::from_id(ids::LOCALNET)
    }

    pub fn simulator() -> Self {
        Self::from_id(ids::SIMULATOR)
    }

    /// Definition of any network id. Ids outside the registry get a
    /// `tdx_<hex>_` suffix and a synthetic name.
    pub fn from_id(id: NetworkId) -> Self {
        match REGISTRY.iter().find(|(known, _, _)| *known == id) {
            Some((id, name, suffix)) => Self {
                id: *id,
                logical_name: (*name).to_string(),
                hrp_suffix: (*suffix).to_string(),
            },
            None => Self {
                id,
                logical_name: format!("network_{id:x}"),
                hrp_suffix: format!("tdx_{id:x}_"),
            },
        }
    }

    /// Definition of a registered network, failing for unregistered ids.
    pub fn known(id: NetworkId) -> Result<Self, TypeError> {
        if Self::is_known(id) {
            Ok(Self::from_id(id))
        } else {
            Err(TypeError::UnknownNetwork(id))
        }
    }

    pub fn is_known(id: NetworkId) -> bool {
        REGISTRY.iter().any(|(known, _, _)| *known == id)
    }

    /// All registered networks, in registry order.
    pub fn all() -> Vec<Self> {
        REGISTRY.iter().map(|(id, _, _)| Self::from_id(*id)).collect()
    }
}

/// Recover the network id from a full HRP such as `account_tdx_2_`.
pub fn network_id_from_hrp(hrp: &str) -> Result<NetworkId, TypeError> {
    let unknown = || TypeError::UnknownHrp(hrp.to_string());
    let fixed = [
        ("_rdx", ids::MAINNET),
        ("_sim", ids::SIMULATOR),
        ("_loc", ids::LOCALNET),
        ("_test", ids::INTTESTNET),
    ];
    if let Some((_, id)) = fixed.iter().find(|(suffix, _)| hrp.ends_with(suffix)) {
        return Ok(*id);
    }

    let body = hrp.strip_suffix('_').ok_or_else(unknown)?;
    let start = body.rfind("_tdx_").ok_or_else(unknown)?;
    let digits = &body[start + "_tdx_".len()..];
    if digits.is_empty() || digits.len() > 2 {
        return Err(unknown());
    }
    u8::from_str_radix(digits, 16).map_err(|_| unknown())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_suffixes() {
        assert_eq!(NetworkDefinition::mainnet().hrp_suffix, "rdx");
        assert_eq!(NetworkDefinition::stokenet().hrp_suffix, "tdx_2_");
        assert_eq!(NetworkDefinition::from_id(ids::KISHARNET).hrp_suffix, "tdx_c_");
        assert_eq!(NetworkDefinition::from_id(ids::DUMUNET).hrp_suffix, "tdx_25_");
        assert_eq!(NetworkDefinition::simulator().logical_name, "simulator");
    }

    #[test]
    fn unregistered_id_gets_generic_suffix() {
        let def = NetworkDefinition::from_id(0x7e);
        assert_eq!(def.hrp_suffix, "tdx_7e_");
        assert!(!NetworkDefinition::is_known(0x7e));
        assert_eq!(
            NetworkDefinition::known(0x7e),
            Err(TypeError::UnknownNetwork(0x7e))
        );
    }

    #[test]
    fn network_id_from_hrp_reverses_every_registered_suffix() {
        for def in NetworkDefinition::all() {
            let hrp = format!("account_{}", def.hrp_suffix);
            assert_eq!(network_id_from_hrp(&hrp).unwrap(), def.id, "{hrp}");
        }
    }

    #[test]
    fn network_id_from_hrp_handles_prefixes_with_underscores() {
        assert_eq!(
            network_id_from_hrp("internal_vault_tdx_2_").unwrap(),
            ids::STOKENET
        );
        assert_eq!(network_id_from_hrp("internal_keyvaluestore_sim").unwrap(), ids::SIMULATOR);
    }

    #[test]
    fn network_id_from_hrp_rejects_garbage() {
        assert!(network_id_from_hrp("account").is_err());
        assert!(network_id_from_hrp("account_tdx__").is_err());
        assert!(network_id_from_hrp("account_tdx_123_").is_err());
        assert!(network_id_from_hrp("account_tdx_zz_").is_err());
    }
}
