use std::fmt;

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32m, Hrp};
use serde::{Deserialize, Serialize};
use txkit_types::{Hash, NetworkDefinition, NetworkId, TypeError};

macro_rules! transaction_hash {
    ($(#[$meta:meta])* $name:ident, $hrp_prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Hash);

        impl $name {
            /// HRP prefix; the network suffix follows it.
            pub const HRP_PREFIX: &'static str = $hrp_prefix;

            pub fn as_hash(&self) -> &Hash {
                &self.0
            }

            pub fn hrp(network_id: NetworkId) -> String {
                format!(
                    "{}{}",
                    Self::HRP_PREFIX,
                    NetworkDefinition::from_id(network_id).hrp_suffix
                )
            }

            /// Bech32m form on `network_id`.
            pub fn to_bech32(&self, network_id: NetworkId) -> Result<String, TypeError> {
                encode_bech32(&Self::hrp(network_id), &self.0)
            }

            /// Parse the Bech32m form, requiring the HRP of `network_id`.
            pub fn from_bech32(s: &str, network_id: NetworkId) -> Result<Self, TypeError> {
                decode_bech32(s, &Self::hrp(network_id)).map(Self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0.short_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl From<Hash> for $name {
            fn from(hash: Hash) -> Self {
                Self(hash)
            }
        }
    };
}

transaction_hash!(
    /// Hash of a compiled intent; the transaction id.
    IntentHash,
    "txid_"
);
transaction_hash!(
    /// Hash of a compiled signed intent; what the notary signs.
    SignedIntentHash,
    "signedintent_"
);
transaction_hash!(
    /// Hash of a compiled notarized transaction.
    NotarizedTransactionHash,
    "notarizedtransaction_"
);

fn encode_bech32(hrp: &str, hash: &Hash) -> Result<String, TypeError> {
    let hrp = Hrp::parse(hrp).map_err(|e| TypeError::Bech32(e.to_string()))?;
    bech32::encode::<Bech32m>(hrp, hash.as_bytes()).map_err(|e| TypeError::Bech32(e.to_string()))
}

fn decode_bech32(s: &str, expected_hrp: &str) -> Result<Hash, TypeError> {
    let checked =
        CheckedHrpstring::new::<Bech32m>(s).map_err(|e| TypeError::Bech32(e.to_string()))?;
    let hrp = checked.hrp().to_string();
    if hrp != expected_hrp {
        return Err(TypeError::HrpMismatch {
            expected: expected_hrp.to_string(),
            actual: hrp,
        });
    }
    let data: Vec<u8> = checked.byte_iter().collect();
    Hash::from_slice(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bech32_form_carries_prefix_and_network() {
        let hash = IntentHash(Hash::of(b"intent"));
        let mainnet = hash.to_bech32(1).unwrap();
        assert!(mainnet.starts_with("txid_rdx1"));
        assert!(hash.to_bech32(2).unwrap().starts_with("txid_tdx_2_1"));
        assert_eq!(IntentHash::from_bech32(&mainnet, 1).unwrap(), hash);
    }

    #[test]
    fn wrong_network_or_kind_is_rejected() {
        let hash = Hash::of(b"x");
        let s = SignedIntentHash(hash).to_bech32(1).unwrap();
        assert!(s.starts_with("signedintent_rdx1"));
        assert!(matches!(
            SignedIntentHash::from_bech32(&s, 2),
            Err(TypeError::HrpMismatch { .. })
        ));
        assert!(matches!(
            NotarizedTransactionHash::from_bech32(&s, 1),
            Err(TypeError::HrpMismatch { .. })
        ));
    }

    #[test]
    fn serde_is_the_hash() {
        let hash = NotarizedTransactionHash(Hash::of(b"n"));
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, serde_json::to_string(&Hash::of(b"n")).unwrap());
        let back: NotarizedTransactionHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
