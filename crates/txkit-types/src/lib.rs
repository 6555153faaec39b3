//! Primitive types for the transaction toolkit.
//!
//! Every other `txkit` crate depends on `txkit-types`. The types here are
//! plain immutable values with canonical byte and string forms; the binary
//! value encoding lives in `txkit-sbor`.
//!
//! # Key Types
//!
//! - [`NetworkDefinition`]: Closed registry of network ids and their HRP suffixes
//! - [`EntityType`]: Entity tag carried in the first byte of every [`NodeId`]
//! - [`Address`]: Network-scoped, Bech32m-rendered entity reference
//! - [`Decimal`]: 192-bit fixed-point number with 18 fractional digits
//! - [`PublicKey`]: Ed25519 or Secp256k1 public key, with [`PublicKeyHash`]
//!   and [`PublicKeyFingerprint`] derivations
//! - [`Hash`]: Blake2b-256 digest
//! - [`NonFungibleLocalId`]: Local id of a non-fungible within its resource
//! - [`KnownAddresses`]: Well-known addresses of a network

pub mod address;
pub mod decimal;
pub mod entity;
pub mod error;
pub mod hash;
pub mod known_addresses;
pub mod network;
pub mod node_id;
pub mod non_fungible;
pub mod public_key;

pub use address::Address;
pub use decimal::Decimal;
pub use entity::EntityType;
pub use error::TypeError;
pub use hash::{blake2b_256, Hash};
pub use known_addresses::{
    known_addresses, ComponentAddresses, KnownAddresses, PackageAddresses, ResourceAddresses,
};
pub use network::{network_id_from_hrp, NetworkDefinition, NetworkId};
pub use node_id::NodeId;
pub use non_fungible::NonFungibleLocalId;
pub use public_key::{
    Curve, Ed25519PublicKey, PublicKey, PublicKeyFingerprint, PublicKeyHash, Secp256k1PublicKey,
};
