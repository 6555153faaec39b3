//! Hashing and signing for the transaction toolkit.
//!
//! Provides domain-separated Blake2b-256 hashing for transaction payloads and
//! an Ed25519 / Secp256k1 signing capability behind the [`Signer`] trait.
//!
//! All crypto operations wrap established libraries.
//!
//! # Key Types
//!
//! - [`ContentHasher`]: Blake2b-256 with a per-payload domain tag
//! - [`PrivateKey`]: Ed25519 or Secp256k1 private key
//! - [`Signature`]: Detached signature; Secp256k1 signatures are recoverable
//! - [`SignatureWithPublicKey`]: Intent signature carrying what is needed to
//!   identify the signer

pub mod error;
pub mod hasher;
pub mod keys;
pub mod signature;
pub mod signer;

pub use error::SignatureError;
pub use hasher::ContentHasher;
pub use keys::PrivateKey;
pub use signature::{Ed25519Signature, Secp256k1Signature, Signature, SignatureWithPublicKey};
pub use signer::Signer;
