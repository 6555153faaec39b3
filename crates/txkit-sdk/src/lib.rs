//! High-level SDK for txkit.
//!
//! Provides one entry point, [`Toolkit`], over manifest building, manifest
//! analysis, and transaction assembly, driven by a [`ToolkitConfig`] that can
//! be loaded from TOML. The lower-level crates' main types are re-exported so
//! most applications only depend on this crate.

pub mod config;
pub mod error;
pub mod toolkit;

pub use config::ToolkitConfig;
pub use error::{SdkError, SdkResult};
pub use toolkit::Toolkit;

// Re-export key types
pub use txkit_analysis::{ManifestClass, ManifestSummary};
pub use txkit_crypto::{ContentHasher, PrivateKey, Signature, SignatureWithPublicKey, Signer};
pub use txkit_manifest::{Assertion, Instruction, Manifest, ManifestBuilder, ManifestModifications};
pub use txkit_sbor::{DecoderLimits, ManifestValue};
pub use txkit_transaction::{
    Intent, IntentHash, Message, NotarizedTransaction, NotarizedTransactionHash, PayloadKind,
    SignedIntent, SignedIntentHash, SigningBuilder, TransactionBuilder, TransactionHeader,
    ValidationReport, ViolationKind,
};
pub use txkit_types::{
    known_addresses, Address, Curve, Decimal, Hash, NetworkDefinition, NetworkId, PublicKey,
};
