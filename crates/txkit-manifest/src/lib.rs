//! Transaction manifests.
//!
//! A manifest is an ordered list of instructions plus the blobs they
//! reference. Buckets, proofs, and address reservations are referred to by
//! positional ids on the wire; the [`ManifestBuilder`] lets callers use names
//! instead and resolves them as each instruction is appended.
//!
//! # Key Types
//!
//! - [`Instruction`]: One ledger operation, with its operands
//! - [`Manifest`]: Immutable instruction list bound to a network
//! - [`ManifestBuilder`]: Step-wise, name-checked manifest construction
//! - [`ManifestModifications`]: Wallet-side edits applied to a built manifest
//! - [`NameRecord`]: Name to id tables for builder-local names
//! - [`BuilderError`] / [`ManifestError`]: Construction and codec failures

pub mod builder;
pub mod error;
pub mod idents;
pub mod instruction;
pub mod manifest;
pub mod modify;
pub mod names;

pub use builder::{blob_ref, DefaultDepositRule, ManifestBuilder, FAUCET_FEE};
pub use error::{BuilderError, BuilderResult, ManifestError, NameKind, Result};
pub use instruction::Instruction;
pub use manifest::Manifest;
pub use modify::{Assertion, ManifestModifications};
pub use names::{validate_name, NameRecord};
