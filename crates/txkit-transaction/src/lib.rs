//! Transaction assembly for txkit.
//!
//! An [`Intent`] wraps a manifest with a [`TransactionHeader`] and a
//! [`Message`]. Signatories sign the intent hash, giving a [`SignedIntent`];
//! the notary signs the signed-intent hash, giving a
//! [`NotarizedTransaction`]. Every stage compiles to canonical bytes and
//! decompiles back.
//!
//! # Key Types
//!
//! - [`TransactionBuilder`] / [`SigningBuilder`]: Step-wise assembly
//! - [`Intent`], [`SignedIntent`], [`NotarizedTransaction`]: The three payloads
//! - [`IntentHash`]: The transaction id, with a Bech32m form
//! - [`TransactionValidator`]: Static checks on notarized transactions

pub mod builder;
pub mod error;
pub mod hash;
pub mod header;
pub mod intent;
pub mod message;
pub mod notarized;
pub mod payload;
pub mod signed;
pub mod validation;

pub use builder::{SigningBuilder, TransactionBuilder};
pub use error::{Result, TransactionError};
pub use hash::{IntentHash, NotarizedTransactionHash, SignedIntentHash};
pub use header::TransactionHeader;
pub use intent::Intent;
pub use message::{
    AesWrappedKey, DecryptorsByCurve, EncryptedMessage, Message, MessageContent, MessageLimits,
    PlainTextMessage,
};
pub use notarized::NotarizedTransaction;
pub use payload::PayloadKind;
pub use signed::SignedIntent;
pub use validation::{
    TransactionValidator, ValidationConfig, ValidationReport, Violation, ViolationKind,
};
