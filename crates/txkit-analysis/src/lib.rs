//! Static manifest analysis.
//!
//! [`summarize`] walks a manifest once and reports which transaction classes
//! it belongs to, which entities it touches, and how it interacts with
//! accounts and identities. Nothing is executed; the analysis sees only the
//! instructions and their arguments.
//!
//! # Key Types
//!
//! - [`ManifestAnalyzer`]: Classifier pipeline plus the fixed collectors
//! - [`Classifier`]: Permission and requirement rules for one class
//! - [`ManifestSummary`]: The result of a pass
//! - [`ManifestClass`]: Non-exclusive transaction classes

pub mod analyzer;
pub mod classifier;
pub mod classifiers;
pub mod context;
pub mod error;
pub mod summary;

pub use analyzer::{summarize, ManifestAnalyzer};
pub use classifier::{Classifier, ManifestClass, Requirement};
pub use context::{EntityGroup, InstructionContext, InstructionGroup, NamedAddressStore};
pub use error::{AnalysisError, Result};
pub use summary::{ManifestSummary, ProofSpecifier, ReservedInstruction};
