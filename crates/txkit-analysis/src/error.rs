use txkit_types::{NetworkId, TypeError};

/// Errors that can occur while summarizing a manifest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// A static address in the manifest has no known entity type.
    #[error("instruction {index}: {source}")]
    InvalidAddress {
        index: usize,
        #[source]
        source: TypeError,
    },

    /// The manifest was built for a different network.
    #[error("manifest is for network {manifest}, analysis requested for network {requested}")]
    NetworkMismatch {
        manifest: NetworkId,
        requested: NetworkId,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
