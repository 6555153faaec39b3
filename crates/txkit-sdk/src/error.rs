use std::path::PathBuf;

use thiserror::Error;
use txkit_transaction::Violation;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("transaction failed validation: {}", describe(.0))]
    InvalidTransaction(Vec<Violation>),

    #[error(transparent)]
    Type(#[from] txkit_types::TypeError),

    #[error(transparent)]
    Builder(#[from] txkit_manifest::BuilderError),

    #[error(transparent)]
    Manifest(#[from] txkit_manifest::ManifestError),

    #[error(transparent)]
    Analysis(#[from] txkit_analysis::AnalysisError),

    #[error(transparent)]
    Transaction(#[from] txkit_transaction::TransactionError),
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.description.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type SdkResult<T> = Result<T, SdkError>;
