use std::path::Path;

use serde::{Deserialize, Serialize};
use txkit_sbor::{DecoderLimits, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAYLOAD_SIZE};
use txkit_transaction::ValidationConfig;
use txkit_types::{network::ids, NetworkId};

use crate::error::{SdkError, SdkResult};

/// Toolkit settings.
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes:
///
/// ```toml
/// network_id = 2
/// max_decoder_depth = 16
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolkitConfig {
    /// Network manifests are built for and transactions are checked against.
    pub network_id: NetworkId,
    /// Nesting limit when decoding payloads.
    pub max_decoder_depth: usize,
    /// Largest payload accepted by the decoders, in bytes.
    pub max_payload_size: usize,
    /// Longest accepted epoch window.
    pub max_epoch_range: u64,
    /// Run the static validator before handing out compiled transactions.
    pub validate_on_compile: bool,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            network_id: ids::MAINNET,
            max_decoder_depth: DEFAULT_MAX_DEPTH,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            max_epoch_range: ValidationConfig::DEFAULT_MAX_EPOCH_RANGE,
            validate_on_compile: true,
        }
    }
}

impl ToolkitConfig {
    /// Defaults, on `network_id`.
    pub fn for_network(network_id: NetworkId) -> Self {
        Self {
            network_id,
            ..Default::default()
        }
    }

    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SdkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.max_decoder_depth == 0 {
            return Err(SdkError::Config("max_decoder_depth must be positive".into()));
        }
        if self.max_payload_size == 0 {
            return Err(SdkError::Config("max_payload_size must be positive".into()));
        }
        if self.max_epoch_range == 0 {
            return Err(SdkError::Config("max_epoch_range must be positive".into()));
        }
        Ok(())
    }

    pub fn decoder_limits(&self) -> DecoderLimits {
        DecoderLimits {
            max_depth: self.max_decoder_depth,
            max_payload_size: self.max_payload_size,
        }
    }

    pub fn validation_config(&self) -> ValidationConfig {
        ValidationConfig {
            max_epoch_range: self.max_epoch_range,
            decoder_limits: self.decoder_limits(),
            ..ValidationConfig::for_network(self.network_id)
        }
    }
}
