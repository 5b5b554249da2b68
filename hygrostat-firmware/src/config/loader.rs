//! Embedded configuration loader
//!
//! Decodes the postcard image of `node.toml` produced by the build script.

use defmt::*;

use hygrostat_core::config::{ConfigError, NodeConfig};

/// Postcard-encoded node configuration, produced by build.rs
static EMBEDDED_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/node_config.bin"));

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum LoadError {
    /// The embedded bytes are not a valid encoding of `NodeConfig`
    Deserialize,
    /// The decoded configuration failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Decode and re-validate the configuration compiled into the image
pub fn load_embedded() -> Result<NodeConfig, LoadError> {
    decode(EMBEDDED_CONFIG)
}

fn decode(bytes: &[u8]) -> Result<NodeConfig, LoadError> {
    let config: NodeConfig = postcard::from_bytes(bytes).map_err(|_| LoadError::Deserialize)?;
    config.validate()?;

    debug!(
        "Embedded config: {} bytes, version {}",
        bytes.len(),
        config.version
    );
    Ok(config)
}
