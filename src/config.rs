use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

use crate::agtype_parser::DEFAULT_MAX_DEPTH;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Decoder configuration with validation
#[derive(Clone, Debug, PartialEq, Eq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum nesting of objects, arrays and paths in one value
    #[validate(range(
        min = 1,
        max = 1024,
        message = "Max depth must be between 1 and 1024"
    ))]
    pub max_depth: u32,

    /// Whether each path edge must join the vertices on either side of it
    pub verify_paths: bool,

    /// Whether a cached id seen again under another label is an error
    /// (otherwise it is logged and the cached element is returned)
    pub strict_identity: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            verify_paths: true,
            strict_identity: true,
        }
    }
}

impl DecoderConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            max_depth: parse_env_var("AGEGRAPH_MAX_DEPTH", "128")?,
            verify_paths: parse_env_var("AGEGRAPH_VERIFY_PATHS", "true")?,
            strict_identity: parse_env_var("AGEGRAPH_STRICT_IDENTITY", "true")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from a JSON document; missing fields keep their defaults
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            field: "json_content".to_string(),
            value: content.to_string(),
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.trim().parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
