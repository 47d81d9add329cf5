//! Configuration System
//!
//! Layered configuration for the treepatch CLI and for callers that want
//! tree defaults from files. Sources, lowest to highest precedence: built-in
//! defaults, the global config file, the workspace `treepatch.toml`, then
//! `TREEPATCH_`-prefixed environment variables.

use crate::entry::Entry;
use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::patch;
use crate::tree::TreeOptions;
use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

mod merge;
mod sources;

pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreepatchConfig {
    /// Tree construction and comparison settings
    #[serde(default)]
    pub tree: TreeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tree construction and comparison settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Sort input lists and add implied parent directories
    #[serde(default = "default_sort_and_expand")]
    pub sort_and_expand: bool,

    /// Equality predicate used when calculating patches
    #[serde(default)]
    pub equality: EqualityMode,
}

fn default_sort_and_expand() -> bool {
    true
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            sort_and_expand: default_sort_and_expand(),
            equality: EqualityMode::default(),
        }
    }
}

impl TreeConfig {
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            sort_and_expand: self.sort_and_expand,
            root: None,
        }
    }
}

/// Named equality predicates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EqualityMode {
    /// Size, mtime and mode ([`patch::default_is_equal`])
    #[default]
    Metadata,
    /// Checksums when present ([`patch::checksum_is_equal`])
    Checksum,
}

impl EqualityMode {
    pub fn predicate(&self) -> fn(&Entry, &Entry) -> bool {
        match self {
            EqualityMode::Metadata => patch::default_is_equal,
            EqualityMode::Checksum => patch::checksum_is_equal,
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "metadata" => Ok(EqualityMode::Metadata),
            "checksum" => Ok(EqualityMode::Checksum),
            other => Err(ConfigError::Invalid(format!(
                "Unknown equality mode: {} (must be 'metadata' or 'checksum')",
                other
            ))),
        }
    }
}

impl TreepatchConfig {
    /// Validate values that serde accepts but the rest of the crate cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.format.as_str() {
            "json" | "text" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "logging.format must be 'json' or 'text', got '{}'",
                    other
                )))
            }
        }
        match self.logging.output.as_str() {
            "stdout" | "stderr" | "file" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.output must be 'stdout', 'stderr' or 'file', got '{}'",
                other
            ))),
        }
    }
}

/// Loads [`TreepatchConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace directory
    pub fn load(workspace_root: &Path) -> Result<TreepatchConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(
            Environment::with_prefix("TREEPATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: TreepatchConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(workspace = %workspace_root.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from one explicit file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<TreepatchConfig, ConfigError> {
        let config: TreepatchConfig = merge::merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
