//! Configuration types and loading for the hca tool.
//!
//! The main entry point is [`HcaConfig`], which represents the contents of
//! `.hca/config.yaml`. Configuration is loaded with [`load_config`], which
//! layers built-in defaults, the YAML file and `HCA_`-prefixed environment
//! variables (nested keys separated by `__`, e.g. `HCA_LOG__LEVEL`), and
//! saved with [`save_config`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use hca_lookup::{MigrationError, MigrationTable, PropertyResolver};
use hca_metadata::{BundleLoader, DeprecationPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file inside the `.hca/` directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Prefix of environment variables that override configuration values.
pub const ENV_PREFIX: &str = "HCA_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration could not be serialized.
    #[error("failed to write config file: {0}")]
    WriteError(#[from] serde_yaml::Error),

    /// The layered configuration (file plus environment) was invalid.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// The `.hca/` directory was not found.
    #[error("no .hca directory found")]
    HcaDirNotFound,

    /// The configured migration table could not be loaded.
    #[error("{}: {source}", .path.display())]
    Migrations {
        path: PathBuf,
        source: MigrationError,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Property migration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationsConfig {
    /// Migration table file (`{"migrations": [...]}`). Relative paths are
    /// resolved against the directory holding the configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Apply the curated override rules.
    #[serde(default = "default_true")]
    pub overrides: bool,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            path: None,
            overrides: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// A `tracing` filter directive such as `debug` or `hca_metadata=trace`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full hca configuration, corresponding to `.hca/config.yaml`.
///
/// All fields use `serde` defaults so that a partially-specified YAML file
/// deserializes with sensible default values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HcaConfig {
    #[serde(default)]
    pub migrations: MigrationsConfig,

    /// What to do with documents that use a deprecated schema.
    #[serde(default)]
    pub deprecation: DeprecationPolicy,

    #[serde(default)]
    pub log: LogConfig,
}

impl HcaConfig {
    /// Builds the property resolver this configuration describes.
    ///
    /// `base` is the directory relative migration paths are resolved from.
    pub fn resolver(&self, base: &Path) -> Result<PropertyResolver> {
        let mut resolver = PropertyResolver::new();
        if let Some(path) = &self.migrations.path {
            let path = if path.is_relative() {
                base.join(path)
            } else {
                path.clone()
            };
            let table = MigrationTable::load(&path)
                .map_err(|source| ConfigError::Migrations { path, source })?;
            resolver = resolver.with_authority(Arc::new(table));
        }
        if !self.migrations.overrides {
            resolver = resolver.with_overrides(Vec::new());
        }
        Ok(resolver)
    }

    /// Builds a bundle loader with this configuration's resolver and
    /// deprecation policy.
    pub fn loader(&self, base: &Path) -> Result<BundleLoader> {
        Ok(BundleLoader::new()
            .with_resolver(self.resolver(base)?)
            .with_deprecation(self.deprecation))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from `config.yaml` inside the given `.hca/` directory,
/// with `HCA_*` environment overrides applied on top.
///
/// If the file does not exist or is empty, only defaults and environment
/// overrides apply.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
/// or [`ConfigError::Invalid`] if the file or an override has an invalid
/// value.
pub fn load_config(hca_dir: &Path) -> Result<HcaConfig> {
    let config_path = hca_dir.join(CONFIG_FILE);

    let mut figment = Figment::from(Serialized::defaults(HcaConfig::default()));
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        // An empty file is valid and yields the defaults.
        if !content.trim().is_empty() {
            figment = figment.merge(Yaml::string(&content));
        }
    }
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
}

/// Save configuration to `config.yaml` inside the given `.hca/` directory.
///
/// The directory is created if it does not exist.
pub fn save_config(hca_dir: &Path, config: &HcaConfig) -> Result<()> {
    std::fs::create_dir_all(hca_dir)?;

    let config_path = hca_dir.join(CONFIG_FILE);
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(config_path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
