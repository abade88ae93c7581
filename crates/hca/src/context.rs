//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds all the state a command handler needs: the
//! resolved configuration directory, the effective configuration and the
//! global flags.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hca_config::{HcaConfig, find_hca_dir, load_config};
use hca_lookup::PropertyResolver;
use hca_metadata::{Bundle, BundleLoader};

use crate::bundle_dir::read_bundle_dir;
use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// The `.hca/` directory in use, if any was given or found.
    pub config_dir: Option<PathBuf>,

    /// Effective configuration: defaults, file, environment, then flags.
    pub config: HcaConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// The configuration directory is `--config` if given, otherwise the
    /// nearest `.hca/` found from the current directory. Without either,
    /// only defaults and environment overrides apply.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config_dir = match &global.config {
            Some(dir) => Some(dir.clone()),
            None => env::current_dir().ok().and_then(|cwd| find_hca_dir(&cwd)),
        };

        let mut config = match &config_dir {
            Some(dir) => load_config(dir)
                .with_context(|| format!("failed to load configuration from {}", dir.display()))?,
            None => load_config(Path::new(".hca")).context("failed to load configuration")?,
        };
        if let Some(policy) = global.deprecation {
            config.deprecation = policy;
        }

        Ok(Self {
            config_dir,
            config,
            json: global.json,
            verbose: global.verbose,
        })
    }

    /// Directory that relative paths in the configuration are resolved from.
    pub fn base_dir(&self) -> PathBuf {
        self.config_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn resolver(&self) -> Result<PropertyResolver> {
        Ok(self.config.resolver(&self.base_dir())?)
    }

    pub fn loader(&self) -> Result<BundleLoader> {
        Ok(self.config.loader(&self.base_dir())?)
    }

    /// Reads and links the bundle stored in `dir`.
    pub fn load_bundle(&self, dir: &Path) -> Result<Bundle> {
        let files = read_bundle_dir(dir)?;
        let bundle = self
            .loader()?
            .load(&files.uuid, &files.version, &files.manifest, &files.metadata)
            .with_context(|| format!("failed to load bundle from {}", dir.display()))?;
        Ok(bundle)
    }
}
