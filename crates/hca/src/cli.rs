//! Clap CLI definitions for the `hca` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hca_metadata::DeprecationPolicy;

/// hca -- inspect HCA metadata bundles.
///
/// Loads a bundle directory (manifest.json plus the metadata documents and
/// links.json) into a typed entity graph and queries it.
#[derive(Parser, Debug)]
#[command(
    name = "hca",
    about = "Inspect HCA metadata bundles",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration directory (default: $HCA_DIR, or the nearest .hca/ upwards).
    #[arg(long, global = true, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Handling of deprecated schemas: warn, ignore or error (overrides config).
    #[arg(long, global = true, value_name = "POLICY")]
    pub deprecation: Option<DeprecationPolicy>,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a bundle: ids, entity counts and roots.
    Summary(BundleArgs),

    /// List root entities (linked entities without parents).
    Roots(BundleArgs),

    /// List the biomaterials that were sequenced and the sequence files produced.
    Sequencing(BundleArgs),

    /// Show one entity with its connections and ancestors.
    Show(ShowArgs),

    /// Look up a property in a single metadata document.
    Lookup(LookupArgs),

    /// Show or initialize configuration.
    Config(ConfigArgs),

    /// Print version information.
    Version,
}

#[derive(Args, Debug)]
pub struct BundleArgs {
    /// Bundle directory containing manifest.json, links.json and the metadata files.
    pub dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Bundle directory.
    pub dir: PathBuf,

    /// Document id of the entity.
    pub id: String,

    /// Also list every descendant of the entity.
    #[arg(long)]
    pub descendants: bool,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Metadata document (JSON).
    pub file: PathBuf,

    /// Property key, e.g. `cell_suspension.biomaterial_core.biomaterial_id`.
    pub key: String,

    /// Fallback keys tried in order when the key does not resolve.
    #[arg(short = 'f', long = "fallback", value_name = "KEY")]
    pub fallbacks: Vec<String>,

    /// JSON value printed when no key resolves (e.g. `null` or `"n/a"`).
    #[arg(long, value_name = "JSON")]
    pub default: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration (file plus environment overrides).
    Show,

    /// Write a default config.yaml (into the found .hca/, or a new one in the current directory).
    Init {
        /// Overwrite an existing configuration file.
        #[arg(long)]
        force: bool,
    },
}
