//! Configuration management for the hca tool.
//!
//! This crate handles loading and saving `.hca/config.yaml` files,
//! discovering `.hca/` directories in the filesystem, and turning the
//! configuration into a ready-to-use bundle loader.

pub mod config;
pub mod hca_dir;

pub use config::{CONFIG_FILE, ConfigError, HcaConfig, LogConfig, MigrationsConfig, load_config, save_config};
pub use hca_dir::{ensure_hca_dir, find_hca_dir, find_hca_dir_or_error};
