//! Discovery and creation of the `.hca/` directory that holds the
//! configuration file and, typically, the migration table.

use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// The name of the hca configuration directory.
const HCA_DIR_NAME: &str = ".hca";

/// The environment variable that can override the configuration directory.
const HCA_DIR_ENV: &str = "HCA_DIR";

/// Walk up the directory tree from `start` looking for a `.hca/` directory.
///
/// The `HCA_DIR` environment variable is checked first. Returns `None` if
/// the filesystem root is reached without finding one.
pub fn find_hca_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(HCA_DIR_ENV) {
        let env_path = PathBuf::from(env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }

    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(HCA_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Like [`find_hca_dir`], but a missing directory is an error.
pub fn find_hca_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_hca_dir(start).ok_or(ConfigError::HcaDirNotFound)
}

/// Ensure a `.hca/` directory exists at (or under) `path` and return it.
pub fn ensure_hca_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let hca_dir = if path.ends_with(HCA_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(HCA_DIR_NAME)
    };

    std::fs::create_dir_all(&hca_dir)?;
    Ok(hca_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_hca_dir_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let hca = dir.path().join(".hca");
        std::fs::create_dir(&hca).unwrap();
        let nested = dir.path().join("bundles").join("b1");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_hca_dir(&nested).unwrap();
        assert_eq!(found.canonicalize().unwrap(), hca.canonicalize().unwrap());
    }

    #[test]
    fn test_find_hca_dir_or_error() {
        // A fresh directory under the system temp dir; nothing above it
        // should be named .hca.
        let dir = tempfile::tempdir().unwrap();
        if find_hca_dir(dir.path()).is_none() {
            assert!(matches!(
                find_hca_dir_or_error(dir.path()),
                Err(ConfigError::HcaDirNotFound)
            ));
        }
    }

    #[test]
    fn test_ensure_hca_dir() {
        let dir = tempfile::tempdir().unwrap();
        let created = ensure_hca_dir(dir.path()).unwrap();
        assert!(created.is_dir());
        assert!(created.ends_with(".hca"));
        // Passing the .hca directory itself is idempotent.
        assert_eq!(ensure_hca_dir(&created).unwrap(), created);
    }
}
