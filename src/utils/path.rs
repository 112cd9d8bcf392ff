//! Path utilities for finding data directories and configured files

use std::env;
use std::path::{Path, PathBuf};

/// Returns the folder where config, logs and debug output live.
/// Uses the executable directory when a `config` folder sits next to it,
/// the current directory otherwise.
pub fn get_data_dir() -> PathBuf {
    if let Ok(exe_path) = env::current_exe() {
        if let Some(parent) = exe_path.parent() {
            if parent.join("config").exists() {
                return parent.to_path_buf();
            }
        }
    }

    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Default configuration file location
pub fn default_config_path() -> PathBuf {
    get_data_dir().join("config").join("fishing.toml")
}

/// Return the first candidate that is an existing file.
pub fn locate_file<I, P>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    candidates
        .into_iter()
        .map(|p| p.as_ref().to_path_buf())
        .find(|p| p.is_file())
}

/// Resolve a configured path: as given first, then relative to `base_dir`.
pub fn resolve_relative(path: &str, base_dir: Option<&Path>) -> Option<PathBuf> {
    let as_given = PathBuf::from(path);
    if as_given.is_absolute() {
        return locate_file([as_given]);
    }

    let mut candidates = vec![as_given.clone()];
    if let Some(base) = base_dir {
        candidates.push(base.join(&as_given));
    }
    locate_file(candidates)
}
