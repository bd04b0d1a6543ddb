//! Storage locations resolved once at start-up.
//!
//! The `--config` flag is turned into a [`ConfigContext`] in `main` and passed
//! explicitly to every command that touches the global configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

/// Local override file name, looked up in the project root.
pub const LOCAL_CONFIG_FILE: &str = ".bild.json";

const DEFAULT_CONFIG_DIR: &str = ".config/bild";
const DEFAULT_CONFIG_FILE: &str = "bild.json";

/// Resolved path to the global configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigContext {
    config_path: PathBuf,
}

impl ConfigContext {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Resolve from the optional `--config` value.
    ///
    /// A leading `~` expands to the home directory; no flag means
    /// `~/.config/bild/bild.json`.
    pub fn from_flag(flag: Option<&str>) -> Result<Self> {
        let home = dirs::home_dir();
        resolve_config_path(flag, home.as_deref()).map(Self::new)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Path of the local override inside `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

fn resolve_config_path(flag: Option<&str>, home: Option<&Path>) -> Result<PathBuf> {
    let home_or_err =
        || home.ok_or_else(|| anyhow!("could not determine home directory for config path"));
    match flag.filter(|value| !value.is_empty()) {
        Some(value) => match value.strip_prefix('~') {
            Some(rest) => Ok(home_or_err()?.join(rest.trim_start_matches('/'))),
            None => Ok(PathBuf::from(value)),
        },
        None => Ok(home_or_err()?
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE)),
    }
}
