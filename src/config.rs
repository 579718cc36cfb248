//! User configuration loaded from `config.toml`.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "pocketcalc";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub history: HistoryConfig,
    pub clipboard: ClipboardConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Resume the saved session at start.
    pub restore: bool,
    /// Write the session back on exit.
    pub save: bool,
    /// Custom session file. Defaults to the XDG state dir.
    pub path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            restore: true,
            save: true,
            path: None,
        }
    }
}

impl SessionConfig {
    /// Resolve the session file, using the configured path or
    /// `$XDG_STATE_HOME/pocketcalc/session.json` (data dir where there is no
    /// state dir).
    pub fn resolve_path(&self) -> Option<PathBuf> {
        if let Some(ref custom) = self.path {
            return Some(custom.clone());
        }

        dirs::state_dir()
            .or_else(dirs::data_dir)
            .map(|base| base.join(APP_DIR).join("session.json"))
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Entries shown by the history listing. 0 shows everything.
    pub display_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { display_limit: 20 }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClipboardConfig {
    pub enabled: bool,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/pocketcalc/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join(APP_DIR).join("config.toml"))
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|source| Error::Config {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Load from `path` (or the default location), falling back to the
    /// defaults with a warning when the file cannot be used.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Self::default();
        };

        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("{e}, using defaults");
            Self::default()
        })
    }
}
