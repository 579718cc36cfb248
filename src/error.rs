//! Error type for the fallible edges of the calculator.
//!
//! The engine itself never fails; these errors come from loading config,
//! reading and writing the saved session, the clipboard, and key parsing.

use std::path::PathBuf;

/// Errors produced outside the engine's action handlers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid session data: {0}")]
    Session(#[from] serde_json::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("unknown key {input:?} at position {position}")]
    UnknownKey { input: String, position: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
