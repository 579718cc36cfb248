//! Saving and resuming the engine between runs.

use crate::calculator::{Engine, Snapshot};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A session file holding one engine snapshot as JSON.
#[derive(Clone, Debug)]
pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved snapshot. `None` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<Snapshot>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Snapshot::from_json(&contents).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    /// Resume the saved engine, or start fresh if the file is missing or
    /// unreadable.
    pub fn resume(&self) -> Engine {
        match self.load() {
            Ok(Some(snapshot)) => {
                debug!(path = %self.path.display(), "Resuming session");
                Engine::restore(snapshot)
            }
            Ok(None) => Engine::new(),
            Err(e) => {
                warn!("Ignoring saved session: {e}");
                Engine::new()
            }
        }
    }

    /// Write the engine's snapshot, creating parent directories as needed.
    pub fn save(&self, engine: &Engine) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let json = engine.snapshot().to_json()?;
        std::fs::write(&self.path, json).map_err(|e| Error::io(&self.path, e))?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }
}
