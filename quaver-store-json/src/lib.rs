//! JSON-file-backed state store for the quaver playback core.
//!
//! The durable storage collaborator the core persists through: each key is
//! one `<key>.json` file under a state directory (by default
//! `~/.config/quaver/`). The payload is stored opaquely; the core decides
//! what goes into it.
//!
//! Writes are plain file replacements with no atomicity guarantee across
//! crashes; the core treats whatever was last durably written as the
//! recovered state.

pub mod paths;

pub use paths::{state_dir, STATE_DIR_NAME};

use quaver_core::{Result, StateStore};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// State store keeping one JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store under the default state directory, creating the
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new() -> Result<Self> {
        Self::open(paths::state_dir())
    }

    /// Create a store rooted at `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        info!("state store ready at {:?}", dir);
        Ok(Self { dir })
    }

    /// Directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let payload = fs::read_to_string(&path)?;
        debug!("loaded {} bytes from {:?}", payload.len(), path);
        Ok(Some(payload))
    }

    fn save(&mut self, key: &str, payload: &str) -> Result<()> {
        let path = self.key_path(key);
        fs::write(&path, payload)?;
        debug!("persisted {} bytes to {:?}", payload.len(), path);
        Ok(())
    }
}
