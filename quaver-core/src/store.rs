use crate::error::Result;
use std::collections::HashMap;

/// Namespaced key the full player state is persisted under.
pub const STATE_KEY: &str = "quaver-player";

/// Durable key-value storage for serialized player state.
///
/// Implementations are synchronous: the controller flushes after every state
/// transition and treats failures as non-fatal (in-memory state stays
/// authoritative). No atomicity across crashes is assumed; whatever was last
/// durably written is the state recovered at startup.
pub trait StateStore {
    /// Load the payload stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `payload` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&mut self, key: &str, payload: &str) -> Result<()>;
}

/// In-memory store, for hosts without durable storage and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, payload: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), payload.to_owned());
        Ok(())
    }
}
