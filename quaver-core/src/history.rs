use crate::track::Track;
use serde::{Deserialize, Serialize};

/// Default number of entries a history keeps.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Bounded most-recent-first log of played tracks.
///
/// Entries are unique by track id: replaying a track moves its entry to the
/// front instead of duplicating it. Once the limit is exceeded the oldest
/// entry is evicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayHistory {
    #[serde(default = "default_limit")]
    limit: usize,
    entries: Vec<Track>,
}

const fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for PlayHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl PlayHistory {
    /// Create an empty history bounded to `limit` entries.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            entries: Vec::new(),
        }
    }

    /// Record a play: move-to-front on replay, evict past the limit.
    pub fn record(&mut self, track: &Track) {
        self.entries.retain(|t| t.id != track.id);
        self.entries.insert(0, track.clone());
        self.entries.truncate(self.limit);
    }

    /// Entries, most recent first.
    #[must_use]
    pub fn entries(&self) -> &[Track] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
