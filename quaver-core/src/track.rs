use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A catalog entry as the playback core sees it.
///
/// Immutable value object: the core never mutates a track, it only moves and
/// clones it between the queue and the history. `id` is the identity used for
/// queue membership and history deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique id within the catalog
    pub id: u64,
    /// Track name
    pub name: String,
    /// Artist name(s)
    pub artist: String,
    /// Album name
    pub album: String,
    /// Cover art URL
    #[serde(default)]
    pub cover_url: String,
    /// Track duration
    pub duration: Duration,
    /// Playable audio URL
    #[serde(default)]
    pub audio_url: String,
    /// Raw LRC lyric text, when the catalog carries one
    #[serde(default)]
    pub lyric: Option<String>,
}

impl Track {
    /// Create a new track
    pub fn new(
        id: u64,
        name: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            artist: artist.into(),
            album: album.into(),
            cover_url: String::new(),
            duration,
            audio_url: String::new(),
            lyric: None,
        }
    }

    /// Set the cover art URL
    #[must_use]
    pub fn with_cover_url(mut self, url: impl Into<String>) -> Self {
        self.cover_url = url.into();
        self
    }

    /// Set the playable audio URL
    #[must_use]
    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = url.into();
        self
    }

    /// Attach raw LRC lyric text
    #[must_use]
    pub fn with_lyric(mut self, lyric: impl Into<String>) -> Self {
        self.lyric = Some(lyric.into());
        self
    }
}
