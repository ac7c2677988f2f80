use crate::config::PlayerConfig;
use crate::error::{CoreError, Result};
use crate::history::PlayHistory;
use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default volume for a fresh player.
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Playback mode, cycled in a fixed order.
///
/// The string tags (`list-loop`, `single-loop`, `random`) are the persisted
/// representation and must stay stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayMode {
    /// Advance through the queue in order, wrapping at both ends.
    #[default]
    ListLoop,
    /// Repeat the current track when it ends. Enforced by the controller on
    /// track end; `play_next`/`play_prev` advance normally in this mode.
    SingleLoop,
    /// Uniformly random pick over the whole queue; may land on the current
    /// track again, which is the defined behavior.
    Random,
}

impl PlayMode {
    /// Next mode in the `ListLoop -> SingleLoop -> Random` cycle.
    #[must_use]
    pub const fn cycled(self) -> Self {
        match self {
            Self::ListLoop => Self::SingleLoop,
            Self::SingleLoop => Self::Random,
            Self::Random => Self::ListLoop,
        }
    }
}

/// The play-queue state machine.
///
/// Owns the ordered queue, the current position into it, the playback flags
/// (playing, position, volume, mute, mode) and the play history. The current
/// track is always derived from `queue[current_index]`; there is no separate
/// cached copy to drift out of sync.
///
/// Invariant: `current_index` is `Some(i)` with `i < queue.len()`, or `None`;
/// an empty queue always has `current_index == None`.
///
/// Every operation is total: not-found lookups and empty-queue navigation are
/// no-ops. The one raised error is `replace_queue` with an out-of-range start
/// index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    queue: Vec<Track>,
    current_index: Option<usize>,
    is_playing: bool,
    position: Duration,
    volume: f32,
    muted: bool,
    mode: PlayMode,
    history: PlayHistory,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            current_index: None,
            is_playing: false,
            position: Duration::ZERO,
            volume: DEFAULT_VOLUME,
            muted: false,
            mode: PlayMode::default(),
            history: PlayHistory::default(),
        }
    }
}

impl Player {
    /// Fresh player with config-derived defaults.
    #[must_use]
    pub fn with_config(config: &PlayerConfig) -> Self {
        Self {
            volume: config.default_volume.clamp(0.0, 1.0),
            mode: config.default_mode,
            history: PlayHistory::with_limit(config.history_limit),
            ..Self::default()
        }
    }

    /// Make `track` current and start playing it from the beginning.
    ///
    /// If a queue entry shares the track's id, the index moves to the first
    /// such entry; otherwise the track is appended and becomes the last
    /// index. The play is recorded in the history either way.
    pub fn play(&mut self, track: Track) {
        self.position = Duration::ZERO;
        self.is_playing = true;
        self.history.record(&track);

        if let Some(index) = self.queue.iter().position(|t| t.id == track.id) {
            self.current_index = Some(index);
        } else {
            self.queue.push(track);
            self.current_index = Some(self.queue.len() - 1);
        }
    }

    /// Flip the playing flag. Position and queue are untouched.
    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    /// Step to the previous track. No-op on an empty queue.
    ///
    /// `Random` picks uniformly over the queue; the loop modes step back one
    /// index, wrapping from the first entry to the last. The chosen entry
    /// goes through the same transition as [`Player::play`].
    pub fn play_prev(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        let index = match self.mode {
            PlayMode::Random => random_index(self.queue.len()),
            PlayMode::ListLoop | PlayMode::SingleLoop => match self.current_index {
                Some(i) if i > 0 => i - 1,
                _ => self.queue.len() - 1,
            },
        };

        let track = self.queue[index].clone();
        self.play(track);
    }

    /// Step to the next track. No-op on an empty queue.
    ///
    /// `Random` picks uniformly over the queue; the loop modes step forward
    /// one index, wrapping from the last entry to the first. The chosen
    /// entry goes through the same transition as [`Player::play`].
    pub fn play_next(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        let index = match self.mode {
            PlayMode::Random => random_index(self.queue.len()),
            PlayMode::ListLoop | PlayMode::SingleLoop => match self.current_index {
                Some(i) if i + 1 < self.queue.len() => i + 1,
                _ => 0,
            },
        };

        let track = self.queue[index].clone();
        self.play(track);
    }

    /// Store the reported playback position verbatim.
    ///
    /// Clamping to the track duration is the media-clock host's concern.
    pub fn set_position(&mut self, position: Duration) {
        self.position = position;
    }

    /// Set the volume, clamped to `[0, 1]`.
    ///
    /// Requesting a positive volume clears the mute flag; requesting exactly
    /// zero does not set it. Mute stays a distinct, explicit flag.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if volume > 0.0 {
            self.muted = false;
        }
    }

    /// Flip the mute flag, independent of the volume value.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Advance the play mode along its fixed cycle.
    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.cycled();
    }

    /// Append `track` unless an entry with its id is already queued.
    pub fn enqueue(&mut self, track: Track) {
        if self.queue.iter().any(|t| t.id == track.id) {
            return;
        }
        self.queue.push(track);
    }

    /// Remove the entry with `track_id` from the queue. No-op if absent.
    ///
    /// Removing the current entry plays the entry now at
    /// `min(removed_index, len - 1)` (with the full play transition), or
    /// clears to the empty state and stops if the queue emptied. Removing an
    /// entry before the current one shifts the index down with no playback
    /// side effects.
    pub fn remove(&mut self, track_id: u64) {
        let Some(index) = self.queue.iter().position(|t| t.id == track_id) else {
            return;
        };

        self.queue.remove(index);

        match self.current_index {
            Some(current) if current == index => {
                if self.queue.is_empty() {
                    self.current_index = None;
                    self.is_playing = false;
                } else {
                    let next = index.min(self.queue.len() - 1);
                    let track = self.queue[next].clone();
                    self.play(track);
                }
            }
            Some(current) if current > index => {
                self.current_index = Some(current - 1);
            }
            _ => {}
        }
    }

    /// Replace the queue wholesale and start playing at `start_index`.
    ///
    /// An empty `tracks` clears to the empty state. Otherwise `start_index`
    /// must be in range; an out-of-range index is rejected and the player is
    /// left untouched, rather than silently clamped into a queue/index
    /// mismatch.
    ///
    /// # Errors
    ///
    /// `CoreError::StartIndexOutOfRange` when `tracks` is non-empty and
    /// `start_index >= tracks.len()`.
    pub fn replace_queue(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        if tracks.is_empty() {
            self.clear_queue();
            return Ok(());
        }

        if start_index >= tracks.len() {
            return Err(CoreError::StartIndexOutOfRange {
                index: start_index,
                len: tracks.len(),
            });
        }

        self.queue = tracks;
        self.current_index = None;
        let track = self.queue[start_index].clone();
        self.play(track);
        Ok(())
    }

    /// Empty the queue, clear the current index and stop playback.
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.current_index = None;
        self.is_playing = false;
    }

    /// Re-establish the queue/index invariant after deserializing.
    ///
    /// Persisted snapshots are external input and are not trusted to uphold
    /// it: an index that no longer points into the queue is dropped (and
    /// playback stopped), and the volume is clamped back into range.
    pub fn reconcile(&mut self) {
        if let Some(index) = self.current_index {
            if index >= self.queue.len() {
                self.current_index = None;
                self.is_playing = false;
            }
        }
        self.volume = self.volume.clamp(0.0, 1.0);
    }

    // Read accessors

    /// The current track, derived from the queue and index.
    #[must_use]
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    #[must_use]
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[must_use]
    pub fn position(&self) -> Duration {
        self.position
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    #[must_use]
    pub fn history(&self) -> &PlayHistory {
        &self.history
    }
}

fn random_index(len: usize) -> usize {
    use rand::Rng;
    rand::rng().random_range(0..len)
}
