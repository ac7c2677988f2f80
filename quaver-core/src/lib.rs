//! Playback core for a local music player.
//!
//! Two components do the real work: the lyric engine ([`Lyrics`]), which
//! parses LRC-style timed text and answers "which line is active at time T"
//! on every playback tick, and the play-queue state machine ([`Player`]),
//! which owns the queue, the current index, the playback flags and the play
//! history. [`PlayerController`] wraps the state machine with broadcast
//! events and a state-store flush so a host UI can observe transitions and
//! survive restarts.
//!
//! The crate is synchronous and single-threaded by design: a host feeds it
//! user actions and media-clock ticks, and honors the play/pause intent it
//! reads back.

pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod lrc;
pub mod player;
pub mod store;
pub mod time;
pub mod track;

pub use config::PlayerConfig;
pub use controller::{PlayerController, PlayerEvent};
pub use error::{CoreError, Result};
pub use history::{PlayHistory, DEFAULT_HISTORY_LIMIT};
pub use lrc::{format_position, format_tag, LyricLine, Lyrics};
pub use player::{PlayMode, Player, DEFAULT_VOLUME};
pub use store::{MemoryStore, StateStore, STATE_KEY};
pub use time::DurationExt;
pub use track::Track;
