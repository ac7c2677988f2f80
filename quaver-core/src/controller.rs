use crate::config::PlayerConfig;
use crate::error::Result;
use crate::player::{PlayMode, Player};
use crate::store::{StateStore, STATE_KEY};
use crate::track::Track;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Events emitted by the controller after each state transition.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// A track became current and playback restarted from zero
    TrackStarted { track: Track, index: usize },
    /// Playback was paused
    PlaybackPaused { position: Duration },
    /// Playback was resumed
    PlaybackResumed { position: Duration },
    /// The queue emptied out and nothing is current anymore
    PlaybackStopped,
    /// The media clock reported a new position
    PositionChanged { position: Duration },
    /// Volume changed (and possibly cleared the mute flag)
    VolumeChanged { volume: f32, muted: bool },
    /// Mute was toggled
    MuteToggled { muted: bool },
    /// The play mode advanced along its cycle
    ModeChanged { mode: PlayMode },
    /// Queue membership changed
    QueueChanged { len: usize },
    /// The queue was cleared
    QueueCleared,
}

/// Owns the player state machine, notifies observers, and persists state.
///
/// Every mutating operation applies the transition, emits a [`PlayerEvent`]
/// on a broadcast channel, and flushes the full serialized state to the
/// store. The whole controller is synchronous: it runs on the caller's
/// thread and each operation completes before the next one starts.
///
/// Persistence is best-effort. A failed flush is logged and swallowed; the
/// in-memory state stays authoritative for the session, the durable copy
/// just lags until the next successful flush.
pub struct PlayerController {
    player: Player,
    store: Box<dyn StateStore>,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl PlayerController {
    /// Create a controller, rehydrating persisted state when available.
    ///
    /// A missing snapshot yields a fresh player with config-derived
    /// defaults. An unreadable or corrupt snapshot is logged and discarded;
    /// it is not an error.
    pub fn new(config: &PlayerConfig, store: Box<dyn StateStore>) -> Self {
        let player = match store.load(STATE_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Player>(&payload) {
                Ok(mut player) => {
                    player.reconcile();
                    debug!(
                        queue_len = player.queue().len(),
                        "restored persisted player state"
                    );
                    player
                }
                Err(e) => {
                    warn!("discarding unreadable player state: {e}");
                    Player::with_config(config)
                }
            },
            Ok(None) => Player::with_config(config),
            Err(e) => {
                warn!("state store unavailable at startup: {e}");
                Player::with_config(config)
            }
        };

        let (event_tx, _) = broadcast::channel(64);

        Self {
            player,
            store,
            event_tx,
        }
    }

    /// Subscribe to state-transition events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    /// The underlying state machine, for reads.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The current track, if any.
    #[must_use]
    pub fn current_track(&self) -> Option<&Track> {
        self.player.current_track()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Make `track` current and start playing it.
    pub fn play(&mut self, track: Track) {
        self.player.play(track);
        self.emit_track_started();
        self.flush();
    }

    /// Flip play/pause.
    pub fn toggle_play(&mut self) {
        self.player.toggle_play();
        let position = self.player.position();
        if self.player.is_playing() {
            self.emit(PlayerEvent::PlaybackResumed { position });
        } else {
            self.emit(PlayerEvent::PlaybackPaused { position });
        }
        self.flush();
    }

    /// Step to the previous track. No-op on an empty queue.
    pub fn play_prev(&mut self) {
        if self.player.queue().is_empty() {
            return;
        }
        self.player.play_prev();
        self.emit_track_started();
        self.flush();
    }

    /// Step to the next track. No-op on an empty queue.
    pub fn play_next(&mut self) {
        if self.player.queue().is_empty() {
            return;
        }
        self.player.play_next();
        self.emit_track_started();
        self.flush();
    }

    /// Record the position reported by the media clock.
    pub fn set_position(&mut self, position: Duration) {
        self.player.set_position(position);
        self.emit(PlayerEvent::PositionChanged { position });
        self.flush();
    }

    /// Set the volume (clamped to `[0, 1]`).
    pub fn set_volume(&mut self, volume: f32) {
        self.player.set_volume(volume);
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.player.volume(),
            muted: self.player.muted(),
        });
        self.flush();
    }

    /// Flip the mute flag.
    pub fn toggle_mute(&mut self) {
        self.player.toggle_mute();
        self.emit(PlayerEvent::MuteToggled {
            muted: self.player.muted(),
        });
        self.flush();
    }

    /// Advance the play mode along its cycle.
    pub fn cycle_mode(&mut self) {
        self.player.cycle_mode();
        self.emit(PlayerEvent::ModeChanged {
            mode: self.player.mode(),
        });
        self.flush();
    }

    /// Append `track` to the queue unless already present. Silent no-op on
    /// a duplicate id.
    pub fn enqueue(&mut self, track: Track) {
        let len_before = self.player.queue().len();
        self.player.enqueue(track);
        if self.player.queue().len() == len_before {
            return;
        }
        self.emit(PlayerEvent::QueueChanged {
            len: self.player.queue().len(),
        });
        self.flush();
    }

    /// Remove the entry with `track_id` from the queue. No-op if absent.
    pub fn remove(&mut self, track_id: u64) {
        let len_before = self.player.queue().len();
        let was_current = self.player.current_track().map(|t| t.id) == Some(track_id);

        self.player.remove(track_id);
        if self.player.queue().len() == len_before {
            return;
        }

        self.emit(PlayerEvent::QueueChanged {
            len: self.player.queue().len(),
        });
        if was_current {
            if self.player.current_track().is_some() {
                self.emit_track_started();
            } else {
                self.emit(PlayerEvent::PlaybackStopped);
            }
        }
        self.flush();
    }

    /// Replace the queue wholesale, starting playback at `start_index`.
    ///
    /// # Errors
    ///
    /// `CoreError::StartIndexOutOfRange` when `tracks` is non-empty and
    /// `start_index` is out of range; nothing is emitted or persisted and
    /// the player is left untouched.
    pub fn replace_queue(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        self.player.replace_queue(tracks, start_index)?;

        if self.player.queue().is_empty() {
            self.emit(PlayerEvent::QueueCleared);
        } else {
            self.emit(PlayerEvent::QueueChanged {
                len: self.player.queue().len(),
            });
            self.emit_track_started();
        }
        self.flush();
        Ok(())
    }

    /// Empty the queue and stop playback.
    pub fn clear_queue(&mut self) {
        self.player.clear_queue();
        self.emit(PlayerEvent::QueueCleared);
        self.flush();
    }

    /// React to the media element reporting the current track ended.
    ///
    /// `SingleLoop` replays the current track from the start; the other
    /// modes advance with the normal next-track logic. No-op when nothing
    /// is current.
    pub fn handle_track_ended(&mut self) {
        let Some(track) = self.player.current_track().cloned() else {
            return;
        };
        match self.player.mode() {
            PlayMode::SingleLoop => self.play(track),
            PlayMode::ListLoop | PlayMode::Random => self.play_next(),
        }
    }

    fn emit_track_started(&self) {
        if let (Some(track), Some(index)) =
            (self.player.current_track(), self.player.current_index())
        {
            self.emit(PlayerEvent::TrackStarted {
                track: track.clone(),
                index,
            });
        }
    }

    fn emit(&self, event: PlayerEvent) {
        // nobody listening is fine
        let _ = self.event_tx.send(event);
    }

    /// Serialize the full player state and hand it to the store.
    ///
    /// Best-effort: a failure is logged, not propagated.
    fn flush(&mut self) {
        if let Err(e) = self.try_flush() {
            warn!("failed to persist player state: {e}");
        }
    }

    fn try_flush(&mut self) -> Result<()> {
        let payload = serde_json::to_string(&self.player)?;
        self.store.save(STATE_KEY, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::store::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store handle that stays inspectable after the controller takes it.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl StateStore for SharedStore {
        fn load(&self, key: &str) -> Result<Option<String>> {
            self.0.borrow().load(key)
        }

        fn save(&mut self, key: &str, payload: &str) -> Result<()> {
            self.0.borrow_mut().save(key, payload)
        }
    }

    /// Store whose every operation fails.
    struct BrokenStore;

    impl StateStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Err(CoreError::IoError(std::io::Error::other("store offline")))
        }

        fn save(&mut self, _key: &str, _payload: &str) -> Result<()> {
            Err(CoreError::IoError(std::io::Error::other("store offline")))
        }
    }

    fn track(id: u64) -> Track {
        Track::new(id, format!("song-{id}"), "artist", "album", Duration::from_secs(180))
    }

    fn controller() -> (PlayerController, SharedStore) {
        let store = SharedStore::default();
        let controller = PlayerController::new(&PlayerConfig::default(), Box::new(store.clone()));
        (controller, store)
    }

    fn persisted_player(store: &SharedStore) -> Player {
        let payload = store.load(STATE_KEY).unwrap().unwrap();
        serde_json::from_str(&payload).unwrap()
    }

    #[test]
    fn test_play_emits_and_persists() {
        let (mut controller, store) = controller();
        let mut events = controller.subscribe();

        controller.play(track(1));

        assert!(matches!(
            events.try_recv().unwrap(),
            PlayerEvent::TrackStarted { track, index: 0 } if track.id == 1
        ));

        let persisted = persisted_player(&store);
        assert_eq!(persisted.queue().len(), 1);
        assert_eq!(persisted.current_index(), Some(0));
        assert!(persisted.is_playing());
    }

    #[test]
    fn test_toggle_play_events() {
        let (mut controller, _store) = controller();
        controller.play(track(1));
        let mut events = controller.subscribe();

        controller.toggle_play();
        assert!(matches!(
            events.try_recv().unwrap(),
            PlayerEvent::PlaybackPaused { .. }
        ));

        controller.toggle_play();
        assert!(matches!(
            events.try_recv().unwrap(),
            PlayerEvent::PlaybackResumed { .. }
        ));
    }

    #[test]
    fn test_rehydrates_persisted_state() {
        let store = SharedStore::default();
        {
            let mut first =
                PlayerController::new(&PlayerConfig::default(), Box::new(store.clone()));
            first.play(track(1));
            first.enqueue(track(2));
            first.cycle_mode();
            first.set_volume(0.3);
        }

        let second = PlayerController::new(&PlayerConfig::default(), Box::new(store));
        assert_eq!(second.player().queue().len(), 2);
        assert_eq!(second.current_track().map(|t| t.id), Some(1));
        assert_eq!(second.player().mode(), PlayMode::SingleLoop);
        assert!((second.player().volume() - 0.3).abs() < f32::EPSILON);
        assert_eq!(second.player().history().entries()[0].id, 1);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_config_defaults() {
        let mut store = SharedStore::default();
        store.save(STATE_KEY, "definitely not json").unwrap();

        let config = PlayerConfig {
            default_volume: 0.5,
            ..PlayerConfig::default()
        };
        let controller = PlayerController::new(&config, Box::new(store));

        assert!(controller.player().queue().is_empty());
        assert!((controller.player().volume() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_snapshot_with_stale_index_is_reconciled() {
        let mut store = SharedStore::default();
        let payload = serde_json::json!({
            "queue": [],
            "current_index": 2,
            "is_playing": true,
            "position": { "secs": 0, "nanos": 0 },
            "volume": 0.7,
            "muted": false,
            "mode": "random",
            "history": { "limit": 100, "entries": [] }
        });
        store.save(STATE_KEY, &payload.to_string()).unwrap();

        let controller = PlayerController::new(&PlayerConfig::default(), Box::new(store));
        assert_eq!(controller.player().current_index(), None);
        assert!(!controller.is_playing());
        assert_eq!(controller.player().mode(), PlayMode::Random);
    }

    #[test]
    fn test_store_failure_is_non_fatal() {
        let mut controller =
            PlayerController::new(&PlayerConfig::default(), Box::new(BrokenStore));

        controller.play(track(1));
        controller.set_volume(0.2);

        assert_eq!(controller.current_track().map(|t| t.id), Some(1));
        assert!((controller.player().volume() - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_enqueue_duplicate_emits_nothing() {
        let (mut controller, _store) = controller();
        controller.enqueue(track(1));
        let mut events = controller.subscribe();

        controller.enqueue(track(1));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_remove_current_emits_queue_change_and_track_start() {
        let (mut controller, _store) = controller();
        controller.replace_queue(vec![track(1), track(2)], 0).unwrap();
        let mut events = controller.subscribe();

        controller.remove(1);

        assert!(matches!(
            events.try_recv().unwrap(),
            PlayerEvent::QueueChanged { len: 1 }
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            PlayerEvent::TrackStarted { track, .. } if track.id == 2
        ));
    }

    #[test]
    fn test_remove_last_emits_stop() {
        let (mut controller, _store) = controller();
        controller.play(track(1));
        let mut events = controller.subscribe();

        controller.remove(1);

        assert!(matches!(
            events.try_recv().unwrap(),
            PlayerEvent::QueueChanged { len: 0 }
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            PlayerEvent::PlaybackStopped
        ));
        assert!(!controller.is_playing());
    }

    #[test]
    fn test_replace_queue_error_emits_nothing() {
        let (mut controller, store) = controller();
        controller.play(track(1));
        let before = persisted_player(&store);
        let mut events = controller.subscribe();

        let err = controller.replace_queue(vec![track(7)], 5).unwrap_err();
        assert!(matches!(err, CoreError::StartIndexOutOfRange { .. }));
        assert!(events.try_recv().is_err());
        assert_eq!(persisted_player(&store), before);
    }

    #[test]
    fn test_track_ended_single_loop_replays_current() {
        let (mut controller, _store) = controller();
        controller.replace_queue(vec![track(1), track(2)], 0).unwrap();
        controller.cycle_mode();
        assert_eq!(controller.player().mode(), PlayMode::SingleLoop);
        controller.set_position(Duration::from_secs(180));

        controller.handle_track_ended();

        assert_eq!(controller.current_track().map(|t| t.id), Some(1));
        assert_eq!(controller.player().position(), Duration::ZERO);
        assert!(controller.is_playing());
    }

    #[test]
    fn test_track_ended_list_loop_advances() {
        let (mut controller, _store) = controller();
        controller.replace_queue(vec![track(1), track(2)], 0).unwrap();

        controller.handle_track_ended();

        assert_eq!(controller.current_track().map(|t| t.id), Some(2));
    }

    #[test]
    fn test_track_ended_without_current_is_noop() {
        let (mut controller, _store) = controller();
        let mut events = controller.subscribe();

        controller.handle_track_ended();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_position_updates_are_persisted() {
        let (mut controller, store) = controller();
        controller.play(track(1));

        controller.set_position(Duration::from_millis(62_500));

        let persisted = persisted_player(&store);
        assert_eq!(persisted.position(), Duration::from_millis(62_500));
    }
}
