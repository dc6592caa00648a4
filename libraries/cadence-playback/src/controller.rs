//! Playback controller - single owner of transport state
//!
//! Holds what is loaded and whether it is playing, and is the only code that
//! talks to the media engine. It never decides what plays next; end-of-media
//! is handed back to the owner as a [`ControllerSignal`].
//!
//! Every successful load gets a fresh [`LoadId`]. Engine notices stamped
//! with any other id are dropped.

use crate::{
    engine::MediaEngine,
    error::{PlaybackError, Result},
    events::{EngineEvent, EngineNotice, LoadId, PlayerEvent},
    types::{PlayOutcome, PlaybackStatus},
    volume::Volume,
};
use cadence_core::LocalTrack;
use std::time::Duration;
use tracing::{debug, warn};

/// Something the owner has to act on after an engine event
#[derive(Debug)]
pub enum ControllerSignal {
    /// The loaded source played to its end
    EndOfMedia,

    /// The engine failed at runtime
    Failed(PlaybackError),
}

/// Transport state and engine driver
pub struct PlaybackController {
    engine: Box<dyn MediaEngine>,

    // State
    source: Option<LocalTrack>,
    load: Option<LoadId>,
    last_load: LoadId,
    status: PlaybackStatus,
    position: Duration,
    duration: Duration,
    volume: Volume,

    // Provisional slider value while the user drags it
    seek_gesture: Option<Duration>,

    pending_events: Vec<PlayerEvent>,
}

impl PlaybackController {
    /// Create a controller and push the initial volume to the engine
    pub fn new(mut engine: Box<dyn MediaEngine>, volume: u8) -> Self {
        let volume = Volume::new(volume);
        engine.set_volume(volume.effective_level());

        Self {
            engine,
            source: None,
            load: None,
            last_load: LoadId::new(0),
            status: PlaybackStatus::Stopped,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume,
            seek_gesture: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Transport =====

    /// Load a local track
    ///
    /// Resets position to zero and leaves status alone until `play()`.
    /// On failure the engine is stopped, the source is cleared and status
    /// becomes Stopped.
    pub fn load(&mut self, track: LocalTrack) -> Result<()> {
        self.seek_gesture = None;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;

        let load = self.last_load.next();
        self.last_load = load;
        self.load = None;

        if let Err(err) = self.engine.open(track.path(), load) {
            warn!(path = %track, %load, error = %err, "Failed to open media");
            self.engine.stop();
            self.source = None;
            self.set_status(PlaybackStatus::Stopped);
            self.pending_events
                .push(PlayerEvent::SourceChanged { path: None });
            return Err(err);
        }

        debug!(path = %track, %load, "Loaded source");
        self.load = Some(load);
        self.pending_events.push(PlayerEvent::SourceChanged {
            path: Some(track.path().to_path_buf()),
        });
        self.pending_events
            .push(PlayerEvent::position(self.position, self.duration));
        self.source = Some(track);
        Ok(())
    }

    /// Start or resume playback
    ///
    /// With nothing loaded this returns `NothingLoaded` and leaves the engine
    /// alone; the owner runs its configured fallback.
    pub fn play(&mut self) -> PlayOutcome {
        if self.source.is_none() {
            debug!("Play requested with no source loaded");
            return PlayOutcome::NothingLoaded;
        }

        self.engine.play();
        self.set_status(PlaybackStatus::Playing);
        PlayOutcome::Playing
    }

    /// Pause playback (no-op unless playing)
    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.engine.pause();
            self.set_status(PlaybackStatus::Paused);
        }
    }

    /// Pause if playing, otherwise play
    pub fn toggle(&mut self) -> PlayOutcome {
        if self.status == PlaybackStatus::Playing {
            self.pause();
            PlayOutcome::Paused
        } else {
            self.play()
        }
    }

    /// Release the source entirely
    pub fn unload(&mut self) {
        self.engine.stop();
        self.load = None;
        let had_source = self.source.take().is_some();
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.seek_gesture = None;
        self.set_status(PlaybackStatus::Stopped);
        if had_source {
            self.pending_events
                .push(PlayerEvent::SourceChanged { path: None });
        }
    }

    // ===== Seek =====

    /// Seek the loaded source
    ///
    /// Dropped with `SeekRejected` when nothing is loaded or the engine says
    /// the source is not seekable.
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        if self.source.is_none() || !self.engine.is_seekable() {
            warn!(position_ms = position.as_millis() as u64, "Seek rejected");
            return Err(PlaybackError::SeekRejected);
        }

        let position = if self.duration > Duration::ZERO {
            position.min(self.duration)
        } else {
            position
        };

        self.engine.set_position(position);
        self.position = position;
        self.pending_events
            .push(PlayerEvent::position(position, self.duration));
        Ok(())
    }

    /// User grabbed the position slider
    pub fn begin_seek(&mut self) {
        self.seek_gesture = Some(self.position);
    }

    /// User moved the slider; ignored unless a gesture is in progress
    pub fn update_seek(&mut self, position: Duration) {
        if let Some(provisional) = self.seek_gesture.as_mut() {
            *provisional = position;
        }
    }

    /// User released the slider; commits the provisional position
    pub fn end_seek(&mut self) -> Result<()> {
        match self.seek_gesture.take() {
            Some(position) => self.seek(position),
            None => Ok(()),
        }
    }

    /// Whether a slider gesture is in progress
    pub fn is_seeking(&self) -> bool {
        self.seek_gesture.is_some()
    }

    /// Position the slider should show
    ///
    /// The provisional gesture value wins over engine updates until the
    /// gesture ends.
    pub fn display_position(&self) -> Duration {
        self.seek_gesture.unwrap_or(self.position)
    }

    // ===== Volume =====

    /// Set volume (clamped to 0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.push_volume();
    }

    /// Mute audio
    pub fn mute(&mut self) {
        self.volume.mute();
        self.push_volume();
    }

    /// Unmute audio
    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.push_volume();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.push_volume();
    }

    // ===== Engine events =====

    /// Apply an engine notification
    ///
    /// Notices from any load but the current one are ignored.
    pub fn handle_engine_event(&mut self, notice: EngineNotice) -> Option<ControllerSignal> {
        if self.load != Some(notice.load) {
            debug!(
                load = %notice.load,
                current = ?self.load,
                event = ?notice.event,
                "Dropping engine event from a replaced load"
            );
            return None;
        }

        match notice.event {
            EngineEvent::DurationChanged(duration) => {
                self.duration = duration;
                self.pending_events
                    .push(PlayerEvent::position(self.display_position(), duration));
                None
            }
            EngineEvent::PositionChanged(position) => {
                self.position = position;
                // Never move the slider under the user's finger
                if self.seek_gesture.is_none() {
                    self.pending_events
                        .push(PlayerEvent::position(position, self.duration));
                }
                None
            }
            EngineEvent::EndOfMedia => {
                debug!(source = ?self.source, "End of media");
                self.set_status(PlaybackStatus::Stopped);
                Some(ControllerSignal::EndOfMedia)
            }
            EngineEvent::Error(message) => {
                warn!(error = %message, "Engine error");
                self.set_status(PlaybackStatus::Stopped);
                Some(ControllerSignal::Failed(PlaybackError::Engine(message)))
            }
        }
    }

    // ===== State Queries =====

    /// Currently loaded source
    pub fn source(&self) -> Option<&LocalTrack> {
        self.source.as_ref()
    }

    /// Tag of the current load (None when nothing is loaded)
    pub fn current_load(&self) -> Option<LoadId> {
        self.load
    }

    /// Transport status
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Label for the play/pause control
    pub fn control_label(&self) -> &'static str {
        self.status.control_label()
    }

    /// Last engine-reported position
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Duration of the loaded source (zero until the engine reports it)
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Volume level (0-100)
    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.status != status {
            self.status = status;
            self.pending_events.push(PlayerEvent::state(status));
        }
    }

    fn push_volume(&mut self) {
        self.engine.set_volume(self.volume.effective_level());
        self.pending_events.push(PlayerEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }
}
