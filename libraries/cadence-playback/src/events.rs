//! Playback Events
//!
//! Two directions:
//! - `EngineEvent` flows from the media engine into the controller, stamped
//!   with the [`LoadId`] of the open it belongs to
//! - `PlayerEvent` flows from the manager out to whatever renders the UI
//!
//! The UI drains `PlayerEvent`s after each operation and never reads state
//! any other way while an operation is in flight.

use crate::types::PlaybackStatus;
use cadence_core::{RepeatMode, RequestId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Tag handed to the engine with every `open`
///
/// Each load gets a fresh tag. Notifications carrying any other tag belong
/// to a source that has since been replaced and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(u64);

impl LoadId {
    /// Wrap a raw tag value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw tag value
    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load-{}", self.0)
    }
}

/// Notifications emitted by a media engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Total length of the open media became known
    DurationChanged(Duration),

    /// Playback position moved
    PositionChanged(Duration),

    /// The open media played to its end
    EndOfMedia,

    /// Runtime failure reported by the engine
    Error(String),
}

/// An engine notification and the load it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineNotice {
    /// Tag passed to the `open` that produced this notification
    pub load: LoadId,
    /// What happened
    pub event: EngineEvent,
}

impl EngineNotice {
    /// Stamp an event with its load
    pub fn new(load: LoadId, event: EngineEvent) -> Self {
        Self { load, event }
    }
}

/// Events emitted for UI synchronization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Transport status changed
    StateChanged {
        /// The new status
        status: PlaybackStatus,
        /// Label for the play/pause control
        label: String,
    },

    /// A different source was loaded (None = unloaded)
    SourceChanged {
        /// Path of the new source
        path: Option<PathBuf>,
    },

    /// Position or duration changed
    PositionUpdate {
        /// Position to display
        position_ms: u64,
        /// Total track duration
        duration_ms: u64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Playlist contents or cursor changed
    PlaylistChanged {
        /// Number of entries
        length: usize,
        /// Current index (None = empty / nothing selected)
        current: Option<usize>,
    },

    /// Download queue changed
    QueueChanged {
        /// Pending downloads
        length: usize,
    },

    /// Search results were replaced
    SearchResultsChanged {
        /// Number of candidates
        count: usize,
    },

    /// Progress of an outstanding download
    DownloadProgress {
        /// Originating request
        request: RequestId,
        /// 0-100
        percent: u8,
    },

    /// Repeat mode changed
    RepeatChanged {
        /// New mode
        mode: RepeatMode,
    },

    /// Recoverable problem to show the user (failed search or download)
    Warning {
        /// Human-readable message
        message: String,
    },
}

impl PlayerEvent {
    pub(crate) fn state(status: PlaybackStatus) -> Self {
        Self::StateChanged {
            status,
            label: status.control_label().to_string(),
        }
    }

    pub(crate) fn position(position: Duration, duration: Duration) -> Self {
        Self::PositionUpdate {
            position_ms: position.as_millis() as u64,
            duration_ms: duration.as_millis() as u64,
        }
    }
}
