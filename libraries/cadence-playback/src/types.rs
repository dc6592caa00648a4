//! Core types for playback management

use cadence_core::{LocalTrack, RemoteCandidate, RepeatMode};
use serde::{Deserialize, Serialize};

/// Transport status of the loaded source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Nothing playing (also the state before anything has loaded)
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

impl PlaybackStatus {
    /// Text for the single play/pause control
    ///
    /// Playing shows "Pause"; every other status shows "Play".
    pub fn control_label(self) -> &'static str {
        match self {
            Self::Playing => "Pause",
            Self::Paused | Self::Stopped => "Play",
        }
    }
}

/// What `play()` does when nothing has ever been loaded
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NoSourceFallback {
    /// Report an empty playlist and do nothing else
    #[default]
    Ignore,

    /// Search for `query`, download the first hit, and play it
    FetchAndPlay {
        /// Search text used to pick a track
        query: String,
    },
}

/// Result of asking the controller to play or toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Engine was told to play
    Playing,

    /// Engine was told to pause
    Paused,

    /// No source is loaded; the owner should run its fallback
    NothingLoaded,
}

/// Configuration for the playlist manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial volume (0-100, default: 80)
    pub volume: u8,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Behaviour of `play()` with nothing loaded (default: Ignore)
    pub fallback: NoSourceFallback,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 80,
            repeat: RepeatMode::Off,
            fallback: NoSourceFallback::Ignore,
        }
    }
}

/// Everything the session file persists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistSnapshot {
    /// Playlist entries in order
    pub tracks: Vec<LocalTrack>,

    /// Last search results
    pub search_results: Vec<RemoteCandidate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.volume, 80);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert_eq!(config.fallback, NoSourceFallback::Ignore);
    }

    #[test]
    fn label_matches_status() {
        assert_eq!(PlaybackStatus::Playing.control_label(), "Pause");
        assert_eq!(PlaybackStatus::Paused.control_label(), "Play");
        assert_eq!(PlaybackStatus::Stopped.control_label(), "Play");
    }
}
