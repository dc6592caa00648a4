//! Error types for playback management

use cadence_core::RemoteError;
use std::path::PathBuf;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Media engine could not open the path (unreadable or unsupported format)
    #[error("Cannot open {path:?}: {reason}")]
    MediaOpen { path: PathBuf, reason: String },

    /// Media engine reported a runtime failure
    #[error("Playback failed: {0}")]
    Engine(String),

    /// Navigation requested on an empty playlist
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Background download failed
    #[error("Download failed: {0}")]
    Download(String),

    /// Background search failed
    #[error("Search failed: {0}")]
    Search(String),

    /// Current source does not support seeking
    #[error("Seek rejected: source is not seekable")]
    SeekRejected,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),
}

impl PlaybackError {
    /// Create a media open error
    pub fn media_open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MediaOpen {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this should be shown as a recoverable warning rather than an error
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::EmptyPlaylist | Self::SeekRejected | Self::Download(_) | Self::Search(_)
        )
    }
}

impl From<RemoteError> for PlaybackError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::Search(msg) => Self::Search(msg),
            RemoteError::NoResults(query) => Self::Search(format!("no results for '{query}'")),
            RemoteError::Download(msg) => Self::Download(msg),
            RemoteError::Parse(msg) => Self::Download(format!("unreadable downloader output: {msg}")),
            RemoteError::Cancelled => Self::Download("cancelled".to_string()),
            RemoteError::Io(e) => Self::Download(e.to_string()),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
