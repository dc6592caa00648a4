//! Platform-agnostic media engine trait
//!
//! Abstracts decode/render so the controller works with any backend.

use crate::error::Result;
use crate::events::LoadId;
use std::path::Path;
use std::time::Duration;

/// Decodes and renders one local source at a time
///
/// Implementors report progress asynchronously as
/// [`EngineNotice`](crate::EngineNotice)s stamped with the [`LoadId`] of the
/// `open` they belong to. The owner feeds them back through
/// `PlaylistManager::handle_engine_event`.
#[cfg_attr(test, mockall::automock)]
pub trait MediaEngine: Send {
    /// Open a local file, replacing whatever was open
    ///
    /// Every later notification about this media carries `load`.
    ///
    /// # Returns
    /// * `Ok(())` - Media is open and ready to play
    /// * `Err(PlaybackError::MediaOpen)` - Unreadable path or unsupported format
    fn open(&mut self, path: &Path, load: LoadId) -> Result<()>;

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback, keeping position
    fn pause(&mut self);

    /// Stop and release the open media
    fn stop(&mut self);

    /// Jump to a position in the open media
    fn set_position(&mut self, position: Duration);

    /// Set output volume (0-100)
    fn set_volume(&mut self, volume: u8);

    /// Whether the open media supports seeking
    fn is_seekable(&self) -> bool;
}
