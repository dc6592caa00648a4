//! Ordered playlist with a cursor
//!
//! Holds only resolved local tracks. Remote candidates enter the playlist
//! after their download completes.

use crate::shuffle::shuffle_tracks;
use cadence_core::LocalTrack;
use rand::Rng;

/// Ordered list of local tracks plus the index of the current one
///
/// `current` is `None` exactly when the playlist is empty or nothing has been
/// selected since the last `replace()`.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<LocalTrack>,
    current: Option<usize>,
}

impl Playlist {
    /// Create new empty playlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tracks, returning the index of the first appended one
    ///
    /// Returns `None` when `tracks` is empty.
    pub fn extend(&mut self, tracks: impl IntoIterator<Item = LocalTrack>) -> Option<usize> {
        let start = self.tracks.len();
        self.tracks.extend(tracks);
        (self.tracks.len() > start).then_some(start)
    }

    /// Append one track, returning its index
    pub fn push(&mut self, track: LocalTrack) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    /// Move the cursor to `index`
    ///
    /// Returns the selected track, or `None` if out of bounds (cursor unchanged).
    pub fn select(&mut self, index: usize) -> Option<&LocalTrack> {
        if index >= self.tracks.len() {
            return None;
        }
        self.current = Some(index);
        self.tracks.get(index)
    }

    /// Advance the cursor, wrapping from the last entry to the first
    ///
    /// With no current entry, selects index 0.
    pub fn advance(&mut self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let next = match self.current {
            Some(index) => (index + 1) % len,
            None => 0,
        };
        self.current = Some(next);
        Some(next)
    }

    /// Move the cursor back, wrapping from the first entry to the last
    ///
    /// With no current entry, selects the last index.
    pub fn retreat(&mut self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let previous = match self.current {
            Some(0) | None => len - 1,
            Some(index) => index - 1,
        };
        self.current = Some(previous);
        Some(previous)
    }

    /// Randomly permute entries and point the cursor at index 0
    ///
    /// No-op on an empty playlist.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.tracks.is_empty() {
            return;
        }
        shuffle_tracks(&mut self.tracks, rng);
        self.current = Some(0);
    }

    /// Replace every entry; the cursor is cleared
    pub fn replace(&mut self, tracks: Vec<LocalTrack>) {
        self.tracks = tracks;
        self.current = None;
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }

    // ===== Queries =====

    /// Index of the current entry
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The current entry
    pub fn current(&self) -> Option<&LocalTrack> {
        self.current.and_then(|index| self.tracks.get(index))
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Option<&LocalTrack> {
        self.tracks.get(index)
    }

    /// All entries in order
    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
