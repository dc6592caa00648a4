//! Download cache layout
//!
//! ```text
//! <root>/
//!   tracks/       downloaded audio, one file per candidate cache stem
//!   thumbnails/   search result artwork
//! ```
//!
//! The cache only grows. Nothing in Cadence deletes from it; eviction is
//! left to the user.

use crate::error::{Result, StorageError};
use cadence_core::RemoteCandidate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const TRACKS_DIR: &str = "tracks";
const THUMBNAILS_DIR: &str = "thumbnails";

/// Extensions of files a downloader leaves behind while still writing
const PARTIAL_EXTENSIONS: &[&str] = &["part", "ytdl", "tmp"];

/// Append-only cache directory
#[derive(Debug, Clone)]
pub struct CacheDir {
    root: PathBuf,
}

impl CacheDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory layout
    pub fn initialize(&self) -> Result<()> {
        for dir in [self.tracks_dir(), self.thumbnails_dir()] {
            fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        }
        debug!(root = %self.root.display(), "Cache directory ready");
        Ok(())
    }

    /// Cache root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where downloaded tracks land
    pub fn tracks_dir(&self) -> PathBuf {
        self.root.join(TRACKS_DIR)
    }

    /// Where thumbnails land
    pub fn thumbnails_dir(&self) -> PathBuf {
        self.root.join(THUMBNAILS_DIR)
    }

    /// Previously downloaded, complete file for a candidate
    ///
    /// Files are matched on [`RemoteCandidate::cache_stem`]. Partial
    /// downloads are never returned.
    pub fn cached_track(&self, candidate: &RemoteCandidate) -> Option<PathBuf> {
        let stem = candidate.cache_stem();
        let entries = fs::read_dir(self.tracks_dir()).ok()?;
        entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .filter(|path| !is_partial(path))
            .find(|path| path.file_stem().and_then(|s| s.to_str()) == Some(stem.as_str()))
    }
}

fn is_partial(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PARTIAL_EXTENSIONS.contains(&ext))
}
