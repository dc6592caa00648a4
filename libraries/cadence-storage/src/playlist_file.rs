//! Playlist save file
//!
//! Two ordered lists, local track paths and remote candidates, stored as
//! pretty-printed JSON. Saves overwrite the whole file and loads read the
//! whole file; there is no merging.

use crate::error::{Result, StorageError};
use cadence_core::{LocalTrack, RemoteCandidate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Contents of a playlist save file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistFile {
    /// Local tracks in playlist order
    #[serde(default)]
    pub tracks: Vec<LocalTrack>,

    /// Remote candidates (last search results)
    #[serde(default)]
    pub remote: Vec<RemoteCandidate>,
}

impl PlaylistFile {
    /// Create a save file from its two lists
    pub fn new(tracks: Vec<LocalTrack>, remote: Vec<RemoteCandidate>) -> Self {
        Self { tracks, remote }
    }

    /// Read a save file
    ///
    /// # Errors
    /// `NotFound` if `path` does not exist, `Serialization` if it is not a
    /// valid playlist.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(StorageError::io(path, e)),
        };

        let file: Self =
            serde_json::from_str(&raw).map_err(|source| StorageError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            path = %path.display(),
            tracks = file.tracks.len(),
            remote = file.remote.len(),
            "Loaded playlist file"
        );
        Ok(file)
    }

    /// Write the whole save file, replacing any previous one
    ///
    /// Parent directories are created as needed. The file is written next to
    /// its destination and renamed into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let json =
            serde_json::to_string_pretty(self).map_err(|source| StorageError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(|e| StorageError::io(&staging, e))?;
        fs::rename(&staging, path).map_err(|e| StorageError::io(path, e))?;

        debug!(
            path = %path.display(),
            tracks = self.tracks.len(),
            remote = self.remote.len(),
            "Saved playlist file"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> PlaylistFile {
        PlaylistFile::new(
            vec![LocalTrack::new("/music/a.mp3"), LocalTrack::new("/music/a.mp3")],
            vec![RemoteCandidate::new("Song", "abc123").with_thumbnail("https://i.ytimg.com/abc.jpg")],
        )
    }

    #[test]
    fn save_then_load_preserves_order_and_duplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("playlist.json");

        sample().save(&path).unwrap();
        let loaded = PlaylistFile::load(&path).unwrap();

        assert_eq!(loaded, sample());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn on_disk_shape_is_two_plain_lists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        sample().save(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["tracks"][0], "/music/a.mp3");
        assert_eq!(json["remote"][0]["id"], "abc123");
        assert_eq!(json["remote"][0]["title"], "Song");
    }

    #[test]
    fn save_overwrites_wholesale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        sample().save(&path).unwrap();

        PlaylistFile::new(vec![LocalTrack::new("/music/z.mp3")], vec![])
            .save(&path)
            .unwrap();

        let loaded = PlaylistFile::load(&path).unwrap();
        assert_eq!(loaded.tracks, vec![LocalTrack::new("/music/z.mp3")]);
        assert!(loaded.remote.is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = PlaylistFile::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn corrupt_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        fs::write(&path, "{ not json").unwrap();

        let err = PlaylistFile::load(&path).unwrap_err();
        assert!(matches!(err, StorageError::Serialization { .. }));
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        fs::write(&path, r#"{"tracks": ["/music/a.mp3"]}"#).unwrap();

        let loaded = PlaylistFile::load(&path).unwrap();
        assert_eq!(loaded.tracks.len(), 1);
        assert!(loaded.remote.is_empty());
    }
}
