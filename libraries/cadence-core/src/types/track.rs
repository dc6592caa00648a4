//! Track reference types

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// A track that is present on disk and can be handed to a media engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalTrack(PathBuf);

impl LocalTrack {
    /// Create a local track reference from a filesystem path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Get the filesystem path
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Consume and return the path
    pub fn into_path(self) -> PathBuf {
        self.0
    }

    /// File name for display, falling back to the full path
    pub fn display_name(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.display().to_string())
    }
}

impl fmt::Display for LocalTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for LocalTrack {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&str> for LocalTrack {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}

/// A track discovered by search that has not been downloaded yet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteCandidate {
    /// Human-readable title
    pub title: String,

    /// Opaque identifier understood by the downloader
    pub id: String,

    /// Thumbnail reference (URL or cached path)
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl RemoteCandidate {
    /// Create a candidate without a thumbnail
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            thumbnail: None,
        }
    }

    /// Attach a thumbnail reference
    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// File name (without extension) this candidate is cached under
    ///
    /// Plain ids such as `dQw4w9WgXcQ` are used as-is. Anything else (URLs,
    /// ids with separators) becomes `url-` plus a SHA-256 prefix, so the
    /// result is always a single path component.
    pub fn cache_stem(&self) -> String {
        let plain = !self.id.is_empty()
            && self
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if plain {
            return self.id.clone();
        }

        let digest = Sha256::digest(self.id.as_bytes());
        format!("url-{}", &hex::encode(digest)[..16])
    }
}

/// Anything that identifies playable content
///
/// Only the `Local` variant may be opened by a media engine; a
/// `RemotePending` reference has to go through a download first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "track", rename_all = "snake_case")]
pub enum TrackRef {
    /// Resolved file on disk
    Local(LocalTrack),

    /// Search hit awaiting download
    RemotePending(RemoteCandidate),
}

impl TrackRef {
    /// The local track, if this reference is already resolved
    pub fn as_local(&self) -> Option<&LocalTrack> {
        match self {
            Self::Local(track) => Some(track),
            Self::RemotePending(_) => None,
        }
    }

    /// Whether a download is still required before playback
    pub fn needs_download(&self) -> bool {
        matches!(self, Self::RemotePending(_))
    }
}

impl From<LocalTrack> for TrackRef {
    fn from(track: LocalTrack) -> Self {
        Self::Local(track)
    }
}

impl From<RemoteCandidate> for TrackRef {
    fn from(candidate: RemoteCandidate) -> Self {
        Self::RemotePending(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_uses_file_name() {
        let track = LocalTrack::new("/music/albums/song.mp3");
        assert_eq!(track.display_name(), "song.mp3");
    }

    #[test]
    fn plain_ids_are_their_own_cache_stem() {
        assert_eq!(RemoteCandidate::new("t", "dQw4w9WgXcQ").cache_stem(), "dQw4w9WgXcQ");
        assert_eq!(RemoteCandidate::new("t", "a-b_c").cache_stem(), "a-b_c");
    }

    #[test]
    fn url_ids_hash_to_a_single_component() {
        let first = RemoteCandidate::new("t", "https://example.com/a/b?x=1").cache_stem();
        let second = RemoteCandidate::new("t", "https://example.com/a/b?x=2").cache_stem();

        assert!(first.starts_with("url-"));
        assert_eq!(first.len(), "url-".len() + 16);
        assert!(!first.contains('/'));
        assert_ne!(first, second);
        assert_eq!(
            first,
            RemoteCandidate::new("other title", "https://example.com/a/b?x=1").cache_stem()
        );
        assert!(RemoteCandidate::new("t", "../escape").cache_stem().starts_with("url-"));
        assert!(RemoteCandidate::new("t", "").cache_stem().starts_with("url-"));
    }

    #[test]
    fn remote_reference_needs_download() {
        let pending = TrackRef::from(RemoteCandidate::new("Song", "xyz"));
        assert!(pending.needs_download());
        assert!(pending.as_local().is_none());

        let local = TrackRef::from(LocalTrack::new("a.mp3"));
        assert!(!local.needs_download());
        assert_eq!(local.as_local().map(|t| t.path()), Some(Path::new("a.mp3")));
    }

    #[test]
    fn candidate_without_thumbnail_deserializes() {
        let candidate: RemoteCandidate =
            serde_json::from_str(r#"{"title":"Song","id":"xyz"}"#).unwrap();
        assert_eq!(candidate, RemoteCandidate::new("Song", "xyz"));
    }

    #[test]
    fn track_ref_is_tagged_by_kind() {
        let json = serde_json::to_value(TrackRef::from(
            RemoteCandidate::new("Song", "xyz").with_thumbnail("https://img/1.jpg"),
        ))
        .unwrap();
        assert_eq!(json["kind"], "remote_pending");
        assert_eq!(json["track"]["thumbnail"], "https://img/1.jpg");

        let local = serde_json::to_value(TrackRef::from(LocalTrack::new("/music/a.mp3"))).unwrap();
        assert_eq!(local["kind"], "local");
        assert_eq!(local["track"], "/music/a.mp3");
    }
}
