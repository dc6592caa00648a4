//! Cadence Storage
//!
//! On-disk state for Cadence:
//! - **Playlist file**: local paths plus remote candidates as JSON, written and read wholesale
//! - **Cache directory**: append-only layout for downloaded tracks and thumbnails
//!
//! # Example
//!
//! ```no_run
//! use cadence_core::LocalTrack;
//! use cadence_storage::PlaylistFile;
//! use std::path::Path;
//!
//! let file = PlaylistFile::new(vec![LocalTrack::new("/music/a.mp3")], vec![]);
//! file.save(Path::new("./data/playlist.json")).unwrap();
//!
//! let loaded = PlaylistFile::load(Path::new("./data/playlist.json")).unwrap();
//! assert_eq!(loaded.tracks.len(), 1);
//! ```

#![forbid(unsafe_code)]

mod cache;
mod error;
mod playlist_file;

pub use cache::CacheDir;
pub use error::{Result, StorageError};
pub use playlist_file::PlaylistFile;
