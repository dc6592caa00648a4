//! Cadence - Playback Management
//!
//! Platform-agnostic playlist and transport state machine.
//!
//! This crate provides:
//! - `PlaybackController`: the single owner of what is loaded and its transport state
//! - `PlaylistManager`: playlist, download queue, search results and auto-advance policy
//! - Stale-completion rejection for out-of-order background results
//! - Uniform shuffle, repeat modes, volume and mute
//! - A seek gesture that position updates cannot overwrite
//!
//! # Architecture
//!
//! `cadence-playback` performs no I/O of its own:
//! - Decoding and rendering happen behind the [`MediaEngine`] trait
//! - Search and download work is handed to a [`DownloadDispatcher`](cadence_core::DownloadDispatcher)
//!   and comes back as [`RemoteCompletion`](cadence_core::RemoteCompletion) values
//! - UI state is published as [`PlayerEvent`]s drained after each operation
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{DownloadDispatcher, RemoteRequest, RequestId};
//! use cadence_playback::{LoadId, MediaEngine, PlaybackConfig, PlaylistManager, Result};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! struct SilentEngine;
//!
//! impl MediaEngine for SilentEngine {
//!     fn open(&mut self, _path: &Path, _load: LoadId) -> Result<()> { Ok(()) }
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn stop(&mut self) {}
//!     fn set_position(&mut self, _position: Duration) {}
//!     fn set_volume(&mut self, _volume: u8) {}
//!     fn is_seekable(&self) -> bool { true }
//! }
//!
//! struct NoRemote;
//!
//! impl DownloadDispatcher for NoRemote {
//!     fn dispatch(&mut self, _request: RemoteRequest) {}
//!     fn cancel(&mut self, _id: RequestId) {}
//! }
//!
//! let mut manager = PlaylistManager::new(
//!     Box::new(SilentEngine),
//!     Box::new(NoRemote),
//!     PlaybackConfig::default(),
//! );
//!
//! manager.add_local(["/music/a.mp3", "/music/b.mp3"]).unwrap();
//! assert_eq!(manager.current_index(), Some(0));
//!
//! manager.next().unwrap();
//! assert_eq!(manager.current_index(), Some(1));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod controller;
mod engine;
mod error;
mod events;
mod manager;
mod playlist;
mod queue;
mod requests;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use controller::{ControllerSignal, PlaybackController};
pub use engine::MediaEngine;
pub use error::{PlaybackError, Result};
pub use events::{EngineEvent, EngineNotice, LoadId, PlayerEvent};
pub use manager::PlaylistManager;
pub use playlist::Playlist;
pub use queue::DownloadQueue;
pub use requests::RequestPurpose;
pub use shuffle::shuffle_tracks;
pub use types::{NoSourceFallback, PlayOutcome, PlaybackConfig, PlaybackStatus, PlaylistSnapshot};
pub use volume::Volume;
