//! Cadence Core
//!
//! Platform-agnostic types and seams shared by every Cadence crate.
//!
//! This crate provides:
//! - **Track references**: `LocalTrack`, `RemoteCandidate`, and the `TrackRef` union
//! - **Remote protocol**: `RequestId`, `RemoteRequest`, `RemoteCompletion`
//! - **Dispatch seam**: the `DownloadDispatcher` trait the playlist uses to hand
//!   work to background tasks without ever sharing its own state
//! - **Error handling**: `RemoteError` for search/download failures
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{LocalTrack, RemoteCandidate, TrackRef};
//!
//! let local = TrackRef::Local(LocalTrack::new("/music/song.mp3"));
//! assert!(local.as_local().is_some());
//!
//! let pending = TrackRef::RemotePending(RemoteCandidate::new("Song", "abc123"));
//! assert!(pending.as_local().is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{RemoteError, Result};
pub use traits::DownloadDispatcher;
pub use types::{
    LocalTrack, RemoteCandidate, RemoteCompletion, RemoteRequest, RepeatMode, RequestId,
    RequestIdGenerator, TrackRef,
};
