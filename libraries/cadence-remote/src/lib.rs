//! Cadence Remote
//!
//! Background search and download for remote tracks.
//!
//! # Features
//!
//! - **Downloader seam**: the async [`Downloader`] trait for search and fetch backends
//! - **Workers**: [`RemoteWorkers`] runs one tokio task per request, each with its
//!   own cancellation token, and implements [`DownloadDispatcher`](cadence_core::DownloadDispatcher)
//! - **Bounded shutdown**: cancel everything and abort stragglers after a timeout
//! - **yt-dlp**: [`YtDlpDownloader`] drives the external `yt-dlp` tool
//!
//! # Example
//!
//! ```no_run
//! use cadence_core::{RemoteRequest, RequestId};
//! use cadence_remote::{RemoteWorkers, WorkerSettings, YtDlpDownloader};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (workers, mut completions) = RemoteWorkers::new(
//!         Arc::new(YtDlpDownloader::default()),
//!         WorkerSettings::default(),
//!     );
//!
//!     workers.spawn(RemoteRequest::Search {
//!         id: RequestId::new(1),
//!         query: "lofi beats".into(),
//!     });
//!
//!     if let Some(completion) = completions.recv().await {
//!         println!("{completion:?}");
//!     }
//!
//!     workers.shutdown(Duration::from_secs(5)).await;
//! }
//! ```

#![forbid(unsafe_code)]

mod downloader;
mod workers;
mod ytdlp;

pub use downloader::{Downloader, ProgressFn};
pub use workers::{RemoteWorkers, ShutdownReport, WorkerSettings};
pub use ytdlp::YtDlpDownloader;

/// Default time allowed for workers to stop on shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
