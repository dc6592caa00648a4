//! Downloader trait - the external search/fetch collaborator

use async_trait::async_trait;
use cadence_core::{RemoteCandidate, Result};
use std::path::{Path, PathBuf};

/// Progress sink, called with 0-100
pub type ProgressFn<'a> = &'a (dyn Fn(u8) + Send + Sync);

/// Resolves queries and fetches candidates to local files
///
/// Implementations are driven from worker tasks only. A call may be dropped
/// mid-flight when its request is cancelled, so implementations must not
/// leave state behind that outlives the future (child processes should be
/// spawned with `kill_on_drop`).
#[async_trait]
pub trait Downloader: Send + Sync + 'static {
    /// Resolve `query` into at most `limit` candidates, best match first
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RemoteCandidate>>;

    /// Download `candidate` into `dest_dir` and return the path of the file
    async fn download(
        &self,
        candidate: &RemoteCandidate,
        dest_dir: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<PathBuf>;
}
