//! Downloader wrapper that reuses finished downloads from the cache

use async_trait::async_trait;
use cadence_core::{RemoteCandidate, Result};
use cadence_remote::{Downloader, ProgressFn};
use cadence_storage::CacheDir;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Checks the cache before handing a download to `inner`
pub struct CacheFirst<D> {
    inner: D,
    cache: CacheDir,
}

impl<D: Downloader> CacheFirst<D> {
    pub fn new(inner: D, cache: CacheDir) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<D: Downloader> Downloader for CacheFirst<D> {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RemoteCandidate>> {
        self.inner.search(query, limit).await
    }

    async fn download(
        &self,
        candidate: &RemoteCandidate,
        dest_dir: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<PathBuf> {
        if let Some(path) = self.cache.cached_track(candidate) {
            debug!(id = %candidate.id, path = %path.display(), "Using cached download");
            progress(100);
            return Ok(path);
        }
        self.inner.download(candidate, dest_dir, progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    #[derive(Default)]
    struct CountingDownloader {
        downloads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Downloader for CountingDownloader {
        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<RemoteCandidate>> {
            Ok(vec![RemoteCandidate::new("Song", "abc")])
        }

        async fn download(
            &self,
            candidate: &RemoteCandidate,
            dest_dir: &Path,
            _progress: ProgressFn<'_>,
        ) -> Result<PathBuf> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            let path = dest_dir.join(format!("{}.opus", candidate.cache_stem()));
            std::fs::write(&path, b"audio")?;
            Ok(path)
        }
    }

    #[tokio::test]
    async fn second_download_comes_from_cache() {
        let dir = tempdir().unwrap();
        let cache = CacheDir::new(dir.path());
        cache.initialize().unwrap();

        let downloads = Arc::new(AtomicUsize::new(0));
        let downloader = CacheFirst::new(
            CountingDownloader {
                downloads: Arc::clone(&downloads),
            },
            cache.clone(),
        );
        let candidate = RemoteCandidate::new("Song", "abc");
        let reported = Mutex::new(Vec::new());
        let progress = |percent: u8| reported.lock().unwrap().push(percent);

        let first = downloader
            .download(&candidate, &cache.tracks_dir(), &progress)
            .await
            .unwrap();
        let second = downloader
            .download(&candidate, &cache.tracks_dir(), &progress)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(downloads.load(Ordering::SeqCst), 1);
        assert_eq!(*reported.lock().unwrap(), vec![100]);
    }

    #[tokio::test]
    async fn url_candidates_are_cached_too() {
        let dir = tempdir().unwrap();
        let cache = CacheDir::new(dir.path());
        cache.initialize().unwrap();

        let downloads = Arc::new(AtomicUsize::new(0));
        let downloader = CacheFirst::new(
            CountingDownloader {
                downloads: Arc::clone(&downloads),
            },
            cache.clone(),
        );
        let candidate = RemoteCandidate::new("Song", "https://example.com/a/song.mp3");
        let progress = |_: u8| {};

        let first = downloader
            .download(&candidate, &cache.tracks_dir(), &progress)
            .await
            .unwrap();
        downloader
            .download(&candidate, &cache.tracks_dir(), &progress)
            .await
            .unwrap();

        assert_eq!(first.parent(), Some(cache.tracks_dir().as_path()));
        assert_eq!(downloads.load(Ordering::SeqCst), 1);
    }
}
