//! Shared fixtures for console tests
#![allow(dead_code)]

use async_trait::async_trait;
use cadence::{Console, ConsoleSettings, EngineSettings, HeadlessEngine};
use cadence_core::{RemoteCandidate, RemoteCompletion, RemoteError, Result};
use cadence_playback::{EngineNotice, PlaybackConfig, PlaylistManager};
use cadence_remote::{Downloader, ProgressFn, RemoteWorkers, WorkerSettings};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Console output that tests can read while the loop runs
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }

    /// Wait until `needle` has been printed
    pub async fn wait_for(&self, needle: &str) {
        let found = tokio::time::timeout(Duration::from_secs(5), async {
            while !self.contains(needle) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(
            found.is_ok(),
            "timed out waiting for {needle:?}; output so far:\n{}",
            self.text()
        );
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Search returns fixed candidates; downloads write a small file
pub struct ScriptedDownloader {
    pub results: Vec<RemoteCandidate>,
}

#[async_trait]
impl Downloader for ScriptedDownloader {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RemoteCandidate>> {
        if query == "offline" {
            return Err(RemoteError::search("network unreachable"));
        }
        Ok(self.results.iter().take(limit).cloned().collect())
    }

    async fn download(
        &self,
        candidate: &RemoteCandidate,
        dest_dir: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<PathBuf> {
        progress(50);
        tokio::time::sleep(Duration::from_millis(20)).await;
        let path = dest_dir.join(format!("{}.m4a", candidate.cache_stem()));
        tokio::fs::write(&path, b"audio").await?;
        Ok(path)
    }
}

pub struct Rig {
    pub console: Console<SharedOutput>,
    pub output: SharedOutput,
    pub completions: Option<UnboundedReceiver<RemoteCompletion>>,
    pub engine_events: Option<UnboundedReceiver<EngineNotice>>,
    pub dir: TempDir,
}

impl Rig {
    pub fn music(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join("music").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"audio").unwrap();
        path
    }

    pub fn playlist_file(&self) -> PathBuf {
        self.dir.path().join("playlist.json")
    }
}

/// Console with real workers and engine; every track lasts `track_length`
pub fn rig(track_length: Duration) -> Rig {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    std::fs::create_dir_all(&cache_dir).unwrap();

    let downloader = ScriptedDownloader {
        results: vec![
            RemoteCandidate::new("One", "one"),
            RemoteCandidate::new("Two", "two"),
        ],
    };
    let (workers, completions) = RemoteWorkers::new(
        Arc::new(downloader),
        WorkerSettings {
            cache_dir,
            search_limit: 10,
        },
    );

    let (engine_tx, engine_events) = mpsc::unbounded_channel();
    let engine = HeadlessEngine::new(
        engine_tx,
        EngineSettings {
            tick: Duration::from_millis(10),
            duration_override: Some(track_length),
        },
    );

    let manager = PlaylistManager::new(
        Box::new(engine),
        Box::new(workers.clone()),
        PlaybackConfig::default(),
    );

    let output = SharedOutput::default();
    let console = Console::new(
        manager,
        workers,
        ConsoleSettings {
            playlist_file: dir.path().join("playlist.json"),
            shutdown_timeout: Duration::from_secs(1),
        },
        output.clone(),
    );

    Rig {
        console,
        output,
        completions: Some(completions),
        engine_events: Some(engine_events),
        dir,
    }
}
