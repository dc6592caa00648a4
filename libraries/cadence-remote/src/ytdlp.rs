//! yt-dlp process adapter
//!
//! Runs the external `yt-dlp` executable. Searches use flat-playlist JSON
//! output; downloads extract audio into the cache directory, named by
//! [`RemoteCandidate::cache_stem`], and report the `[download]  NN.N%`
//! lines as progress.

use crate::downloader::{Downloader, ProgressFn};
use async_trait::async_trait;
use cadence_core::{RemoteCandidate, RemoteError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// Downloader backed by the `yt-dlp` command line tool
#[derive(Debug, Clone)]
pub struct YtDlpDownloader {
    program: PathBuf,
}

impl YtDlpDownloader {
    /// Use `program` as the yt-dlp executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--no-warnings")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RemoteCandidate>> {
        let output = self
            .command()
            .arg(format!("ytsearch{}:{}", limit.max(1), query))
            .arg("--flat-playlist")
            .arg("--dump-json")
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RemoteError::search(format!("yt-dlp failed: {}", stderr.trim())));
        }

        let results = parse_search_output(&String::from_utf8_lossy(&output.stdout))?;
        if results.is_empty() {
            return Err(RemoteError::NoResults(query.to_string()));
        }
        debug!(query, count = results.len(), "yt-dlp search finished");
        Ok(results)
    }

    async fn download(
        &self,
        candidate: &RemoteCandidate,
        dest_dir: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dest_dir).await?;
        let template = output_template(dest_dir, candidate);

        let mut child = self
            .command()
            .arg("-x")
            .arg("--no-playlist")
            .arg("--newline")
            .arg("--progress")
            .arg("--print")
            .arg("after_move:filepath")
            .arg("-o")
            .arg(&template)
            .arg(source_url(candidate))
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RemoteError::download("yt-dlp stdout unavailable"))?;
        let mut lines = BufReader::new(stdout).lines();
        let mut output_path = None;

        while let Some(line) = lines.next_line().await? {
            if let Some(percent) = parse_progress(&line) {
                progress(percent);
            } else if let Some(path) = parse_output_path(&line) {
                output_path = Some(path);
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                pipe.read_to_string(&mut stderr).await?;
            }
            warn!(id = %candidate.id, status = %status, "yt-dlp download failed");
            return Err(RemoteError::download(format!(
                "yt-dlp exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        progress(100);
        output_path.ok_or_else(|| RemoteError::Parse("yt-dlp did not report an output file".into()))
    }
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    id: String,
    title: Option<String>,
    thumbnail: Option<String>,
    #[serde(default)]
    thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl From<SearchEntry> for RemoteCandidate {
    fn from(mut entry: SearchEntry) -> Self {
        let title = entry.title.unwrap_or_else(|| entry.id.clone());
        // Largest thumbnail comes last
        let thumbnail = entry
            .thumbnail
            .or_else(|| entry.thumbnails.pop().map(|t| t.url));

        RemoteCandidate {
            title,
            id: entry.id,
            thumbnail,
        }
    }
}

/// Parse `--dump-json` output: one JSON object per line
pub(crate) fn parse_search_output(stdout: &str) -> Result<Vec<RemoteCandidate>> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str::<SearchEntry>(line)
                .map(RemoteCandidate::from)
                .map_err(|e| RemoteError::Parse(e.to_string()))
        })
        .collect()
}

/// Percentage from a `[download]  42.3% of 3.1MiB ...` line
pub(crate) fn parse_progress(line: &str) -> Option<u8> {
    let rest = line.strip_prefix("[download]")?.trim_start();
    let (number, _) = rest.split_once('%')?;
    let percent: f32 = number.trim().parse().ok()?;
    Some(percent.clamp(0.0, 100.0) as u8)
}

fn parse_output_path(line: &str) -> Option<PathBuf> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('[') {
        return None;
    }
    Some(PathBuf::from(line))
}

fn output_template(dest_dir: &Path, candidate: &RemoteCandidate) -> PathBuf {
    dest_dir.join(format!("{}.%(ext)s", candidate.cache_stem()))
}

fn source_url(candidate: &RemoteCandidate) -> String {
    if candidate.id.starts_with("http://") || candidate.id.starts_with("https://") {
        candidate.id.clone()
    } else {
        format!("https://www.youtube.com/watch?v={}", candidate.id)
    }
}
