/// Cadence - console music player
use anyhow::Context;
use cadence::{
    console, CacheFirst, Console, ConsoleSettings, EngineSettings, HeadlessEngine, PlayerConfig,
};
use cadence_playback::PlaylistManager;
use cadence_remote::{RemoteWorkers, WorkerSettings, YtDlpDownloader};
use cadence_storage::CacheDir;
use clap::Parser;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Console music player with queued remote tracks", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./cadence.toml if present)
    #[arg(short, long, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Treat every track as this many seconds long instead of probing it
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    headless_duration: Option<Duration>,
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let invalid = || format!("'{value}' is not a positive number of seconds");
    let secs = value
        .parse::<f64>()
        .ok()
        .filter(|secs| *secs > 0.0)
        .ok_or_else(invalid)?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("'{value}' is out of range: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the console
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence=info,cadence_playback=info,cadence_remote=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = PlayerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.validate()?;

    let cache = CacheDir::new(&config.storage.cache_dir);
    cache.initialize()?;
    tracing::info!("Cache: {}", cache.root().display());

    let downloader = CacheFirst::new(
        YtDlpDownloader::new(&config.remote.ytdlp_path),
        cache.clone(),
    );
    let (workers, completions) = RemoteWorkers::new(
        Arc::new(downloader),
        WorkerSettings {
            cache_dir: cache.tracks_dir(),
            search_limit: config.remote.search_limit,
        },
    );

    let (engine_tx, engine_events) = mpsc::unbounded_channel();
    let engine = HeadlessEngine::new(
        engine_tx,
        EngineSettings {
            duration_override: cli.headless_duration,
            ..EngineSettings::default()
        },
    );

    let manager = PlaylistManager::new(
        Box::new(engine),
        Box::new(workers.clone()),
        config.playback_config(),
    );

    let mut console = Console::new(
        manager,
        workers,
        ConsoleSettings::from(&config),
        std::io::stdout(),
    );
    let report = console
        .run(console::stdin_lines(), completions, engine_events)
        .await?;

    tracing::info!(
        finished = report.finished,
        aborted = report.aborted,
        "Cadence stopped"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_accepts_fractions() {
        assert_eq!(parse_seconds("1.5"), Ok(Duration::from_millis(1500)));
    }

    #[test]
    fn parse_seconds_rejects_non_positive_and_garbage() {
        for value in ["0", "-3", "abc", "NaN", ""] {
            assert!(parse_seconds(value).is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn parse_seconds_rejects_overflow_instead_of_panicking() {
        for value in ["1e30", "inf"] {
            let err = parse_seconds(value).unwrap_err();
            assert!(err.contains(value));
        }
    }
}
