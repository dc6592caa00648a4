/// Player configuration
use crate::error::{CliError, Result};
use cadence_core::RepeatMode;
use cadence_playback::{NoSourceFallback, PlaybackConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

const ENV_PREFIX: &str = "CADENCE";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_remote")]
    pub remote: RemoteSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub volume: u8,

    #[serde(default)]
    pub repeat: RepeatMode,

    #[serde(default)]
    pub fallback: FallbackMode,

    /// Search text for `fallback = "fetch"`
    #[serde(default)]
    pub fallback_query: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteSettings {
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,

    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default = "default_playlist_file")]
    pub playlist_file: PathBuf,
}

/// What `play` does with an empty playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    #[default]
    Ignore,
    Fetch,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `cadence.toml` is read if present.
    /// `CADENCE_`-prefixed variables override both, with `__` between
    /// section and key (`CADENCE_PLAYBACK__VOLUME=50`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        let config = settings.add_source(env).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.volume > 100 {
            return Err(CliError::Config(format!(
                "playback.volume must be 0-100, got {}",
                self.playback.volume
            )));
        }

        if self.remote.search_limit == 0 {
            return Err(CliError::Config(
                "remote.search_limit must be at least 1".to_string(),
            ));
        }

        if self.playback.fallback == FallbackMode::Fetch
            && self.playback.fallback_query.trim().is_empty()
        {
            return Err(CliError::Config(
                "playback.fallback_query is required when fallback = \"fetch\"".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings for the playlist manager
    pub fn playback_config(&self) -> PlaybackConfig {
        let fallback = match self.playback.fallback {
            FallbackMode::Ignore => NoSourceFallback::Ignore,
            FallbackMode::Fetch => NoSourceFallback::FetchAndPlay {
                query: self.playback.fallback_query.trim().to_string(),
            },
        };

        PlaybackConfig {
            volume: self.playback.volume,
            repeat: self.playback.repeat,
            fallback,
        }
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.shutdown_timeout_secs)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            playback: default_playback(),
            remote: default_remote(),
            storage: default_storage(),
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// Default values
fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        volume: default_volume(),
        repeat: RepeatMode::default(),
        fallback: FallbackMode::default(),
        fallback_query: String::new(),
    }
}

fn default_volume() -> u8 {
    80
}

fn default_remote() -> RemoteSettings {
    RemoteSettings {
        ytdlp_path: default_ytdlp_path(),
        search_limit: default_search_limit(),
        shutdown_timeout_secs: default_shutdown_timeout_secs(),
    }
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_search_limit() -> usize {
    10
}

fn default_shutdown_timeout_secs() -> u64 {
    cadence_remote::DEFAULT_SHUTDOWN_TIMEOUT.as_secs()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        cache_dir: default_cache_dir(),
        playlist_file: default_playlist_file(),
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./data/cache")
}

fn default_playlist_file() -> PathBuf {
    PathBuf::from("./data/playlist.json")
}
