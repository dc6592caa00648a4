//! Cadence console player
//!
//! Wires the playlist manager to a headless media engine, yt-dlp backed
//! remote workers and the playlist file, behind a line-oriented console.
//!
//! This library exposes the pieces for testing purposes.

#![forbid(unsafe_code)]

pub mod commands;
pub mod config;
pub mod console;
pub mod downloads;
pub mod engine;
pub mod error;

// Re-export commonly used types for convenience
pub use commands::{Command, CommandError};
pub use config::{FallbackMode, PlayerConfig};
pub use console::{Console, ConsoleSettings, Flow};
pub use downloads::CacheFirst;
pub use engine::{EngineSettings, HeadlessEngine};
pub use error::{CliError, Result};
