//! Console control loop
//!
//! The only place playlist state is touched. One `select!` loop takes typed
//! commands, worker completions and engine notifications in arrival order,
//! applies each through the playlist manager and prints the events that
//! follow.

use crate::commands::{Command, HELP};
use crate::config::PlayerConfig;
use crate::error::Result;
use cadence_core::{LocalTrack, RemoteCompletion};
use cadence_playback::{
    EngineNotice, PlaybackError, PlaybackStatus, PlayerEvent, PlaylistManager, PlaylistSnapshot,
};
use cadence_remote::{RemoteWorkers, ShutdownReport};
use cadence_storage::{PlaylistFile, StorageError};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error, info, warn};

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Console settings taken from the player configuration
#[derive(Debug, Clone)]
pub struct ConsoleSettings {
    pub playlist_file: PathBuf,
    pub shutdown_timeout: Duration,
}

impl From<&PlayerConfig> for ConsoleSettings {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            playlist_file: config.storage.playlist_file.clone(),
            shutdown_timeout: config.shutdown_timeout(),
        }
    }
}

pub struct Console<W> {
    manager: PlaylistManager,
    workers: RemoteWorkers,
    settings: ConsoleSettings,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(
        manager: PlaylistManager,
        workers: RemoteWorkers,
        settings: ConsoleSettings,
        out: W,
    ) -> Self {
        Self {
            manager,
            workers,
            settings,
            out,
        }
    }

    /// Run until `quit` or end of input, then stop the workers
    pub async fn run(
        &mut self,
        mut lines: UnboundedReceiver<String>,
        mut completions: UnboundedReceiver<RemoteCompletion>,
        mut engine_events: UnboundedReceiver<EngineNotice>,
    ) -> Result<ShutdownReport> {
        writeln!(self.out, "cadence ready; type 'help' for commands")?;

        loop {
            tokio::select! {
                line = lines.recv() => {
                    let Some(line) = line else {
                        debug!("Input closed");
                        break;
                    };
                    if self.execute_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                Some(completion) = completions.recv() => {
                    if let Err(err) = self.manager.apply_completion(completion) {
                        self.report(&err)?;
                    }
                }
                Some(notice) = engine_events.recv() => {
                    if let Err(err) = self.manager.handle_engine_event(notice) {
                        self.report(&err)?;
                    }
                }
            }
            self.print_events()?;
        }

        info!(
            in_flight = self.workers.in_flight(),
            "Shutting down remote workers"
        );
        let report = self.workers.shutdown(self.settings.shutdown_timeout).await;
        writeln!(self.out, "bye")?;
        Ok(report)
    }

    /// Parse and execute one input line
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(err) => {
                writeln!(self.out, "error: {err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        debug!(?command, "Executing command");

        let outcome = match command {
            Command::Add(paths) => self.manager.add_local(paths),
            Command::Play => self.manager.play(),
            Command::Pause => {
                self.manager.pause();
                Ok(())
            }
            Command::Toggle => self.manager.toggle(),
            Command::Next => self.manager.next(),
            Command::Prev => self.manager.previous(),
            Command::Jump(index) => self.manager.play_at(index),
            Command::Shuffle => self.manager.shuffle(),
            Command::Clear => {
                self.manager.clear();
                Ok(())
            }
            Command::Repeat => {
                self.manager.toggle_repeat();
                Ok(())
            }
            Command::Seek(position) => self.manager.seek(position),
            Command::Volume(level) => {
                self.manager.set_volume(level);
                Ok(())
            }
            Command::Mute => {
                self.manager.toggle_mute();
                Ok(())
            }
            Command::Search(query) => {
                let id = self.manager.search(query);
                writeln!(self.out, "searching ({id})")?;
                Ok(())
            }
            Command::Results => {
                self.print_results()?;
                Ok(())
            }
            Command::Pick(index) => self
                .manager
                .play_search_result(index)
                .map(|id| debug!(request = %id, "Picked search result")),
            Command::Enqueue(index) => self.manager.enqueue_search_result(index),
            Command::Fetch(query) => {
                let id = self.manager.fetch_and_play(query);
                writeln!(self.out, "fetching ({id})")?;
                Ok(())
            }
            Command::List => {
                self.print_list()?;
                Ok(())
            }
            Command::Save => {
                self.save()?;
                Ok(())
            }
            Command::Load => {
                self.load()?;
                Ok(())
            }
            Command::Status => {
                self.print_status()?;
                Ok(())
            }
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                Ok(())
            }
            Command::Quit => return Ok(Flow::Quit),
        };

        if let Err(err) = outcome {
            self.report(&err)?;
        }
        Ok(Flow::Continue)
    }

    /// Print everything the manager emitted since the last call
    pub fn print_events(&mut self) -> Result<()> {
        for event in self.manager.drain_events() {
            if let Some(text) = describe(&event) {
                writeln!(self.out, "{text}")?;
            }
        }
        Ok(())
    }

    pub fn manager(&self) -> &PlaylistManager {
        &self.manager
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    // ===== Output =====

    fn report(&mut self, err: &PlaybackError) -> Result<()> {
        if err.is_warning() {
            warn!(error = %err, "Operation rejected");
            writeln!(self.out, "warning: {err}")?;
        } else {
            error!(error = %err, "Operation failed");
            writeln!(self.out, "error: {err}")?;
        }
        Ok(())
    }

    fn print_results(&mut self) -> Result<()> {
        let results = self.manager.search_results();
        if results.is_empty() {
            writeln!(self.out, "no search results")?;
        }
        for (n, candidate) in results.iter().enumerate() {
            writeln!(self.out, "{:>3}. {} [{}]", n + 1, candidate.title, candidate.id)?;
        }
        Ok(())
    }

    fn print_list(&mut self) -> Result<()> {
        let playlist = self.manager.playlist();
        if playlist.is_empty() {
            writeln!(self.out, "playlist is empty")?;
        }
        for (n, track) in playlist.tracks().iter().enumerate() {
            let marker = if playlist.current_index() == Some(n) { '>' } else { ' ' };
            writeln!(self.out, "{marker}{:>3}. {}", n + 1, track.display_name())?;
        }
        for candidate in self.manager.queue().iter() {
            writeln!(self.out, "  queued: {}", candidate.title)?;
        }
        Ok(())
    }

    fn print_status(&mut self) -> Result<()> {
        let controller = self.manager.controller();
        let name = controller
            .source()
            .map_or_else(|| "-".to_string(), LocalTrack::display_name);
        let muted = if controller.is_muted() { " (muted)" } else { "" };
        let track = match self.manager.current_index() {
            Some(index) => format!("{}/{}", index + 1, self.manager.playlist().len()),
            None => format!("-/{}", self.manager.playlist().len()),
        };

        writeln!(
            self.out,
            "{} {} [{} / {}] volume {}{} repeat {} track {} queue {} requests {}",
            status_name(controller.status()),
            name,
            clock(controller.display_position()),
            clock(controller.duration()),
            controller.volume(),
            muted,
            self.manager.get_repeat(),
            track,
            self.manager.queue().len(),
            self.manager.outstanding_requests(),
        )?;
        Ok(())
    }

    // ===== Playlist File =====

    fn save(&mut self) -> Result<()> {
        let path = &self.settings.playlist_file;
        let PlaylistSnapshot {
            tracks,
            search_results,
        } = self.manager.snapshot();
        let count = tracks.len();

        match PlaylistFile::new(tracks, search_results).save(path) {
            Ok(()) => {
                info!(path = %path.display(), tracks = count, "Playlist saved");
                writeln!(self.out, "saved {count} tracks to {}", path.display())?;
            }
            Err(err) => {
                error!(error = %err, "Saving playlist failed");
                writeln!(self.out, "error: {err}")?;
            }
        }
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        let path = self.settings.playlist_file.clone();
        match PlaylistFile::load(&path) {
            Ok(file) => {
                let count = file.tracks.len();
                self.manager.restore(PlaylistSnapshot {
                    tracks: file.tracks,
                    search_results: file.remote,
                });
                writeln!(self.out, "loaded {count} tracks from {}", path.display())?;
            }
            Err(StorageError::NotFound(path)) => {
                warn!(path = %path.display(), "No saved playlist");
                writeln!(self.out, "warning: no saved playlist at {}", path.display())?;
            }
            Err(err) => {
                error!(error = %err, "Loading playlist failed");
                writeln!(self.out, "error: {err}")?;
            }
        }
        Ok(())
    }
}

/// Console line for an event, if it is worth printing
///
/// Position updates are left to `status`.
pub fn describe(event: &PlayerEvent) -> Option<String> {
    let text = match event {
        PlayerEvent::StateChanged { status, label } => {
            format!("{} [{label}]", status_name(*status))
        }
        PlayerEvent::SourceChanged { path: Some(path) } => {
            format!("now playing: {}", LocalTrack::new(path.clone()).display_name())
        }
        PlayerEvent::SourceChanged { path: None } => "nothing loaded".to_string(),
        PlayerEvent::PositionUpdate { .. } => return None,
        PlayerEvent::VolumeChanged { level, is_muted } => {
            if *is_muted {
                format!("volume: {level} (muted)")
            } else {
                format!("volume: {level}")
            }
        }
        PlayerEvent::PlaylistChanged { length, current } => match current {
            Some(index) => format!("playlist: {length} tracks, at {}", index + 1),
            None => format!("playlist: {length} tracks"),
        },
        PlayerEvent::QueueChanged { length } => format!("queue: {length} pending"),
        PlayerEvent::SearchResultsChanged { count } => format!("search: {count} results"),
        PlayerEvent::DownloadProgress { request, percent } => {
            format!("download {request}: {percent}%")
        }
        PlayerEvent::RepeatChanged { mode } => format!("repeat: {mode}"),
        PlayerEvent::Warning { message } => format!("warning: {message}"),
    };
    Some(text)
}

fn status_name(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Playing => "playing",
        PlaybackStatus::Paused => "paused",
        PlaybackStatus::Stopped => "stopped",
    }
}

fn clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Lines typed on stdin
///
/// Read on a plain thread so a pending read never holds up runtime shutdown.
pub fn stdin_lines() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
