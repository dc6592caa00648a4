//! Playlist manager - core orchestration
//!
//! Owns the playlist, the download queue, search results and the playback
//! controller. Every mutation funnels through an operation on this type;
//! background workers only ever reach it through [`PlaylistManager::apply_completion`].

use crate::{
    controller::{ControllerSignal, PlaybackController},
    engine::MediaEngine,
    error::{PlaybackError, Result},
    events::{EngineNotice, PlayerEvent},
    playlist::Playlist,
    queue::DownloadQueue,
    requests::{RequestPurpose, RequestRegistry},
    types::{NoSourceFallback, PlayOutcome, PlaybackConfig, PlaybackStatus, PlaylistSnapshot},
};
use cadence_core::{
    DownloadDispatcher, LocalTrack, RemoteCandidate, RemoteCompletion, RemoteError,
    RemoteRequest, RepeatMode, RequestId,
};
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Single owner of playlist and playback state
pub struct PlaylistManager {
    controller: PlaybackController,
    dispatcher: Box<dyn DownloadDispatcher>,

    // Playlist state
    playlist: Playlist,
    queue: DownloadQueue,
    search_results: Vec<RemoteCandidate>,

    // Outstanding remote work
    requests: RequestRegistry,

    // Policy
    repeat: RepeatMode,
    fallback: NoSourceFallback,

    pending_events: Vec<PlayerEvent>,
}

impl PlaylistManager {
    /// Create a manager driving `engine` and handing remote work to `dispatcher`
    pub fn new(
        engine: Box<dyn MediaEngine>,
        dispatcher: Box<dyn DownloadDispatcher>,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            controller: PlaybackController::new(engine, config.volume),
            dispatcher,
            playlist: Playlist::new(),
            queue: DownloadQueue::new(),
            search_results: Vec::new(),
            requests: RequestRegistry::new(),
            repeat: config.repeat,
            fallback: config.fallback,
            pending_events: Vec::new(),
        }
    }

    // ===== Playlist Editing =====

    /// Append local files
    ///
    /// If nothing is selected yet, the first new entry is loaded and played.
    pub fn add_local<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let first_new = self
            .playlist
            .extend(paths.into_iter().map(LocalTrack::new));
        self.emit_playlist();

        match first_new {
            Some(index) if self.playlist.current_index().is_none() => {
                self.requests.supersede_play();
                self.start_at(index)
            }
            _ => Ok(()),
        }
    }

    /// Empty the playlist and download queue and unload the source
    ///
    /// Outstanding remote requests are forgotten and cancelled. Calling this
    /// on an already empty manager is a no-op apart from events.
    pub fn clear(&mut self) {
        let cancelled = self.requests.clear();
        if !cancelled.is_empty() {
            info!(count = cancelled.len(), "Cancelling outstanding requests");
        }
        for id in cancelled {
            self.dispatcher.cancel(id);
        }

        self.playlist.clear();
        self.queue.clear();
        self.controller.unload();
        self.emit_playlist();
        self.emit_queue();
    }

    /// Add a remote candidate to the back of the download queue
    pub fn enqueue_remote(&mut self, candidate: RemoteCandidate) {
        debug!(id = %candidate.id, title = %candidate.title, "Queued remote track");
        self.queue.enqueue(candidate);
        self.emit_queue();
    }

    /// Queue the search result at `index`
    pub fn enqueue_search_result(&mut self, index: usize) -> Result<()> {
        let candidate = self
            .search_results
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.enqueue_remote(candidate);
        Ok(())
    }

    // ===== Navigation =====

    /// Advance to the next entry (wraps) and play it
    pub fn next(&mut self) -> Result<()> {
        let index = self.playlist.advance().ok_or_else(empty_playlist)?;
        self.requests.supersede_play();
        self.start_at(index)
    }

    /// Go back to the previous entry (wraps) and play it
    pub fn previous(&mut self) -> Result<()> {
        let index = self.playlist.retreat().ok_or_else(empty_playlist)?;
        self.requests.supersede_play();
        self.start_at(index)
    }

    /// Play a specific playlist entry
    pub fn play_at(&mut self, index: usize) -> Result<()> {
        if index >= self.playlist.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        self.requests.supersede_play();
        self.start_at(index)
    }

    /// Randomly reorder the playlist and play the new first entry
    pub fn shuffle(&mut self) -> Result<()> {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// Shuffle with a caller-provided random source
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(empty_playlist());
        }
        self.requests.supersede_play();
        self.playlist.shuffle(rng);
        info!(length = self.playlist.len(), "Shuffled playlist");
        self.start_at(0)
    }

    // ===== Transport =====

    /// Start or resume playback
    ///
    /// With nothing loaded, the current (or first) playlist entry is played.
    /// Only an empty playlist falls through to the configured fallback.
    pub fn play(&mut self) -> Result<()> {
        if self.controller.source().is_none() && !self.playlist.is_empty() {
            let index = self.playlist.current_index().unwrap_or(0);
            return self.start_at(index);
        }

        match self.controller.play() {
            PlayOutcome::Playing | PlayOutcome::Paused => Ok(()),
            PlayOutcome::NothingLoaded => self.run_fallback(),
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.controller.pause();
    }

    /// Pause if playing, otherwise play
    ///
    /// With nothing loaded this behaves exactly like [`play`](Self::play).
    pub fn toggle(&mut self) -> Result<()> {
        if self.controller.source().is_none() {
            return self.play();
        }

        match self.controller.toggle() {
            PlayOutcome::Playing | PlayOutcome::Paused => Ok(()),
            PlayOutcome::NothingLoaded => self.run_fallback(),
        }
    }

    /// Seek within the current source
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        self.controller.seek(position)
    }

    /// Slider grabbed
    pub fn begin_seek(&mut self) {
        self.controller.begin_seek();
    }

    /// Slider moved
    pub fn update_seek(&mut self, position: Duration) {
        self.controller.update_seek(position);
    }

    /// Slider released
    pub fn end_seek(&mut self) -> Result<()> {
        self.controller.end_seek()
    }

    // ===== Volume =====

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.controller.set_volume(level);
    }

    /// Get current volume (0-100)
    pub fn get_volume(&self) -> u8 {
        self.controller.volume()
    }

    /// Mute audio
    pub fn mute(&mut self) {
        self.controller.mute();
    }

    /// Unmute audio
    pub fn unmute(&mut self) {
        self.controller.unmute();
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.controller.toggle_mute();
    }

    // ===== Repeat =====

    /// Cycle Off -> All -> One -> Off
    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.set_repeat(self.repeat.next());
        self.repeat
    }

    /// Set repeat mode
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
        self.pending_events.push(PlayerEvent::RepeatChanged { mode });
    }

    /// Get repeat mode
    pub fn get_repeat(&self) -> RepeatMode {
        self.repeat
    }

    // ===== Remote =====

    /// Search for candidates; results replace the current ones on completion
    pub fn search(&mut self, query: impl Into<String>) -> RequestId {
        let query = query.into();
        let id = self.requests.begin(RequestPurpose::Search);
        info!(request = %id, query = %query, "Dispatching search");
        self.dispatcher.dispatch(RemoteRequest::Search { id, query });
        id
    }

    /// Download the search result at `index` and play it when it lands
    ///
    /// Only the most recent play request may change the current entry; an
    /// older download that finishes later is dropped.
    pub fn play_search_result(&mut self, index: usize) -> Result<RequestId> {
        let candidate = self
            .search_results
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;

        let id = self.requests.begin(RequestPurpose::PlaySearchResult);
        info!(request = %id, id = %candidate.id, title = %candidate.title, "Dispatching download");
        self.dispatcher
            .dispatch(RemoteRequest::Download { id, candidate });
        Ok(id)
    }

    /// Search, download the first hit and play it
    pub fn fetch_and_play(&mut self, query: impl Into<String>) -> RequestId {
        let query = query.into();
        let id = self.requests.begin(RequestPurpose::Fallback);
        info!(request = %id, query = %query, "Fetching something to play");
        self.dispatcher
            .dispatch(RemoteRequest::FetchFirst { id, query });
        id
    }

    /// Drop the current search results
    pub fn clear_search_results(&mut self) {
        self.search_results.clear();
        self.emit_search_results();
    }

    /// Apply a result delivered by a background worker
    ///
    /// Completions for requests that are no longer outstanding (for example
    /// after `clear()`) are ignored. Failures become `Warning` events and
    /// never touch playlist or playback state.
    pub fn apply_completion(&mut self, completion: RemoteCompletion) -> Result<()> {
        let id = completion.id();
        let Some(purpose) = self.requests.purpose(id) else {
            debug!(request = %id, "Ignoring completion for unknown request");
            return Ok(());
        };

        match completion {
            RemoteCompletion::DownloadProgress { id, percent } => {
                self.pending_events.push(PlayerEvent::DownloadProgress {
                    request: id,
                    percent: percent.min(100),
                });
                Ok(())
            }
            RemoteCompletion::SearchCompleted { id, results } => {
                let latest = self.requests.is_latest_search(id);
                self.requests.finish(id);
                if latest {
                    info!(request = %id, count = results.len(), "Search completed");
                    self.search_results = results;
                    self.emit_search_results();
                } else {
                    debug!(request = %id, "Discarding superseded search results");
                }
                Ok(())
            }
            RemoteCompletion::DownloadCompleted {
                id,
                candidate,
                track,
            } => {
                let latest = self.requests.is_latest_play(id);
                self.requests.finish(id);
                self.merge_download(id, purpose, latest, candidate, track)
            }
            RemoteCompletion::Failed { id, error } => {
                let latest = self.requests.is_latest_play(id);
                self.requests.finish(id);
                self.report_failure(id, purpose, latest, error)
            }
        }
    }

    /// Apply an engine notification
    ///
    /// End-of-media is turned into [`on_track_end`](Self::on_track_end);
    /// engine failures are returned as `PlaybackError::Engine`. Notices
    /// stamped for a load that has since been replaced change nothing.
    pub fn handle_engine_event(&mut self, notice: EngineNotice) -> Result<()> {
        match self.controller.handle_engine_event(notice) {
            None => Ok(()),
            Some(ControllerSignal::EndOfMedia) => self.on_track_end(),
            Some(ControllerSignal::Failed(err)) => Err(err),
        }
    }

    /// Decide what follows the track that just ended
    ///
    /// A queued remote track always wins: it is downloaded and played once it
    /// lands. With an empty queue the repeat mode decides.
    pub fn on_track_end(&mut self) -> Result<()> {
        if let Some(candidate) = self.queue.pop_next() {
            self.emit_queue();
            let id = self.requests.begin(RequestPurpose::QueueAdvance);
            info!(request = %id, id = %candidate.id, "Advancing to queued track");
            self.dispatcher
                .dispatch(RemoteRequest::Download { id, candidate });
            return Ok(());
        }

        match self.repeat {
            RepeatMode::Off => {
                debug!("Track ended with empty queue; staying stopped");
                Ok(())
            }
            RepeatMode::All => match self.playlist.advance() {
                Some(index) => self.start_at(index),
                None => Ok(()),
            },
            RepeatMode::One => match self.playlist.current_index() {
                Some(index) => self.start_at(index),
                None => Ok(()),
            },
        }
    }

    // ===== Session =====

    /// Everything a session file persists
    pub fn snapshot(&self) -> PlaylistSnapshot {
        PlaylistSnapshot {
            tracks: self.playlist.tracks().to_vec(),
            search_results: self.search_results.clone(),
        }
    }

    /// Replace playlist and search results wholesale
    ///
    /// The source is unloaded and nothing is selected; the download queue is
    /// left as it was.
    pub fn restore(&mut self, snapshot: PlaylistSnapshot) {
        self.requests.supersede_play();
        self.controller.unload();
        self.playlist.replace(snapshot.tracks);
        self.search_results = snapshot.search_results;
        info!(
            tracks = self.playlist.len(),
            results = self.search_results.len(),
            "Restored playlist"
        );
        self.emit_playlist();
        self.emit_search_results();
    }

    // ===== State Queries =====

    /// The playback controller
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Transport status
    pub fn status(&self) -> PlaybackStatus {
        self.controller.status()
    }

    /// The playlist
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Index of the current playlist entry
    pub fn current_index(&self) -> Option<usize> {
        self.playlist.current_index()
    }

    /// Pending remote downloads
    pub fn queue(&self) -> &DownloadQueue {
        &self.queue
    }

    /// Results of the latest search
    pub fn search_results(&self) -> &[RemoteCandidate] {
        &self.search_results
    }

    /// Number of requests still in flight
    pub fn outstanding_requests(&self) -> usize {
        self.requests.len()
    }

    // ===== Events =====

    /// Drain all pending events, controller events first
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        let mut events = self.controller.drain_events();
        events.append(&mut self.pending_events);
        events
    }

    // ===== Internals =====

    fn start_at(&mut self, index: usize) -> Result<()> {
        let track = self
            .playlist
            .select(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.emit_playlist();

        debug!(index, track = %track, "Starting playlist entry");
        self.controller.load(track)?;
        self.controller.play();
        Ok(())
    }

    fn run_fallback(&mut self) -> Result<()> {
        match &self.fallback {
            NoSourceFallback::Ignore => Err(empty_playlist()),
            NoSourceFallback::FetchAndPlay { query } => {
                let query = query.clone();
                self.fetch_and_play(query);
                Ok(())
            }
        }
    }

    fn merge_download(
        &mut self,
        id: RequestId,
        purpose: RequestPurpose,
        latest: bool,
        candidate: RemoteCandidate,
        track: LocalTrack,
    ) -> Result<()> {
        if latest {
            info!(request = %id, title = %candidate.title, track = %track, "Download ready; playing");
            let index = self.playlist.push(track);
            return self.start_at(index);
        }

        if purpose == RequestPurpose::QueueAdvance {
            // Queued tracks belong in the playlist even when the user moved on
            debug!(request = %id, track = %track, "Appending queued download without playing");
            self.playlist.push(track);
            self.emit_playlist();
        } else {
            debug!(request = %id, title = %candidate.title, "Discarding superseded download");
        }
        Ok(())
    }

    fn report_failure(
        &mut self,
        id: RequestId,
        purpose: RequestPurpose,
        latest: bool,
        error: RemoteError,
    ) -> Result<()> {
        if matches!(error, RemoteError::Cancelled) {
            debug!(request = %id, "Request cancelled");
            return Ok(());
        }

        let err = PlaybackError::from(error);
        warn!(request = %id, purpose = ?purpose, error = %err, "Remote request failed");
        self.pending_events.push(PlayerEvent::Warning {
            message: err.to_string(),
        });

        // Skip a queued track that could not be fetched
        if purpose == RequestPurpose::QueueAdvance && latest {
            return self.on_track_end();
        }
        Ok(())
    }

    fn emit_playlist(&mut self) {
        self.pending_events.push(PlayerEvent::PlaylistChanged {
            length: self.playlist.len(),
            current: self.playlist.current_index(),
        });
    }

    fn emit_queue(&mut self) {
        self.pending_events.push(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn emit_search_results(&mut self) {
        self.pending_events.push(PlayerEvent::SearchResultsChanged {
            count: self.search_results.len(),
        });
    }
}

fn empty_playlist() -> PlaybackError {
    warn!("Navigation requested on empty playlist");
    PlaybackError::EmptyPlaylist
}
