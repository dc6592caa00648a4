//! Shared fakes for playback integration tests

#![allow(dead_code)]

use cadence_core::{DownloadDispatcher, RemoteRequest, RequestId};
use cadence_playback::{
    EngineEvent, EngineNotice, LoadId, MediaEngine, PlaybackConfig, PlaybackError,
    PlaylistManager, Result,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Commands the fake engine received, in order
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Open(PathBuf),
    Play,
    Pause,
    Stop,
    SetPosition(Duration),
    SetVolume(u8),
}

/// Engine that records every call and can be told to reject paths
#[derive(Clone, Default)]
pub struct FakeEngine {
    pub calls: Arc<Mutex<Vec<EngineCall>>>,
    pub unreadable: Arc<Mutex<Vec<PathBuf>>>,
    pub seekable: Arc<Mutex<bool>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        let engine = Self::default();
        *engine.seekable.lock().unwrap() = true;
        engine
    }

    pub fn reject(&self, path: impl Into<PathBuf>) {
        self.unreadable.lock().unwrap().push(path.into());
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Open(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn last_opened(&self) -> Option<PathBuf> {
        self.opened().pop()
    }
}

impl MediaEngine for FakeEngine {
    fn open(&mut self, path: &Path, _load: LoadId) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(EngineCall::Open(path.to_path_buf()));
        if self.unreadable.lock().unwrap().iter().any(|p| p == path) {
            return Err(PlaybackError::media_open(path, "unsupported format"));
        }
        Ok(())
    }

    fn play(&mut self) {
        self.calls.lock().unwrap().push(EngineCall::Play);
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(EngineCall::Pause);
    }

    fn stop(&mut self) {
        self.calls.lock().unwrap().push(EngineCall::Stop);
    }

    fn set_position(&mut self, position: Duration) {
        self.calls
            .lock()
            .unwrap()
            .push(EngineCall::SetPosition(position));
    }

    fn set_volume(&mut self, volume: u8) {
        self.calls
            .lock()
            .unwrap()
            .push(EngineCall::SetVolume(volume));
    }

    fn is_seekable(&self) -> bool {
        *self.seekable.lock().unwrap()
    }
}

/// Dispatcher that records requests and cancellations
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    pub dispatched: Arc<Mutex<Vec<RemoteRequest>>>,
    pub cancelled: Arc<Mutex<Vec<RequestId>>>,
}

impl RecordingDispatcher {
    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<RemoteRequest> {
        self.requests().pop()
    }

    pub fn cancelled(&self) -> Vec<RequestId> {
        self.cancelled.lock().unwrap().clone()
    }
}

impl DownloadDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, request: RemoteRequest) {
        self.dispatched.lock().unwrap().push(request);
    }

    fn cancel(&mut self, id: RequestId) {
        self.cancelled.lock().unwrap().push(id);
    }
}

/// Manager wired to fakes, plus handles to inspect them
pub struct Harness {
    pub manager: PlaylistManager,
    pub engine: FakeEngine,
    pub dispatcher: RecordingDispatcher,
}

impl Harness {
    /// Feed the manager an engine event stamped for the current load
    pub fn engine_event(&mut self, event: EngineEvent) -> Result<()> {
        let load = self
            .manager
            .controller()
            .current_load()
            .expect("a source is loaded");
        self.manager
            .handle_engine_event(EngineNotice::new(load, event))
    }
}

pub fn harness() -> Harness {
    harness_with(PlaybackConfig::default())
}

pub fn harness_with(config: PlaybackConfig) -> Harness {
    let engine = FakeEngine::new();
    let dispatcher = RecordingDispatcher::default();
    let manager = PlaylistManager::new(
        Box::new(engine.clone()),
        Box::new(dispatcher.clone()),
        config,
    );
    Harness {
        manager,
        engine,
        dispatcher,
    }
}
