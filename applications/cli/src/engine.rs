//! Headless media engine
//!
//! Probes track length with lofty and runs a clock instead of decoding, so
//! the player's transport and auto-advance behave as they would with real
//! output. Notifications go out on an unbounded channel, stamped with the
//! load they belong to, and the console loop feeds them back into the
//! playlist manager.

use cadence_playback::{EngineEvent, EngineNotice, LoadId, MediaEngine, PlaybackError, Result};
use lofty::{AudioFile, Probe};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

/// Clock settings for [`HeadlessEngine`]
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Interval between position updates
    pub tick: Duration,

    /// Use this length for every track instead of probing the file
    pub duration_override: Option<Duration>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            duration_override: None,
        }
    }
}

#[derive(Debug)]
struct Clock {
    load: LoadId,
    duration: Duration,
    position: Duration,
    playing: bool,
}

impl Clock {
    fn new(load: LoadId, duration: Duration) -> Self {
        Self {
            load,
            duration,
            position: Duration::ZERO,
            playing: false,
        }
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<EngineEvent> {
        if !self.playing {
            return Vec::new();
        }

        self.position = (self.position + elapsed).min(self.duration);
        let mut events = vec![EngineEvent::PositionChanged(self.position)];
        if self.position >= self.duration {
            self.playing = false;
            events.push(EngineEvent::EndOfMedia);
        }
        events
    }
}

type SharedClock = Arc<Mutex<Option<Clock>>>;

fn lock(clock: &SharedClock) -> MutexGuard<'_, Option<Clock>> {
    clock.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Media engine without audio output
pub struct HeadlessEngine {
    clock: SharedClock,
    events: UnboundedSender<EngineNotice>,
    duration_override: Option<Duration>,
    volume: u8,
    ticker: JoinHandle<()>,
}

impl HeadlessEngine {
    /// Create an engine reporting to `events`
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn new(events: UnboundedSender<EngineNotice>, settings: EngineSettings) -> Self {
        let clock: SharedClock = Arc::new(Mutex::new(None));
        let ticker = tokio::spawn(run_clock(
            Arc::clone(&clock),
            events.clone(),
            settings.tick,
        ));

        Self {
            clock,
            events,
            duration_override: settings.duration_override,
            volume: 100,
            ticker,
        }
    }

    /// Last volume set by the controller
    pub fn volume(&self) -> u8 {
        self.volume
    }

    fn probe(&self, path: &Path) -> Result<Duration> {
        if let Some(duration) = self.duration_override {
            if !path.is_file() {
                return Err(PlaybackError::media_open(path, "file not found"));
            }
            return Ok(duration);
        }

        let tagged_file = Probe::open(path)
            .map_err(|e| PlaybackError::media_open(path, e.to_string()))?
            .read()
            .map_err(|e| PlaybackError::media_open(path, e.to_string()))?;
        Ok(tagged_file.properties().duration())
    }

    fn send(&self, load: LoadId, event: EngineEvent) {
        if self.events.send(EngineNotice::new(load, event)).is_err() {
            trace!("Engine event receiver dropped");
        }
    }
}

impl MediaEngine for HeadlessEngine {
    fn open(&mut self, path: &Path, load: LoadId) -> Result<()> {
        // Whatever was open is gone even if the new file is unreadable
        *lock(&self.clock) = None;
        let duration = self.probe(path)?;
        debug!(
            path = %path.display(),
            %load,
            duration_ms = duration.as_millis() as u64,
            "Opened media"
        );
        *lock(&self.clock) = Some(Clock::new(load, duration));
        self.send(load, EngineEvent::DurationChanged(duration));
        Ok(())
    }

    fn play(&mut self) {
        if let Some(clock) = lock(&self.clock).as_mut() {
            if clock.position >= clock.duration {
                clock.position = Duration::ZERO;
            }
            clock.playing = true;
        }
    }

    fn pause(&mut self) {
        if let Some(clock) = lock(&self.clock).as_mut() {
            clock.playing = false;
        }
    }

    fn stop(&mut self) {
        *lock(&self.clock) = None;
    }

    fn set_position(&mut self, position: Duration) {
        if let Some(clock) = lock(&self.clock).as_mut() {
            clock.position = position.min(clock.duration);
        }
    }

    fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }

    fn is_seekable(&self) -> bool {
        lock(&self.clock).is_some()
    }
}

impl Drop for HeadlessEngine {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

async fn run_clock(clock: SharedClock, events: UnboundedSender<EngineNotice>, tick: Duration) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some((load, due)) = lock(&clock)
            .as_mut()
            .map(|clock| (clock.load, clock.advance(tick)))
        else {
            continue;
        };

        for event in due {
            if events.send(EngineNotice::new(load, event)).is_err() {
                return;
            }
        }
    }
}
