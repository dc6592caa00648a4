//! Bookkeeping for outstanding remote requests
//!
//! Every request the manager dispatches is recorded here with the reason it
//! was made. Completions are checked against this table so that results which
//! were overtaken by newer user intent never change what is playing.

use cadence_core::{RequestId, RequestIdGenerator};
use std::collections::HashMap;

/// Why a request was dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPurpose {
    /// Populate search results
    Search,

    /// User picked a search result to play now
    PlaySearchResult,

    /// Head of the download queue, started because the current track ended
    QueueAdvance,

    /// `play()` with nothing loaded
    Fallback,
}

impl RequestPurpose {
    /// Whether a successful completion should start playback
    pub fn wants_playback(self) -> bool {
        !matches!(self, Self::Search)
    }
}

/// Table of outstanding requests
#[derive(Debug, Default)]
pub struct RequestRegistry {
    ids: RequestIdGenerator,
    outstanding: HashMap<RequestId, RequestPurpose>,

    // Newest request allowed to take over playback
    latest_play: Option<RequestId>,

    // Newest search; older results are ignored
    latest_search: Option<RequestId>,
}

impl RequestRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id and record why it exists
    pub fn begin(&mut self, purpose: RequestPurpose) -> RequestId {
        let id = self.ids.next_id();
        self.outstanding.insert(id, purpose);

        if purpose.wants_playback() {
            self.latest_play = Some(id);
        } else {
            self.latest_search = Some(id);
        }
        id
    }

    /// Purpose of an outstanding request
    pub fn purpose(&self, id: RequestId) -> Option<RequestPurpose> {
        self.outstanding.get(&id).copied()
    }

    /// Forget a request that reached a terminal completion
    pub fn finish(&mut self, id: RequestId) -> Option<RequestPurpose> {
        let purpose = self.outstanding.remove(&id);
        if self.latest_play == Some(id) {
            self.latest_play = None;
        }
        if self.latest_search == Some(id) {
            self.latest_search = None;
        }
        purpose
    }

    /// Whether `id` is still the newest play intent
    pub fn is_latest_play(&self, id: RequestId) -> bool {
        self.latest_play == Some(id)
    }

    /// Whether `id` is the newest search
    pub fn is_latest_search(&self, id: RequestId) -> bool {
        self.latest_search == Some(id)
    }

    /// User navigated explicitly; no in-flight request may take over playback
    ///
    /// Requests stay outstanding; their completions are still recognised but
    /// can no longer take over playback.
    pub fn supersede_play(&mut self) {
        self.latest_play = None;
    }

    /// Number of requests in flight
    pub fn len(&self) -> usize {
        self.outstanding.len()
    }

    /// Whether nothing is in flight
    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Forget everything, returning the ids that should be cancelled
    ///
    /// The id counter keeps counting so later completions for the returned
    /// ids can never collide with new requests.
    pub fn clear(&mut self) -> Vec<RequestId> {
        self.latest_play = None;
        self.latest_search = None;
        let mut ids: Vec<_> = self.outstanding.drain().map(|(id, _)| id).collect();
        ids.sort();
        ids
    }
}
