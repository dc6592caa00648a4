//! FIFO download queue
//!
//! Remote candidates wait here until the current track ends; each one is
//! downloaded and appended to the playlist only when it is its turn.

use cadence_core::RemoteCandidate;
use std::collections::VecDeque;

/// Pending remote candidates in insertion order
#[derive(Debug, Clone, Default)]
pub struct DownloadQueue {
    pending: VecDeque<RemoteCandidate>,
}

impl DownloadQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate at the back
    pub fn enqueue(&mut self, candidate: RemoteCandidate) {
        self.pending.push_back(candidate);
    }

    /// Take the oldest candidate
    pub fn pop_next(&mut self) -> Option<RemoteCandidate> {
        self.pending.pop_front()
    }

    /// Look at the oldest candidate without removing it
    pub fn peek(&self) -> Option<&RemoteCandidate> {
        self.pending.front()
    }

    /// Drop every pending candidate
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pending candidates, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &RemoteCandidate> {
        self.pending.iter()
    }

    /// Number of pending candidates
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
