//! Core traits for Cadence
//!
//! Traits define the seam between the single-owner playback state and the
//! background machinery that resolves remote tracks.

use crate::types::{RemoteRequest, RequestId};

/// Hands remote work to background tasks
///
/// Implementations must return immediately: the caller owns all playlist
/// state and must never block on network or disk I/O. Results come back as
/// [`RemoteCompletion`](crate::RemoteCompletion) values that the owner applies
/// on its own schedule.
pub trait DownloadDispatcher: Send {
    /// Start work for a request
    fn dispatch(&mut self, request: RemoteRequest);

    /// Signal an outstanding request to stop
    ///
    /// Cancelling an unknown or already-finished request is a no-op.
    fn cancel(&mut self, id: RequestId);
}
