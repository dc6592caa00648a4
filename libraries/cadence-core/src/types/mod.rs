//! Domain types for Cadence

mod ids;
mod playback_state;
mod remote;
mod track;

pub use ids::{RequestId, RequestIdGenerator};
pub use playback_state::RepeatMode;
pub use remote::{RemoteCompletion, RemoteRequest};
pub use track::{LocalTrack, RemoteCandidate, TrackRef};
