//! Messages exchanged between the playlist owner and background workers

use crate::error::RemoteError;
use crate::types::{LocalTrack, RemoteCandidate, RequestId};

/// Work handed to a background task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    /// Resolve a query into candidates
    Search {
        /// Request identifier
        id: RequestId,
        /// Free-form query text
        query: String,
    },

    /// Download one candidate into the cache
    Download {
        /// Request identifier
        id: RequestId,
        /// Candidate to fetch
        candidate: RemoteCandidate,
    },

    /// Search, then download the first hit
    ///
    /// Backs the "nothing loaded, fetch something" fallback.
    FetchFirst {
        /// Request identifier
        id: RequestId,
        /// Free-form query text
        query: String,
    },
}

impl RemoteRequest {
    /// Identifier of this request
    pub fn id(&self) -> RequestId {
        match self {
            Self::Search { id, .. } | Self::Download { id, .. } | Self::FetchFirst { id, .. } => {
                *id
            }
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search",
            Self::Download { .. } => "download",
            Self::FetchFirst { .. } => "fetch_first",
        }
    }
}

/// Result of background work, delivered back to the owner
#[derive(Debug)]
pub enum RemoteCompletion {
    /// A search finished
    SearchCompleted {
        /// Originating request
        id: RequestId,
        /// Candidates in ranking order
        results: Vec<RemoteCandidate>,
    },

    /// Download progress (0-100)
    DownloadProgress {
        /// Originating request
        id: RequestId,
        /// Percentage complete
        percent: u8,
    },

    /// A download finished and the file is on disk
    DownloadCompleted {
        /// Originating request
        id: RequestId,
        /// The candidate that was fetched
        candidate: RemoteCandidate,
        /// Where it landed
        track: LocalTrack,
    },

    /// The request failed or was cancelled
    Failed {
        /// Originating request
        id: RequestId,
        /// What went wrong
        error: RemoteError,
    },
}

impl RemoteCompletion {
    /// Identifier of the originating request
    pub fn id(&self) -> RequestId {
        match self {
            Self::SearchCompleted { id, .. }
            | Self::DownloadProgress { id, .. }
            | Self::DownloadCompleted { id, .. }
            | Self::Failed { id, .. } => *id,
        }
    }

    /// Whether this completion ends the request (progress does not)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::DownloadProgress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_not_terminal() {
        let id = RequestId::new(3);
        assert!(!RemoteCompletion::DownloadProgress { id, percent: 40 }.is_terminal());
        assert!(RemoteCompletion::Failed {
            id,
            error: RemoteError::Cancelled
        }
        .is_terminal());
    }

    #[test]
    fn request_reports_its_id() {
        let request = RemoteRequest::FetchFirst {
            id: RequestId::new(9),
            query: "ambient".to_string(),
        };
        assert_eq!(request.id(), RequestId::new(9));
        assert_eq!(request.kind(), "fetch_first");
    }
}
