//! Error types for remote search and download work

use thiserror::Error;

/// Result type alias using `RemoteError`
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Failure reported by a search or download worker
///
/// Workers never panic or propagate past their task boundary; every failure
/// is converted into one of these and delivered as a completion.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Query resolution failed
    #[error("Search failed: {0}")]
    Search(String),

    /// Query resolved to zero candidates
    #[error("No results for query: {0}")]
    NoResults(String),

    /// Download or extraction failed
    #[error("Download failed: {0}")]
    Download(String),

    /// Downloader output could not be understood
    #[error("Failed to parse downloader output: {0}")]
    Parse(String),

    /// The request was cancelled before it finished
    #[error("Request cancelled")]
    Cancelled,

    /// IO error while spawning a tool or writing to the cache
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RemoteError {
    /// Create a search error
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Create a download error
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    /// Whether the failure happened while resolving a query rather than fetching a file
    pub fn is_search_failure(&self) -> bool {
        matches!(self, Self::Search(_) | Self::NoResults(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_failures_are_classified() {
        assert!(RemoteError::search("timeout").is_search_failure());
        assert!(RemoteError::NoResults("lofi".to_string()).is_search_failure());
        assert!(!RemoteError::download("403").is_search_failure());
        assert!(!RemoteError::Cancelled.is_search_failure());
    }

    #[test]
    fn messages_include_context() {
        let err = RemoteError::download("HTTP 403");
        assert_eq!(err.to_string(), "Download failed: HTTP 403");
    }
}
