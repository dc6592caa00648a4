//! ID types for remote requests

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier stamped on every search or download request
///
/// Ids are strictly increasing within one generator, so "most recent"
/// is a plain numeric comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Create a request ID from a raw value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Mints monotonically increasing request ids
#[derive(Debug, Default)]
pub struct RequestIdGenerator {
    last: u64,
}

impl RequestIdGenerator {
    /// Create a generator whose first id is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next id
    pub fn next_id(&mut self) -> RequestId {
        self.last += 1;
        RequestId(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut generator = RequestIdGenerator::new();
        let first = generator.next_id();
        let second = generator.next_id();
        let third = generator.next_id();

        assert!(first < second);
        assert!(second < third);
        assert_eq!(first.get(), 1);
    }

    #[test]
    fn display_is_prefixed() {
        assert_eq!(RequestId::new(42).to_string(), "req-42");
    }
}
