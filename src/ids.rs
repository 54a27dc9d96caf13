//! Synthetic request identifiers.

use std::fmt;
use std::str::FromStr;

/// Id stamped on every synthetic request, so a verification can be
/// followed through the oracle's logs. ULIDs sort by creation time.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(ulid::Ulid);

impl RequestId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Milliseconds since the Unix epoch at which the id was minted.
    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ulid::Ulid::from_string(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_parse_back() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
        let parsed: RequestId = a.to_string().parse().unwrap();
        assert_eq!(parsed, a);
        assert!(a.timestamp_ms() > 0);
    }

    #[test]
    fn garbage_does_not_parse() {
        assert!("not-a-ulid".parse::<RequestId>().is_err());
    }
}
