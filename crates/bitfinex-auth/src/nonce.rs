//! Monotonic nonce generation for authenticated requests
//!
//! Bitfinex rejects any authenticated request whose nonce is not strictly
//! greater than the last one seen for the credential set, so every nonce
//! drawn from one source must be strictly increasing.

use std::time::{SystemTime, UNIX_EPOCH};

/// Process-local source of strictly increasing nonces
///
/// Each call to [`next`](Self::next) returns a value strictly greater than
/// the previous one and at least the current Unix time in seconds: repeated
/// calls within the same second increment, while a source left idle long
/// enough jumps forward to the wall clock.
///
/// A `NonceSource` is not safe for concurrent use by multiple threads
/// sharing one instance. Callers must serialize access (the trading client
/// holds its source behind a mutex) or give each execution context its own
/// instance.
#[derive(Debug, Default)]
pub struct NonceSource {
    last: u64,
}

impl NonceSource {
    /// Create a source that has issued no nonces yet
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Draw the next nonce
    pub fn next(&mut self) -> u64 {
        self.advance(unix_seconds())
    }

    /// Advance against an externally supplied clock reading
    ///
    /// Invariant: the returned value is `max(now, last + 1)` once a nonce
    /// has been issued, and `max(now, 0)` before that.
    fn advance(&mut self, now: u64) -> u64 {
        let candidate = if self.last == 0 { 0 } else { self.last + 1 };
        self.last = now.max(candidate);
        self.last
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strictly_increasing_within_one_second() {
        let mut source = NonceSource::new();
        assert_eq!(source.advance(1_000), 1_000);
        assert_eq!(source.advance(1_000), 1_001);
        assert_eq!(source.advance(1_000), 1_002);
    }

    #[test]
    fn test_jumps_to_wall_clock_after_idle() {
        let mut source = NonceSource::new();
        assert_eq!(source.advance(1_000), 1_000);
        assert_eq!(source.advance(1_000), 1_001);
        // Clock moved past the counter while the source sat idle.
        assert_eq!(source.advance(2_000), 2_000);
        assert_eq!(source.advance(2_000), 2_001);
    }

    #[test]
    fn test_first_nonce_is_wall_clock() {
        let mut source = NonceSource::new();
        assert_eq!(source.advance(1_444_272_165), 1_444_272_165);
    }

    #[test]
    fn test_next_tracks_real_time() {
        let mut source = NonceSource::new();
        let now = unix_seconds();
        let first = source.next();
        let second = source.next();
        assert!(first >= now);
        assert!(second > first);
    }
}
