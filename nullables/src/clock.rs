//! Nullable clock — time only moves when a test moves it.

use assize_types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};

const DAY_SECS: u64 = 86_400;

/// A deterministic clock, shareable across threads.
#[derive(Debug, Default)]
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }

    /// Advance by `secs` and return the new time.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let next = self.current.load(Ordering::SeqCst).saturating_add(secs);
        self.current.store(next, Ordering::SeqCst);
        Timestamp::new(next)
    }

    pub fn advance_days(&self, days: u64) -> Timestamp {
        self.advance(days * DAY_SECS)
    }

    /// Jump to the first instant after `deadline`.
    pub fn pass(&self, deadline: Timestamp) -> Timestamp {
        self.set(deadline.as_secs() + 1)
    }

    pub fn set(&self, secs: u64) -> Timestamp {
        self.current.store(secs, Ordering::SeqCst);
        Timestamp::new(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_on_request() {
        let clock = NullClock::new(100);
        assert_eq!(clock.now(), Timestamp::new(100));
        assert_eq!(clock.advance(5), Timestamp::new(105));
        assert_eq!(clock.pass(Timestamp::new(200)), Timestamp::new(201));
        assert_eq!(clock.advance_days(1).as_secs(), 201 + DAY_SECS);
    }
}
