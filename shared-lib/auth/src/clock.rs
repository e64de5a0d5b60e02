//! Time source for issuing and expiring tokens.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freeze at a Unix timestamp in milliseconds.
    ///
    /// Returns `None` when the timestamp is outside chrono's supported range.
    pub fn from_millis(ms: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(ms).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_from_millis() {
        let clock = FixedClock::from_millis(1_700_000_000_123).unwrap();
        assert_eq!(clock.now().timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_fixed_clock_out_of_range() {
        assert!(FixedClock::from_millis(i64::MAX).is_none());
        assert!(FixedClock::from_millis(i64::MIN).is_none());
    }
}
