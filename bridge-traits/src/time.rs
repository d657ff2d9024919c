//! Time Abstraction
//!
//! Injectable time source so message timestamps are deterministic in tests.

use std::time::{SystemTime, UNIX_EPOCH};

/// Time source trait
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds
    fn now_millis(&self) -> u64;

    /// Current Unix timestamp in seconds
    fn now_secs(&self) -> u64 {
        self.now_millis() / 1000
    }
}

/// System clock implementation using actual system time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock;
        let millis = clock.now_millis();

        assert!(millis > 0);
        assert_eq!(clock.now_secs(), millis / 1000);
    }
}
