#![forbid(unsafe_code)]

//! Host-advanced monotonic time.

use core::time::Duration;

/// Deterministic monotonic clock controlled by the host.
///
/// Never reads the system clock; tests and headless drivers advance it
/// explicitly and feed the readings in as frame timestamps.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Create a clock starting at `now`.
    #[must_use]
    pub const fn starting_at(now: Duration) -> Self {
        Self { now }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        self.now = self.now.saturating_add(dt);
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(10));
        assert_eq!(clock.advance(Duration::from_millis(6)), Duration::from_millis(16));
    }

    #[test]
    fn set_overrides() {
        let mut clock = DeterministicClock::starting_at(Duration::from_secs(1));
        clock.set(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(5));
    }
}
