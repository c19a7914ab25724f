//! Self-imposed outage window simulating crash-recovery.

use std::time::Duration;

use crate::clock::Clock;

/// Outage flag plus the time it was raised.
///
/// There is no recovery timer: the flag clears lazily on the first
/// probe after the window has elapsed.
#[derive(Debug, Default)]
pub struct Availability {
    down: bool,
    down_since_ms: u64,
}

impl Availability {
    /// Raise the outage flag and stamp the current time.
    pub fn mark_down(&mut self, clock: &impl Clock) {
        self.down = true;
        self.down_since_ms = clock.now_millis();
    }

    /// `true` while the outage window is active. Clears the flag and
    /// returns `false` once `outage` has elapsed since it was raised.
    pub fn is_down(&mut self, clock: &impl Clock, outage: Duration) -> bool {
        if !self.down {
            return false;
        }
        let elapsed = u128::from(clock.now_millis().saturating_sub(self.down_since_ms));
        if elapsed >= outage.as_millis() {
            self.down = false;
            return false;
        }
        true
    }
}
