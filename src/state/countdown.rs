//! Local countdown derived from the authoritative start time and duration.
//!
//! The countdown is advisory: it drives the remaining-time display and the
//! local end-of-contest trigger, but never flips the contest's liveness —
//! the server independently ends the contest around the same wall-clock
//! time.

use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::{Interval, MissedTickBehavior, interval};

use crate::dto::contest::MINUTE_MS;

/// Fixed refresh interval for the remaining-time display.
pub const TICK: Duration = Duration::from_secs(1);

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> u64 {
    let now = OffsetDateTime::now_utc();
    (now.unix_timestamp_nanos() / 1_000_000).max(0) as u64
}

/// Countdown clock for one contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    end_ms: u64,
}

impl Countdown {
    /// Build from the server's start instant (epoch millis) and the contest
    /// duration in minutes.
    pub fn new(start_time_ms: u64, duration_minutes: u64) -> Self {
        Countdown {
            end_ms: start_time_ms + duration_minutes * MINUTE_MS,
        }
    }

    /// Contest end instant, epoch milliseconds.
    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    /// Remaining time at `now_ms`, clamped to zero.
    pub fn remaining_at(&self, now_ms: u64) -> Duration {
        Duration::from_millis(self.end_ms.saturating_sub(now_ms))
    }

    /// Remaining time against the wall clock.
    pub fn remaining(&self) -> Duration {
        self.remaining_at(now_ms())
    }

    /// Whether the contest is over at `now_ms`, by this clock.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.end_ms
    }

    /// One-second ticker for refreshing the display; ticks immediately.
    pub fn ticker(&self) -> Interval {
        let mut ticker = interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }
}

/// Format a remaining duration as `m:ss`, seconds floored.
pub fn format_remaining(remaining: Duration) -> String {
    let total_seconds = remaining.as_secs();
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_counts_down_to_exactly_zero() {
        let start = 1_714_000_000_000_u64;
        let countdown = Countdown::new(start, 10);
        let end = start + 10 * MINUTE_MS;

        // k milliseconds before the end, k milliseconds remain.
        for k in [1_u64, 999, 1_000, 30_000, 10 * MINUTE_MS] {
            assert_eq!(countdown.remaining_at(end - k), Duration::from_millis(k));
        }

        assert_eq!(countdown.remaining_at(end), Duration::ZERO);
        assert!(countdown.is_expired_at(end));
        assert!(!countdown.is_expired_at(end - 1));
    }

    #[test]
    fn remaining_clamps_after_the_end() {
        let countdown = Countdown::new(0, 1);
        assert_eq!(countdown.remaining_at(MINUTE_MS + 5_000), Duration::ZERO);
    }

    #[test]
    fn format_floors_to_the_second() {
        assert_eq!(format_remaining(Duration::from_millis(95_900)), "1:35");
        assert_eq!(format_remaining(Duration::from_millis(5_001)), "0:05");
        assert_eq!(format_remaining(Duration::ZERO), "0:00");
        assert_eq!(format_remaining(Duration::from_secs(600)), "10:00");
    }
}
