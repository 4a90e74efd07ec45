use std::time::{Duration, Instant};

/// Input poll interval in milliseconds
pub const DEFAULT_POLL_MS: u64 = 100;

/// Countdown tick period in milliseconds
pub const TICK_PERIOD_MS: u64 = 1000;

/// Get the input poll duration
pub fn poll_duration() -> Duration {
    Duration::from_millis(DEFAULT_POLL_MS)
}

/// Get the countdown tick period
pub fn tick_period() -> Duration {
    Duration::from_millis(TICK_PERIOD_MS)
}

/// The single periodic tick source driving the countdown.
///
/// A disarmed ticker never reports a due tick, so cancelling it is
/// synchronous: nothing queued before `cancel` can fire afterwards.
#[derive(Debug, Clone, Default)]
pub struct Ticker {
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new() -> Self {
        Self { next_due: None }
    }

    /// Schedule the first tick one period after `now`
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + tick_period());
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Consume one elapsed tick, if any is due at `now`.
    ///
    /// Call repeatedly to catch up after a stall; each call yields at most one tick.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(due + tick_period());
                true
            }
            _ => false,
        }
    }

    /// Time until the next tick, used to bound the input poll
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(poll_duration(), Duration::from_millis(100));
        assert_eq!(tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn test_disarmed_ticker_never_fires() {
        let mut ticker = Ticker::new();
        let now = Instant::now();
        assert!(!ticker.take_due(now + Duration::from_secs(10)));
        assert_eq!(ticker.until_next(now), None);
    }

    #[test]
    fn test_ticks_once_per_elapsed_period() {
        let mut ticker = Ticker::new();
        let start = Instant::now();
        ticker.arm(start);

        assert!(!ticker.take_due(start + Duration::from_millis(999)));
        assert!(ticker.take_due(start + Duration::from_secs(1)));
        assert!(!ticker.take_due(start + Duration::from_millis(1500)));

        // A stall of three periods yields exactly three catch-up ticks
        let later = start + Duration::from_millis(4200);
        let mut fired = 0;
        while ticker.take_due(later) {
            fired += 1;
        }
        assert_eq!(fired, 3);
    }

    #[test]
    fn test_cancel_drops_pending_tick() {
        let mut ticker = Ticker::new();
        let start = Instant::now();
        ticker.arm(start);
        ticker.cancel();
        assert_eq!(ticker.until_next(start), None);
        assert!(!ticker.take_due(start + Duration::from_secs(5)));
    }
}
