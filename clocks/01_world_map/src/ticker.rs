//! Ticker - restartable fixed-interval timer driven by the frame loop

use std::time::{Duration, Instant};

/// Fires at most once per `interval` while running
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last_fire: Option<Instant>,
}

impl Ticker {
    /// A stopped ticker
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
        }
    }

    /// Start (or restart) counting from `now`
    pub fn start(&mut self, now: Instant) {
        self.last_fire = Some(now);
    }

    /// Stop; `poll` returns false until the next `start`
    pub fn cancel(&mut self) {
        self.last_fire = None;
    }

    #[allow(dead_code)]
    pub fn is_running(&self) -> bool {
        self.last_fire.is_some()
    }

    /// True when an interval has elapsed since the last fire
    ///
    /// Missed intervals collapse into a single fire.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_fire {
            Some(last) if now.saturating_duration_since(last) >= self.interval => {
                self.last_fire = Some(now);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_fires_once_per_interval() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(SECOND);
        ticker.start(t0);

        assert!(!ticker.poll(t0 + Duration::from_millis(999)));
        assert!(ticker.poll(t0 + SECOND));
        assert!(!ticker.poll(t0 + Duration::from_millis(1500)));
        assert!(ticker.poll(t0 + Duration::from_millis(2000)));
    }

    #[test]
    fn test_missed_intervals_collapse() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(SECOND);
        ticker.start(t0);

        assert!(ticker.poll(t0 + Duration::from_secs(5)));
        assert!(!ticker.poll(t0 + Duration::from_millis(5500)));
    }

    #[test]
    fn test_cancel_and_restart() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(SECOND);
        assert!(!ticker.is_running());
        assert!(!ticker.poll(t0 + Duration::from_secs(10)));

        ticker.start(t0);
        ticker.cancel();
        assert!(!ticker.is_running());
        assert!(!ticker.poll(t0 + Duration::from_secs(10)));

        ticker.start(t0 + Duration::from_secs(10));
        assert!(ticker.is_running());
        assert!(!ticker.poll(t0 + Duration::from_millis(10500)));
        assert!(ticker.poll(t0 + Duration::from_secs(11)));
    }
}
