// src/timer.rs
// Free-running stopwatch shown as M:SS.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::defs::TICK_INTERVAL;

/// Format whole seconds as `M:SS` (minutes unpadded).
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Counts elapsed ticks on a tokio task. At most one ticking task exists at a time:
/// `reset` aborts the previous one before spawning its replacement.
pub struct Stopwatch {
    period: Duration,
    seconds: Arc<AtomicU64>,
    ticker: Option<JoinHandle<()>>,
}

impl Stopwatch {
    /// Create a stopped stopwatch showing 0:00.
    pub fn new() -> Self {
        Self::with_period(TICK_INTERVAL)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            seconds: Arc::new(AtomicU64::new(0)),
            ticker: None,
        }
    }

    /// Restart from zero. Must be called inside a tokio runtime.
    pub fn reset(&mut self) {
        self.stop();

        // A fresh counter per run: a ticker that is being torn down can only touch its own.
        let seconds = Arc::new(AtomicU64::new(0));
        self.seconds = Arc::clone(&seconds);

        let period = self.period;
        self.ticker = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                seconds.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn seconds(&self) -> u64 {
        self.seconds.load(Ordering::Relaxed)
    }

    pub fn display(&self) -> String {
        format_clock(self.seconds())
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(754), "12:34");
    }

    #[test]
    fn test_new_stopwatch_is_stopped() {
        let watch = Stopwatch::new();
        assert!(!watch.is_running());
        assert_eq!(watch.display(), "0:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_second() {
        let mut watch = Stopwatch::new();
        watch.reset();
        sleep(Duration::from_millis(3500)).await;
        assert_eq!(watch.seconds(), 3);
        assert_eq!(watch.display(), "0:03");
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_reset_keeps_one_tick_source() {
        let mut watch = Stopwatch::new();
        watch.reset();
        watch.reset();
        watch.reset();
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(watch.seconds(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restarts_from_zero() {
        let mut watch = Stopwatch::new();
        watch.reset();
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(watch.seconds(), 2);

        watch.reset();
        assert_eq!(watch.seconds(), 0);
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(watch.seconds(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_time() {
        let mut watch = Stopwatch::new();
        watch.reset();
        sleep(Duration::from_millis(1500)).await;
        watch.stop();
        sleep(Duration::from_millis(3000)).await;
        assert_eq!(watch.seconds(), 1);
        assert!(!watch.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_minutes_roll_over() {
        let mut watch = Stopwatch::new();
        watch.reset();
        sleep(Duration::from_millis(61_500)).await;
        assert_eq!(watch.display(), "1:01");
    }
}
