//! Time source for the animation loop.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time and sleeping, abstracted so the animation loop runs on
/// wall-clock time in production and on a virtual clock in tests.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Time since the clock was created
    fn now(&self) -> Duration;

    /// Suspend for `duration`, yielding to the runtime
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock time backed by `tokio::time`
#[derive(Debug, Clone)]
pub struct TokioClock {
    start: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Virtual clock: sleeping advances time instantly.
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ns: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.now_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.now_ns.load(Ordering::SeqCst))
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_clock_sleep_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.sleep(Duration::from_millis(400)).await;
        clock.sleep(Duration::from_millis(400)).await;
        assert_eq!(clock.now(), Duration::from_millis(800));
    }

    #[test]
    fn test_manual_clock_clone_shares_time() {
        let a = ManualClock::new();
        let b = a.clone();
        a.advance(Duration::from_secs(5));
        assert_eq!(b.now(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_tokio_clock_time() {
        let clock = TokioClock::new();
        let t1 = clock.now();
        clock.sleep(Duration::from_millis(10)).await;
        let t2 = clock.now();

        assert!(t2 > t1);
        assert!(t2 - t1 >= Duration::from_millis(10));
    }
}
