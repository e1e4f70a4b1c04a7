//! Minimum-interval gating for outbound Access API requests.
//!
//! The CMS service is sensitive to request rate, so every call serializes
//! through one shared "next allowed run" deadline. This is not a burst-capable
//! rate limiter: at most one dispatch per interval, measured at call
//! initiation, with no credit for idle time.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// Shared dispatch gate enforcing a minimum interval between requests.
///
/// The deadline is advanced *before* the request is sent, immediately after
/// the wait resolves, so the gate orders call initiation rather than call
/// completion.
#[derive(Debug)]
pub struct RequestThrottle {
    /// Next moment a request may be dispatched.
    next_run: Mutex<Instant>,
    min_interval: Duration,
    poll_interval: Duration,
}

impl RequestThrottle {
    /// Creates a gate that spaces dispatches at least `min_interval` apart,
    /// re-checking a not-yet-expired deadline every `poll_interval` at most.
    pub fn new(min_interval: Duration, poll_interval: Duration) -> Self {
        Self {
            next_run: Mutex::new(Instant::now()),
            min_interval,
            poll_interval,
        }
    }

    /// Suspends until the shared deadline has passed, then reserves the next
    /// slot by moving the deadline to `now + min_interval`.
    ///
    /// A woken waiter always re-reads the deadline under the lock: when
    /// several callers race, each serializes behind the slot the previous
    /// one reserved, so back-to-back dispatches never get closer than the
    /// configured interval. The wait is a timed sleep, never a busy spin.
    pub async fn acquire(&self) {
        loop {
            let now = Instant::now();
            let mut next_run = self.next_run.lock().await;
            if *next_run <= now {
                *next_run = now + self.min_interval;
                return;
            }

            let remaining = *next_run - now;
            drop(next_run);
            sleep(remaining.min(self.poll_interval)).await;
        }
    }

    /// The configured minimum dispatch interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn throttle_500ms() -> RequestThrottle {
        RequestThrottle::new(Duration::from_millis(500), Duration::from_millis(100))
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_immediate() {
        let throttle = throttle_500ms();
        let start = Instant::now();

        throttle.acquire().await;

        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_calls_are_spaced() {
        let throttle = throttle_500ms();
        let mut dispatches = Vec::new();

        for _ in 0..4 {
            throttle.acquire().await;
            dispatches.push(Instant::now());
        }

        for pair in dispatches.windows(2) {
            assert!(
                pair[1] - pair[0] >= Duration::from_millis(500),
                "dispatches {:?} closer than the minimum interval",
                pair[1] - pair[0]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_serialize() {
        let throttle = Arc::new(throttle_500ms());

        let acquire_at = |throttle: Arc<RequestThrottle>| async move {
            throttle.acquire().await;
            Instant::now()
        };

        let (a, b, c) = tokio::join!(
            acquire_at(Arc::clone(&throttle)),
            acquire_at(Arc::clone(&throttle)),
            acquire_at(Arc::clone(&throttle)),
        );

        let mut dispatches = [a, b, c];
        dispatches.sort();

        for pair in dispatches.windows(2) {
            assert!(
                pair[1] - pair[0] >= Duration::from_millis(500),
                "racing callers dispatched {:?} apart",
                pair[1] - pair[0]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_reserves_from_wait_end() {
        let throttle = throttle_500ms();

        throttle.acquire().await;
        // Sit out three intervals; the gate must not bank unused slots.
        sleep(Duration::from_millis(1500)).await;

        let start = Instant::now();
        throttle.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(100));

        throttle.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
