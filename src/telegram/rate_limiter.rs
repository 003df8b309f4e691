//! Rate limiter for broadcast posts.
//!
//! Every generated record and every export is posted to the same broadcast
//! chat, so bursts of commands from different users would otherwise hit
//! Telegram's per-chat flood limits.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Rate limiter that enforces minimum intervals between operations.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum duration between allowed operations.
    min_interval: Duration,

    /// Earliest time the next operation may start.
    next_allowed: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a new rate limiter with the specified minimum interval.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: Mutex::new(None),
        }
    }

    /// Creates a rate limiter from milliseconds.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Waits until an operation is allowed, then marks the operation as performed.
    ///
    /// Returns the duration waited (0 if no wait was needed).
    pub async fn wait_and_acquire(&self) -> Duration {
        let mut next = self.next_allowed.lock().await;

        let wait_duration = next
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or_default();

        if !wait_duration.is_zero() {
            debug!("Rate limiter: waiting {:?} before next post", wait_duration);
            tokio::time::sleep(wait_duration).await;
        }

        *next = Some(Instant::now() + self.min_interval);
        wait_duration
    }

    /// Returns the time remaining until the next operation is allowed.
    pub async fn time_until_allowed(&self) -> Duration {
        self.next_allowed
            .lock()
            .await
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or_default()
    }

    /// Records a flood wait from Telegram.
    ///
    /// Does not sleep; the next [`Self::wait_and_acquire`] waits the
    /// deadline out.
    pub async fn handle_flood_wait(&self, wait_seconds: u32) {
        warn!("Received flood wait from Telegram: {} seconds", wait_seconds);
        let deadline = Instant::now() + Duration::from_secs(u64::from(wait_seconds));
        let mut next = self.next_allowed.lock().await;
        *next = Some(next.map_or(deadline, |current| current.max(deadline)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_first_operation() {
        let limiter = RateLimiter::from_millis(1000);
        assert_eq!(limiter.time_until_allowed().await, Duration::ZERO);

        let waited = limiter.wait_and_acquire().await;
        assert_eq!(waited, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_rate_limiter_subsequent_operation() {
        let limiter = RateLimiter::new(Duration::from_secs(60));

        limiter.wait_and_acquire().await;

        let remaining = limiter.time_until_allowed().await;
        assert!(remaining > Duration::ZERO);
        assert!(remaining <= Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_rate_limiter_waits_between_posts() {
        let limiter = RateLimiter::from_millis(50);

        limiter.wait_and_acquire().await;
        let waited = limiter.wait_and_acquire().await;
        assert!(waited > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::from_millis(0);
        limiter.wait_and_acquire().await;
        assert_eq!(limiter.wait_and_acquire().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_flood_wait_returns_immediately() {
        let limiter = RateLimiter::from_millis(0);

        let started = Instant::now();
        limiter.handle_flood_wait(600).await;
        assert!(started.elapsed() < Duration::from_secs(1));

        let remaining = limiter.time_until_allowed().await;
        assert!(remaining > Duration::from_secs(590));
    }

    #[tokio::test]
    async fn test_next_acquire_waits_out_flood_deadline() {
        let limiter = RateLimiter::from_millis(0);
        limiter.wait_and_acquire().await;

        limiter.handle_flood_wait(1).await;
        let waited = limiter.wait_and_acquire().await;
        assert!(waited > Duration::from_millis(900));
        assert!(waited <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_flood_wait_never_shortens_deadline() {
        let limiter = RateLimiter::new(Duration::from_secs(120));
        limiter.wait_and_acquire().await;

        limiter.handle_flood_wait(5).await;
        assert!(limiter.time_until_allowed().await > Duration::from_secs(100));
    }
}
