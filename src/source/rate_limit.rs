use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Process-wide minimum spacing between upstream requests.
///
/// Callers queue on the lock while the delay elapses, so requests are never
/// rejected, only delayed.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait for the next slot and claim it. Returns how long the caller waited.
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last_request.lock().await;
        let mut waited = Duration::ZERO;

        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                waited = ready_at - now;
                sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
        waited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_first_request_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        assert_eq!(limiter.acquire().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_requests_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(Instant::now() - start >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_has_passed() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(limiter.acquire().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_queue() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(500)));
        let start = Instant::now();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }
        assert!(Instant::now() - start >= Duration::from_millis(1500));
    }
}
