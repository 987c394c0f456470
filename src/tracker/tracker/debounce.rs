extern crate futures;
extern crate tokio;

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Holds the latest item until no newer one arrived for `delay`.
///
/// There is at most one pending item; pushing replaces it and restarts the
/// timer.
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}
impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }
    /// Returns whether an already pending item was replaced.
    pub fn push(&mut self, item: T) -> bool {
        self.pending
            .replace((Instant::now() + self.delay, item))
            .is_some()
    }
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
    /// Resolves with the pending item once its quiet period has passed.
    /// Never resolves while nothing is pending. Safe to drop at any await.
    pub async fn expired(&mut self) -> T {
        loop {
            match self.pending.as_ref().map(|(deadline, _)| *deadline) {
                Some(deadline) => sleep_until(deadline).await,
                None => futures::future::pending::<()>().await,
            }
            if let Some((_, item)) = self.pending.take() {
                return item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    #[tokio::test(start_paused = true)]
    async fn fires_after_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::from_secs(2));
        let start = Instant::now();
        assert!(!debouncer.push(1));
        assert_eq!(debouncer.expired().await, 1);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn push_restarts_timer_and_keeps_latest() {
        let mut debouncer = Debouncer::new(Duration::from_secs(2));
        let start = Instant::now();
        debouncer.push("a");
        sleep(Duration::from_millis(1500)).await;
        assert!(debouncer.push("b"));
        assert_eq!(debouncer.expired().await, "b");
        assert_eq!(start.elapsed(), Duration::from_millis(3500));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_debouncer_never_fires() {
        let mut debouncer: Debouncer<u8> = Debouncer::new(Duration::from_secs(2));
        assert!(timeout(Duration::from_secs(60), debouncer.expired())
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_wait_keeps_item() {
        let mut debouncer = Debouncer::new(Duration::from_secs(2));
        debouncer.push(7);
        assert!(timeout(Duration::from_secs(1), debouncer.expired())
            .await
            .is_err());
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.expired().await, 7);
    }
}
