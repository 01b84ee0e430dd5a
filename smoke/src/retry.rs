use crate::error::Result;
use log::{info, warn};
use std::future::Future;
use tokio::time::{sleep, Duration};

/// A bounded, fixed-delay retry of a whole check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Zero is treated as one.
    pub attempts: u32,
    /// Delay between a failed attempt and the next one.
    pub delay: Duration,
}

/// The result of running a check under a [`RetryPolicy`].
#[derive(Debug)]
pub struct Retried<T> {
    /// How many attempts were made.
    pub attempts: u32,
    /// The result of the last attempt.
    pub result: Result<T>,
}

impl RetryPolicy {
    /// Run once, no retries.
    pub const fn once() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// The first run plus up to `reruns` more, `delay` apart.
    pub const fn with_reruns(reruns: u32, delay: Duration) -> Self {
        Self {
            attempts: reruns.saturating_add(1),
            delay,
        }
    }

    /// Call `check` until it succeeds or the attempts run out.
    pub async fn run<F, Fut, T>(&self, what: &str, mut check: F) -> Retried<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match check().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("'{}' passed on attempt {} of {}", what, attempt, attempts);
                    }
                    return Retried {
                        attempts: attempt,
                        result: Ok(value),
                    };
                }
                Err(e) if attempt < attempts => {
                    warn!(
                        "'{}' failed on attempt {} of {}, retrying in {}s: {}",
                        what,
                        attempt,
                        attempts,
                        self.delay.as_secs(),
                        e
                    );
                }
                Err(e) => {
                    return Retried {
                        attempts: attempt,
                        result: Err(e),
                    }
                }
            }
            sleep(self.delay).await;
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}
