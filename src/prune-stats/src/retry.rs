//! Retry for filesystem calls that fail because the process ran out of file
//! descriptors.
//!
//! A wide concurrent walk can exhaust the descriptor table. Such failures are
//! transient, so the call is repeated after a randomized pause. Every other
//! error is returned on the first attempt.

use std::future::Future;
use std::io;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed part of the pause between attempts.
    pub min_wait: Duration,
    /// Upper bound of the random part of the pause.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1000,
            min_wait: Duration::from_millis(200),
            max_jitter: Duration::from_secs(2),
        }
    }
}

/// True for "too many open files", per process or system wide.
pub fn is_fd_exhausted(error: &io::Error) -> bool {
    matches!(error.raw_os_error(), Some(code) if code == libc::EMFILE || code == libc::ENFILE)
}

impl RetryPolicy {
    /// Pause before the next attempt: `min_wait` plus a random share of
    /// `max_jitter`.
    pub fn delay(&self) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.min_wait;
        }
        let jitter = rand::rng().random_range(0..jitter_ms);
        self.min_wait + Duration::from_millis(jitter)
    }

    /// Run `f` until it succeeds, fails with an error other than descriptor
    /// exhaustion, or runs out of attempts. The last error is returned.
    pub async fn execute<F, Fut, T>(&self, mut f: F) -> io::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = io::Result<T>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match f().await {
                Ok(result) => return Ok(result),
                Err(error) if is_fd_exhausted(&error) && attempt < self.max_attempts => {
                    let delay = self.delay();
                    debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Out of file descriptors, retrying"
                    );
                    sleep(delay).await;
                }
                Err(error) => {
                    if is_fd_exhausted(&error) {
                        warn!(attempts = attempt, "Giving up after repeated descriptor exhaustion");
                    }
                    return Err(error);
                }
            }
        }
    }
}
