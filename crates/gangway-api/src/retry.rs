//! Bounded retry with exponential backoff.
//!
//! The status service is eventually consistent: right after a submission it
//! may know nothing about the execution ID yet. Polling is expressed as a
//! bounded loop where each attempt reports one of three outcomes and
//! not-yet outcomes back off with doubling delays.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Outcome of a single retry attempt.
#[derive(Debug)]
pub enum Attempt<T, E> {
    /// The operation produced a usable value; stop retrying.
    Ready(T),
    /// Not ready yet; back off and try again if attempts remain.
    NotYet,
    /// Unrecoverable failure; stop retrying and surface the error.
    Fatal(E),
}

/// Backoff schedule: `base_delay` after the first attempt, doubling after
/// each subsequent one, no jitter, at most `max_attempts` attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay to sleep after the given 1-based attempt number.
    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Drive `attempt` until it is ready, fatal, or the policy is exhausted.
///
/// The closure receives the 1-based attempt number. Returns
/// `Ok(Some(value))` on success, `Ok(None)` when every attempt reported
/// not-yet, and `Err` as soon as an attempt is fatal.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    mut attempt: F,
) -> Result<Option<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
{
    for number in 1..=policy.max_attempts {
        match attempt(number).await {
            Attempt::Ready(value) => return Ok(Some(value)),
            Attempt::Fatal(err) => return Err(err),
            Attempt::NotYet => {
                if number < policy.max_attempts {
                    let delay = policy.delay_after(number);
                    debug!(
                        attempt = number,
                        delay_ms = delay.as_millis() as u64,
                        "not ready, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Ok(None)
}
