//! Retry state machine shared by the static fetcher and the search client.
//!
//! An operation is attempted, and a retryable failure moves the machine to
//! `Retrying` with the next backoff from the schedule. It ends in `Success`, or
//! in `Exhausted` once the schedule runs out. The schedule comes from
//! `tokio_retry`'s [`ExponentialBackoff`], so the n-th retry waits
//! `base * 2^(n-1)`, capped at the policy's maximum.

use std::future::Future;
use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use crate::config::MAX_BACKOFF;

/// Bounded exponential retry schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait before the first retry
    pub base: Duration,
    /// Upper bound for a single wait
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy capped at [`MAX_BACKOFF`].
    pub fn new(max_retries: u32, base: Duration) -> Self {
        Self {
            max_retries,
            base,
            max_backoff: MAX_BACKOFF,
        }
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Scheduled waits before retry 1, 2, .. `max_retries`.
    ///
    /// `ExponentialBackoff::from_millis(2).factor(base_ms)` yields
    /// `base_ms * 2^n` for n = 1, 2, ..; halving gives `base * 2^(n-1)`.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> {
        let base_ms = u64::try_from(self.base.as_millis()).unwrap_or(u64::MAX);
        let cap = self.max_backoff;
        ExponentialBackoff::from_millis(2)
            .factor(base_ms)
            .map(move |delay| (delay / 2).min(cap))
            .take(self.max_retries as usize)
    }

    /// Wait actually used before a retry: the larger of the server hint
    /// (bounded by the cap) and the scheduled backoff.
    pub fn effective_wait(&self, scheduled: Duration, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(hint) => hint.min(self.max_backoff).max(scheduled),
            None => scheduled,
        }
    }
}

/// States of one retried operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Attempt `n` (1-based) is in flight
    Attempting(u32),
    /// Attempt `n` will start after `backoff`
    Retrying { attempt: u32, backoff: Duration },
    Success,
    Exhausted,
}

/// Result of one attempt as seen by the state machine.
#[derive(Debug)]
pub enum AttemptResult<T, E> {
    Done(T),
    /// Transient failure; `retry_after` carries a server-provided wait hint.
    Retryable {
        error: E,
        retry_after: Option<Duration>,
    },
    /// Permanent failure; no further attempts.
    Fatal(E),
}

/// Final result plus the bookkeeping callers report and tests assert on.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    /// Attempts issued (first attempt included)
    pub attempts: u32,
    /// Waits taken between attempts, in order
    pub backoffs: Vec<Duration>,
    /// Terminal state (`Success` or `Exhausted`; `Exhausted` also for fatal errors)
    pub state: RetryState,
}

/// Drives `op` through the retry state machine.
///
/// `op` receives the 1-based attempt number.
pub async fn run_with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AttemptResult<T, E>>,
{
    let mut schedule = policy.schedule();
    let mut backoffs = Vec::new();
    let mut attempt = 1;

    loop {
        log::trace!("{:?}", RetryState::Attempting(attempt));
        match op(attempt).await {
            AttemptResult::Done(value) => {
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt,
                    backoffs,
                    state: RetryState::Success,
                };
            }
            AttemptResult::Fatal(error) => {
                return RetryOutcome {
                    result: Err(error),
                    attempts: attempt,
                    backoffs,
                    state: RetryState::Exhausted,
                };
            }
            AttemptResult::Retryable { error, retry_after } => {
                let Some(scheduled) = schedule.next() else {
                    log::debug!("Retry budget exhausted after {} attempts", attempt);
                    return RetryOutcome {
                        result: Err(error),
                        attempts: attempt,
                        backoffs,
                        state: RetryState::Exhausted,
                    };
                };
                let backoff = policy.effective_wait(scheduled, retry_after);
                log::debug!(
                    "Attempt {} failed, {:?}",
                    attempt,
                    RetryState::Retrying {
                        attempt: attempt + 1,
                        backoff,
                    }
                );
                backoffs.push(backoff);
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}
