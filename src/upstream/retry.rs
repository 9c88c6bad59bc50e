// src/upstream/retry.rs
use std::time::Duration;

use super::{RawResponse, Upstream};
use crate::errors::FetchError;

/// Fixed-delay retry budget for one logical upstream request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            timeout: Duration::from_millis(2000),
            retry_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Zero is treated as one; the first attempt always happens.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Upper bound on the time `fetch_with_retry` can take. Saturates at `Duration::MAX`.
    pub fn worst_case_latency(&self) -> Duration {
        let attempts = self.attempts();
        self.timeout
            .saturating_mul(attempts)
            .saturating_add(self.retry_delay.saturating_mul(attempts - 1))
    }
}

/// Result of a single attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Completed(RawResponse),
    Failed(FetchError),
}

/// Result of the whole retry sequence.
#[derive(Debug)]
pub enum RetryOutcome {
    Success(RawResponse),
    Exhausted { attempts: u32, last_error: FetchError },
}

/// Runs one attempt, cancelling it if `timeout` elapses first.
///
/// The timer lives inside the `timeout` future, so it is dropped together with
/// the attempt whichever way the attempt ends.
pub async fn fetch_with_timeout(upstream: &dyn Upstream, url: &str, timeout: Duration) -> AttemptOutcome {
    match tokio::time::timeout(timeout, upstream.get(url)).await {
        Ok(Ok(resp)) => AttemptOutcome::Completed(resp),
        Ok(Err(e)) => AttemptOutcome::Failed(e),
        Err(_elapsed) => AttemptOutcome::Failed(FetchError::Timeout(timeout.as_millis() as u64)),
    }
}

/// Calls `upstream` at most `policy.attempts()` times, sleeping `retry_delay`
/// between failed attempts.
///
/// Any completed response ends the loop, including non-2xx ones; only
/// timeouts and transport errors are retried.
pub async fn fetch_with_retry(upstream: &dyn Upstream, url: &str, policy: &RetryPolicy) -> RetryOutcome {
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match fetch_with_timeout(upstream, url, policy.timeout).await {
            AttemptOutcome::Completed(resp) => return RetryOutcome::Success(resp),
            AttemptOutcome::Failed(e) if attempt < attempts => {
                log::warn!("upstream attempt {}/{} failed: {}", attempt, attempts, e);
                tokio::time::sleep(policy.retry_delay).await;
                attempt += 1;
            }
            AttemptOutcome::Failed(e) => {
                return RetryOutcome::Exhausted {
                    attempts: attempt,
                    last_error: e,
                };
            }
        }
    }
}
