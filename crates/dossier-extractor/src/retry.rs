//! Bounded retry over a fallible async call

use crate::error::ExtractorError;
use crate::types::AttemptFailure;
use std::future::Future;
use tracing::warn;

/// Re-runs an operation with identical input until it succeeds or the
/// attempt limit is reached. There is no backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// Policy allowing `max_attempts` attempts (at least one)
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Configured attempt limit
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds.
    ///
    /// `op` receives the 1-based attempt number. Every failed attempt is
    /// reported to `on_failure` before the next one starts. Errors that are
    /// not retryable end the loop immediately. Returns the value together
    /// with the attempt that produced it.
    pub async fn run<T, F, Fut, O>(&self, mut op: F, mut on_failure: O) -> Result<(T, u32), ExtractorError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ExtractorError>>,
        O: FnMut(&AttemptFailure<'_>),
    {
        let mut attempt = 1;
        loop {
            let err = match op(attempt).await {
                Ok(value) => return Ok((value, attempt)),
                Err(err) => err,
            };

            on_failure(&AttemptFailure {
                attempt,
                max_attempts: self.max_attempts,
                reason: &err,
            });

            if !err.is_retryable() {
                return Err(err);
            }
            if attempt >= self.max_attempts {
                warn!(attempts = attempt, error = %err, "Retry budget exhausted");
                return Err(ExtractorError::Exhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}
