//! Bounded retry of store transactions
//!
//! Only `TransactionConflict` is retried here. `StorageUnavailable` goes
//! back to the caller, which owns the decision to retry a whole request.

use std::future::Future;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::utils::errors::{ParticipationError, Result};
use crate::utils::logging::log_transaction_retry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self { max_retries, backoff }
    }

    /// Fail on the first conflict
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(25))
    }
}

impl From<&EngineConfig> for RetryPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self::new(config.max_transaction_retries, Duration::from_millis(config.retry_backoff_ms))
    }
}

/// Run `attempt` until it succeeds, fails with anything other than a
/// conflict, or exhausts the policy. Backoff grows linearly per attempt.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, operation: &'static str, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        match attempt().await {
            Err(ParticipationError::TransactionConflict(reason)) if attempts <= policy.max_retries => {
                log_transaction_retry(operation, attempts, &reason);
                tokio::time::sleep(policy.backoff * attempts).await;
            }
            Err(ParticipationError::TransactionConflict(reason)) => {
                return Err(ParticipationError::TransactionConflict(format!(
                    "{} gave up after {} attempts: {}",
                    operation, attempts, reason
                )));
            }
            other => return other,
        }
    }
}
