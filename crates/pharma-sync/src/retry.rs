//! Retry policies for backend queries.

use std::future::Future;
use std::time::Duration;

use crate::BackendError;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Exponential backoff with base and max.
    Exponential {
        /// Initial delay.
        base: Duration,
        /// Maximum delay.
        max: Duration,
    },
}

impl BackoffStrategy {
    /// Calculate delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Exponential { base, max } => {
                let multiplier = 2u32.saturating_pow(attempt);
                std::cmp::min(base.saturating_mul(multiplier), *max)
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(50),
            max: Duration::from_millis(1000),
        }
    }
}

/// Classes of backend failure that may be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// The call never produced a reply.
    Transport,
    /// The backend refused the call for a non-authorization reason.
    Rejected,
    /// The entity was missing.
    NotFound,
    /// The caller lacked permission.
    Unauthorized,
}

impl RetryCondition {
    /// Check if an error matches this condition.
    pub fn matches(&self, error: &BackendError) -> bool {
        matches!(
            (self, error),
            (Self::Transport, BackendError::Transport(_))
                | (Self::Rejected, BackendError::Rejected(_))
                | (Self::NotFound, BackendError::NotFound(_))
                | (Self::Unauthorized, BackendError::Unauthorized(_))
        )
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first call.
    pub max_attempts: u32,
    /// Backoff strategy.
    pub backoff: BackoffStrategy,
    /// Conditions that trigger retry.
    pub retry_on: Vec<RetryCondition>,
}

impl RetryPolicy {
    /// Create a new retry policy.
    ///
    /// Authorization and not-found failures are never retried by default.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::default(),
            retry_on: vec![RetryCondition::Transport, RetryCondition::Rejected],
        }
    }

    /// Create a policy with no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: BackoffStrategy::None,
            retry_on: Vec::new(),
        }
    }

    /// Set backoff strategy.
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Set retry conditions.
    pub fn with_conditions(mut self, conditions: Vec<RetryCondition>) -> Self {
        self.retry_on = conditions;
        self
    }

    /// Check if a failed attempt (0-indexed) should be retried.
    pub fn should_retry(&self, error: &BackendError, attempt: u32) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }
        self.retry_on.iter().any(|c| c.matches(error))
    }

    /// Run `op`, retrying failures this policy allows.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, BackendError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if self.should_retry(&e, attempt) => {
                    let delay = self.backoff.delay_for_attempt(attempt);
                    tracing::debug!(attempt, ?delay, error = %e, "retrying backend call");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_exponential_backoff_is_capped() {
        let backoff = BackoffStrategy::Exponential {
            base: Duration::from_millis(50),
            max: Duration::from_millis(300),
        };
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(50));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_millis(300));
        assert_eq!(backoff.delay_for_attempt(40), Duration::from_millis(300));
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::new(2);
        let transport = BackendError::Transport("reset".into());
        assert!(policy.should_retry(&transport, 0));
        assert!(policy.should_retry(&transport, 1));
        assert!(!policy.should_retry(&transport, 2));
        assert!(!policy.should_retry(&BackendError::Unauthorized("no".into()), 0));
        assert!(!RetryPolicy::none().should_retry(&transport, 0));
    }

    #[tokio::test]
    async fn test_run_retries_until_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3).with_backoff(BackoffStrategy::None);

        let result = policy
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(BackendError::Transport("flaky".into()))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_gives_up() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(1).with_backoff(BackoffStrategy::None);

        let result: Result<(), _> = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(BackendError::Rejected("down".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_between_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(1).with_backoff(BackoffStrategy::Fixed(Duration::from_secs(5)));
        let started = tokio::time::Instant::now();

        let _ = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(BackendError::Transport("down".into()))
            })
            .await;

        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_none_calls_once() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = RetryPolicy::none()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(BackendError::Transport("down".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
