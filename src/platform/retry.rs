//! Retry policy and executor for remote calls

use crate::error::PulseError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Back off and try again
    Retry,
    /// Rebuild the transport, back off and try again
    Reconnect,
    /// Propagate the error immediately
    Fail,
}

/// Retry policy: attempts, backoff and per-call timeout
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
    /// Hard limit for a single attempt
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter_factor: 0.0,
            call_timeout: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the retry that follows failed attempt `attempt` (0-based):
    /// `base_delay * 2^attempt`, capped at `max_delay`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Classify a failure
    pub fn decision(&self, error: &PulseError) -> RetryDecision {
        if error.needs_reconnect() {
            RetryDecision::Reconnect
        } else if error.is_retryable() {
            RetryDecision::Retry
        } else {
            RetryDecision::Fail
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.jitter_factor <= 0.0 {
            return delay;
        }
        let range = delay.as_millis() as f64 * self.jitter_factor.min(1.0);
        let jitter = (rand::random::<f64>() - 0.5) * 2.0 * range;
        Duration::from_millis(jitter.abs() as u64) + delay
    }
}

/// Retry policy builder
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
        }
    }

    /// Set total attempts (at least 1)
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.policy.max_attempts = max_attempts.max(1);
        self
    }

    pub fn base_delay(mut self, base_delay: Duration) -> Self {
        self.policy.base_delay = base_delay;
        self
    }

    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.policy.max_delay = max_delay;
        self
    }

    pub fn jitter_factor(mut self, jitter_factor: f64) -> Self {
        self.policy.jitter_factor = jitter_factor.clamp(0.0, 1.0);
        self
    }

    pub fn call_timeout(mut self, call_timeout: Duration) -> Self {
        self.policy.call_timeout = call_timeout;
        self
    }

    pub fn build(self) -> RetryPolicy {
        self.policy
    }
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs operations under a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute an operation with retries; transport failures are retried
    /// without any reconnect hook
    pub async fn execute<F, Fut, T>(&self, operation: &str, func: F) -> Result<T, PulseError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PulseError>>,
    {
        self.execute_with_reconnect(operation, func, || async {})
            .await
    }

    /// Execute an operation with retries, calling `reconnect` before the
    /// next attempt whenever the failure calls for a fresh transport
    pub async fn execute_with_reconnect<F, Fut, T, R, RFut>(
        &self,
        operation: &str,
        mut func: F,
        mut reconnect: R,
    ) -> Result<T, PulseError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PulseError>>,
        R: FnMut() -> RFut,
        RFut: Future<Output = ()>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..max_attempts {
            debug!("{} attempt {}/{}", operation, attempt + 1, max_attempts);

            let outcome = match tokio::time::timeout(self.policy.call_timeout, func()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(PulseError::Timeout(self.policy.call_timeout)),
            };

            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let decision = self.policy.decision(&error);
            if decision == RetryDecision::Fail {
                return Err(error);
            }

            if attempt + 1 < max_attempts {
                let delay = self.policy.jittered(self.policy.delay_for(attempt));
                warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    operation,
                    attempt + 1,
                    max_attempts,
                    error,
                    delay
                );
                if decision == RetryDecision::Reconnect {
                    reconnect().await;
                }
                tokio::time::sleep(delay).await;
            }

            last_error = Some(error);
        }

        let source = last_error.unwrap_or_else(|| PulseError::Generic("no attempt made".to_string()));
        error!(
            "{} failed after {} attempts: {}",
            operation, max_attempts, source
        );
        Err(PulseError::RetriesExhausted {
            attempts: max_attempts,
            source: Box::new(source),
        })
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new()
    }
}
