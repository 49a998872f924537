//! Bounded retry with exponential backoff
//!
//! Only transient transport failures are retried; permanent failures
//! propagate on the first attempt. Exhausting the retry budget surfaces
//! [`Error::RetriesExhausted`] carrying the last transient error.

use std::time::Duration;

use engagement_core::{Error, Result};
use tracing::warn;

use crate::transport::TransportError;

/// Retry behaviour for transport calls
///
/// Delays double per attempt from `base_delay`, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first call (0 = no retries)
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Ceiling on the per-attempt delay
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(32),
        }
    }
}

impl RetryConfig {
    /// Default retry behaviour
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on the first transient error
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the ceiling on the per-attempt delay
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay before retry number `retry` (0-based), doubling and capped
    pub(crate) fn delay_for(&self, retry: u32) -> Duration {
        // Cap the shift so the multiplier cannot overflow.
        let multiplier = 1u32 << retry.min(31);
        self.base_delay.saturating_mul(multiplier).min(self.max_delay)
    }

    /// Run `op`, retrying transient failures within this budget
    ///
    /// `label` names the operation in logs. Permanent transport errors map to
    /// [`Error::Storage`] without retrying.
    pub fn run<T, F>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> std::result::Result<T, TransportError>,
    {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => {
                    return Err(Error::Storage(format!("{label}: {err}")));
                }
                Err(err) => {
                    let retry = attempts - 1;
                    if retry >= self.max_retries {
                        warn!(label, attempts, error = %err, "retry budget exhausted");
                        return Err(Error::RetriesExhausted {
                            attempts,
                            last_error: err.to_string(),
                        });
                    }
                    let delay = self.delay_for(retry);
                    warn!(
                        label,
                        attempt = attempts,
                        remaining = self.max_retries - retry,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient transport failure, retrying"
                    );
                    std::thread::sleep(delay);
                }
            }
        }
    }
}
