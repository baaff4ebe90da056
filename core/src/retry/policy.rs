//! Backoff policy: when to retry and how long to wait.

use std::time::Duration;

use rand::Rng;

use super::classify::FailureKind;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Surface the failure to the caller.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff with additive jitter.
///
/// The delay before retry `n` (1-based) is
/// `base_delay * exponent_base^(n-1) + max_jitter * sample`, where `sample`
/// is drawn uniformly from `[0, 1)` for every retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub exponent_base: u32,
    /// Upper (exclusive) bound of the jitter added to each delay.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            exponent_base: 2,
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy that retries without waiting. Useful against local servers.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            exponent_base: 2,
            max_jitter: Duration::ZERO,
        }
    }

    /// Delay before the retry with 1-based ordinal `attempt`.
    pub fn backoff(&self, attempt: u32, jitter_sample: f64) -> Duration {
        let factor = self
            .exponent_base
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        let delay = self.base_delay.saturating_mul(factor);
        // Truncate rather than round so the jitter stays strictly below max_jitter.
        let jitter_nanos = self.max_jitter.as_nanos() as f64 * clamp_sample(jitter_sample);
        delay.saturating_add(Duration::from_nanos(jitter_nanos as u64))
    }

    /// Decide what to do after a failure, given how many retries already ran.
    pub fn decide(&self, retries_done: u32, kind: FailureKind, jitter_sample: f64) -> RetryDecision {
        if !kind.is_retryable() || retries_done >= self.max_retries {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff(retries_done + 1, jitter_sample))
    }
}

fn clamp_sample(sample: f64) -> f64 {
    if sample.is_nan() {
        return 0.0;
    }
    sample.clamp(0.0, 1.0 - f64::EPSILON)
}

/// Source of jitter samples in `[0, 1)`.
pub trait JitterSource {
    fn sample(&mut self) -> f64;
}

/// Uniform jitter from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn sample(&mut self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

/// Constant jitter sample, for deterministic schedules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&mut self) -> f64 {
        self.0
    }
}
