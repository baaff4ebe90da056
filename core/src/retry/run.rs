//! Retry loop: run a closure until success, a client error, or an exhausted
//! retry budget.

use std::fmt::Display;
use std::time::Duration;

use tracing::{error, warn};

use super::classify::Classify;
use super::policy::{JitterSource, RandomJitter, RetryDecision, RetryPolicy};

/// Blocks the caller between attempts.
pub trait Sleeper {
    fn sleep(&mut self, delay: Duration);
}

/// Sleeps on the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
    fn sleep(&mut self, delay: Duration) {
        (**self).sleep(delay);
    }
}

/// Result of an executor run together with what it took to get there.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    /// Calls made to the operation, including the first.
    pub attempts: u32,
    /// Waits performed before each retry, in order.
    pub delays: Vec<Duration>,
}

/// Runs an operation under a `RetryPolicy`.
///
/// Client errors (HTTP 400-499, or any other non-5xx status) are returned
/// after a single attempt. Transient failures are retried up to `max_retries` times; once the budget is spent
/// the last failure is returned unchanged.
#[derive(Debug, Clone)]
pub struct RetryExecutor<J = RandomJitter, S = ThreadSleeper> {
    policy: RetryPolicy,
    jitter: J,
    sleeper: S,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_parts(policy, RandomJitter, ThreadSleeper)
    }
}

impl<J, S> RetryExecutor<J, S> {
    pub fn with_parts(policy: RetryPolicy, jitter: J, sleeper: S) -> Self {
        Self {
            policy,
            jitter,
            sleeper,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }
}

impl<J: JitterSource, S: Sleeper> RetryExecutor<J, S> {
    /// Run `f`, retrying transient failures. `operation` names the call in
    /// diagnostics.
    pub fn run<T, E, F>(&mut self, operation: &str, f: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Classify + Display,
    {
        self.run_with_outcome(operation, f).result
    }

    pub fn run_with_outcome<T, E, F>(&mut self, operation: &str, mut f: F) -> RetryOutcome<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Classify + Display,
    {
        let mut retries = 0u32;
        let mut delays = Vec::new();
        loop {
            match f() {
                Ok(value) => {
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: retries + 1,
                        delays,
                    }
                }
                Err(e) => {
                    let kind = e.failure_kind();
                    match self.policy.decide(retries, kind, self.jitter.sample()) {
                        RetryDecision::NoRetry => {
                            error!(
                                operation,
                                status = ?e.status_code(),
                                attempts = retries + 1,
                                error = %e,
                                "call failed permanently"
                            );
                            return RetryOutcome {
                                result: Err(e),
                                attempts: retries + 1,
                                delays,
                            };
                        }
                        RetryDecision::RetryAfter(delay) => {
                            retries += 1;
                            warn!(
                                operation,
                                attempt = retries,
                                max_retries = self.policy.max_retries,
                                delay_ms = delay.as_millis() as u64,
                                error = %e,
                                "transient failure, retrying"
                            );
                            self.sleeper.sleep(delay);
                            delays.push(delay);
                        }
                    }
                }
            }
        }
    }
}

/// Run `f` under `policy` with random jitter, sleeping on the current thread.
pub fn with_retry<T, E, F>(policy: &RetryPolicy, operation: &str, f: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Classify + Display,
{
    RetryExecutor::new(*policy).run(operation, f)
}
