//! Retrying call executor.
//!
//! Wraps one fallible network operation, classifies each failure as a client
//! error or a transient failure, and retries transient failures with
//! exponential backoff plus jitter until the retry budget runs out.
//!
//! The policy is an immutable value passed at the call site. Jitter and
//! sleeping are injected so tests can run the loop deterministically.

mod classify;
mod policy;
mod run;

pub use classify::{ClassifiedFailure, Classify, FailureKind};
pub use policy::{FixedJitter, JitterSource, RandomJitter, RetryDecision, RetryPolicy};
pub use run::{with_retry, RetryExecutor, RetryOutcome, Sleeper, ThreadSleeper};
