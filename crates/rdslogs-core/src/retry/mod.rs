//! Retry and backoff.
//!
//! One exponential schedule shared by the listing call and every chunk call:
//! sleep `unit * 2^k` after the k-th failure (0-based), give up after
//! `max_attempts` failures. The delay is never capped; the attempt ceiling is
//! the only bound.

mod error;
mod policy;
mod run;
mod sleep;

pub use error::Exhausted;
pub use policy::BackoffPolicy;
pub use run::run_with_retry;
pub use sleep::{Sleeper, ThreadSleeper};
