//! Retry loop: run a closure until success or the attempt ceiling.

use super::error::Exhausted;
use super::policy::BackoffPolicy;
use super::sleep::Sleeper;
use crate::observe::{FetchEvent, Observer};
use crate::service::RemoteError;

/// Runs `f` until it succeeds or has failed `policy.max_attempts` times.
/// After failure `k` (0-based) sleeps `policy.delay(k)` and tries again; the
/// last failure returns [`Exhausted`] straight away.
pub fn run_with_retry<T, F>(
    policy: &BackoffPolicy,
    sleeper: &dyn Sleeper,
    observer: &dyn Observer,
    what: &str,
    mut f: F,
) -> Result<T, Exhausted>
where
    F: FnMut() -> Result<T, RemoteError>,
{
    let mut attempt = 0u32;
    let mut last_error = None;
    while !policy.exhausted(attempt) {
        match f() {
            Ok(v) => return Ok(v),
            Err(error) => {
                if policy.exhausted(attempt + 1) {
                    observer.on_event(&FetchEvent::RetriesExhausted {
                        what,
                        attempts: attempt + 1,
                        error: &error,
                    });
                } else {
                    let delay = policy.delay(attempt);
                    observer.on_event(&FetchEvent::RetryScheduled {
                        what,
                        attempt,
                        delay,
                        error: &error,
                    });
                    sleeper.sleep(delay);
                }
                last_error = Some(error);
                attempt += 1;
            }
        }
    }
    Err(Exhausted {
        what: what.to_string(),
        attempts: attempt,
        last_error,
    })
}
