//! Terminal outcome of a retried call.

use crate::service::RemoteError;

/// The attempt ceiling was reached without a success. Not retryable at the call site.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{what} failed after {attempts} attempt(s)")]
pub struct Exhausted {
    pub what: String,
    pub attempts: u32,
    /// Error from the final attempt; `None` when the ceiling was zero and nothing ran.
    #[source]
    pub last_error: Option<RemoteError>,
}
