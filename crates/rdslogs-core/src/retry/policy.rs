use std::time::Duration;

/// Exponential backoff without a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Failures allowed before giving up. Zero means the call is never made.
    pub max_attempts: u32,
    /// One "time unit" of the schedule; the k-th retry waits `unit * 2^k`.
    pub unit: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            unit: Duration::from_secs(1),
        }
    }
}

impl BackoffPolicy {
    pub fn new(max_attempts: u32, unit: Duration) -> Self {
        Self { max_attempts, unit }
    }

    /// Delay after the failure with 0-based index `attempt`. Saturates at `Duration::MAX`.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt >= u32::BITS {
            return Duration::MAX;
        }
        self.unit
            .checked_mul(1u32 << attempt)
            .unwrap_or(Duration::MAX)
    }

    /// True once `failures` has reached the ceiling.
    pub fn exhausted(&self, failures: u32) -> bool {
        failures >= self.max_attempts
    }
}
