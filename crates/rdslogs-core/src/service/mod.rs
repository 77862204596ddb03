//! Remote log service: listing log files and fetching them chunk by chunk.
//!
//! [`LogService`] is the seam between the downloader and the network. The
//! production implementation is [`RdsLogService`]; tests script their own.

mod rds;

pub use rds::RdsLogService;

/// Any failure talking to the log service (transport, throttling, service fault).
/// Always retryable up to the configured attempt ceiling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation}: {message}")]
pub struct RemoteError {
    pub operation: &'static str,
    pub message: String,
}

impl RemoteError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// One remote log file as reported by the listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileDescriptor {
    /// Remote name; may contain directory components (e.g. `error/postgresql.log.2024-01-01-00`).
    pub name: String,
    pub size_bytes: u64,
}

/// Sentinel the service appends when it cut a response short.
pub const TRUNCATION_SENTINEL: &str = "[Your log message was truncated]\n";

/// One response to a chunk request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkResult {
    pub data: Option<String>,
    /// Continuation token for the next request; opaque.
    pub next_marker: Option<String>,
    pub additional_data_pending: Option<bool>,
}

impl ChunkResult {
    /// True when the data ends with the service's truncation sentinel.
    pub fn truncated(&self) -> bool {
        self.data
            .as_deref()
            .is_some_and(|d| d.ends_with(TRUNCATION_SENTINEL))
    }

    /// Absent flag means no more data.
    pub fn more_pending(&self) -> bool {
        self.additional_data_pending.unwrap_or(false)
    }
}

/// The two remote operations the downloader needs.
pub trait LogService {
    fn list_log_files(&self, instance_id: &str) -> Result<Vec<LogFileDescriptor>, RemoteError>;

    fn download_log_chunk(
        &self,
        instance_id: &str,
        file_name: &str,
        marker: &str,
        max_lines: u32,
    ) -> Result<ChunkResult, RemoteError>;
}
