//! In-memory `LogService` that replays scripted responses and records every call.

use rdslogs_core::observe::{FetchEvent, Observer};
use rdslogs_core::retry::Sleeper;
use rdslogs_core::service::{ChunkResult, LogFileDescriptor, LogService, RemoteError};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// One recorded chunk request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRequest {
    pub file: String,
    pub marker: String,
    pub lines: u32,
}

#[derive(Default)]
pub struct ScriptedService {
    listings: RefCell<VecDeque<Result<Vec<LogFileDescriptor>, RemoteError>>>,
    chunks: RefCell<HashMap<String, VecDeque<Result<ChunkResult, RemoteError>>>>,
    pub list_calls: RefCell<u32>,
    pub requests: RefCell<Vec<ChunkRequest>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(&self, files: &[(&str, u64)]) -> &Self {
        let files = files
            .iter()
            .map(|(name, size)| LogFileDescriptor {
                name: name.to_string(),
                size_bytes: *size,
            })
            .collect();
        self.listings.borrow_mut().push_back(Ok(files));
        self
    }

    pub fn listing_error(&self) -> &Self {
        self.listings
            .borrow_mut()
            .push_back(Err(RemoteError::new("DescribeDBLogFiles", "Throttling: Rate exceeded")));
        self
    }

    pub fn chunk(&self, file: &str, data: &str, marker: &str, pending: bool) -> &Self {
        self.push_chunk(
            file,
            Ok(ChunkResult {
                data: Some(data.to_string()),
                next_marker: Some(marker.to_string()),
                additional_data_pending: Some(pending),
            }),
        )
    }

    pub fn chunk_error(&self, file: &str) -> &Self {
        self.push_chunk(
            file,
            Err(RemoteError::new("DownloadDBLogFilePortion", "connection reset")),
        )
    }

    fn push_chunk(&self, file: &str, r: Result<ChunkResult, RemoteError>) -> &Self {
        self.chunks
            .borrow_mut()
            .entry(file.to_string())
            .or_default()
            .push_back(r);
        self
    }

    pub fn requests_for(&self, file: &str) -> Vec<ChunkRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.file == file)
            .cloned()
            .collect()
    }
}

impl LogService for ScriptedService {
    fn list_log_files(&self, _instance_id: &str) -> Result<Vec<LogFileDescriptor>, RemoteError> {
        *self.list_calls.borrow_mut() += 1;
        self.listings
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::new("DescribeDBLogFiles", "no scripted listing")))
    }

    fn download_log_chunk(
        &self,
        _instance_id: &str,
        file_name: &str,
        marker: &str,
        max_lines: u32,
    ) -> Result<ChunkResult, RemoteError> {
        self.requests.borrow_mut().push(ChunkRequest {
            file: file_name.to_string(),
            marker: marker.to_string(),
            lines: max_lines,
        });
        self.chunks
            .borrow_mut()
            .get_mut(file_name)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(RemoteError::new("DownloadDBLogFilePortion", "no scripted chunk")))
    }
}

/// Records sleeps instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper(pub RefCell<Vec<Duration>>);

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.0.borrow_mut().push(duration);
    }
}

/// Keeps a one-line rendering of every event.
#[derive(Default)]
pub struct EventLog(pub RefCell<Vec<String>>);

impl EventLog {
    pub fn contains(&self, needle: &str) -> bool {
        self.0.borrow().iter().any(|e| e.contains(needle))
    }
}

impl Observer for EventLog {
    fn on_event(&self, event: &FetchEvent<'_>) {
        self.0.borrow_mut().push(format!("{:?}", event));
    }
}
