//! Chunked retrieval of one log file.
//!
//! `Downloading{marker, chunk_lines}` loops until the service says nothing is
//! pending. A truncated response is thrown away and the same marker is asked
//! for again with ten fewer lines; once the line count reaches its floor the
//! truncated text is kept instead. A chunk call that runs out of attempts
//! abandons the file.

use super::LogDownloader;
use crate::observe::FetchEvent;
use crate::retry::{run_with_retry, Exhausted};
use crate::service::LogService;
use crate::storage::LogFileWriter;
use anyhow::Result;

/// Lines removed from the request after each truncated response.
pub const SHRINK_STEP: u32 = 10;

/// How a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// Service reported no more data.
    Complete { chunks: u64 },
    /// A chunk call exhausted its retries.
    Exhausted(Exhausted),
}

/// Per-file state. Lives for one download.
#[derive(Debug)]
pub struct DownloadSession<'a> {
    file_name: &'a str,
    /// Opaque; only ever the value the service last returned (or "0").
    marker: String,
    chunk_lines: u32,
    min_lines: u32,
    more_data_pending: bool,
    chunks: u64,
}

impl<'a> DownloadSession<'a> {
    pub fn new(file_name: &'a str, initial_lines: u32, min_lines: u32) -> Self {
        Self {
            file_name,
            marker: "0".to_string(),
            chunk_lines: initial_lines,
            min_lines,
            more_data_pending: true,
            chunks: 0,
        }
    }

    pub fn chunk_lines(&self) -> u32 {
        self.chunk_lines
    }

    /// Shrink the request after a truncated response. Returns false when
    /// already at the floor, in which case the truncated data must be kept.
    fn shrink(&mut self) -> bool {
        if self.chunk_lines <= self.min_lines {
            return false;
        }
        self.chunk_lines = self
            .chunk_lines
            .saturating_sub(SHRINK_STEP)
            .max(self.min_lines);
        true
    }

    /// Request chunks in marker order and append them to `writer`.
    /// Storage errors propagate; remote exhaustion is returned as [`SessionEnd::Exhausted`].
    pub fn run<S: LogService + ?Sized>(
        mut self,
        dl: &LogDownloader<'_, S>,
        writer: &mut LogFileWriter,
    ) -> Result<SessionEnd> {
        let instance_id = dl.config.instance_id.as_str();
        let what = format!("download of {}", self.file_name);

        while self.more_data_pending {
            dl.observer.on_event(&FetchEvent::ChunkRequested {
                name: self.file_name,
                marker: &self.marker,
                chunk: self.chunks,
                lines: self.chunk_lines,
            });

            let marker = self.marker.as_str();
            let lines = self.chunk_lines;
            let outcome = run_with_retry(&dl.config.backoff, dl.sleeper, dl.observer, &what, || {
                dl.service
                    .download_log_chunk(instance_id, self.file_name, marker, lines)
            });
            let chunk = match outcome {
                Ok(chunk) => chunk,
                Err(exhausted) => return Ok(SessionEnd::Exhausted(exhausted)),
            };

            dl.observer.on_event(&FetchEvent::ChunkReceived {
                name: self.file_name,
                pending: chunk.more_pending(),
                marker: chunk.next_marker.as_deref(),
            });

            match chunk.data.as_deref() {
                Some(data) => {
                    if chunk.truncated() {
                        if self.shrink() {
                            dl.observer.on_event(&FetchEvent::ChunkTruncated {
                                name: self.file_name,
                                retry_lines: self.chunk_lines,
                            });
                            continue;
                        }
                        dl.observer.on_event(&FetchEvent::TruncationAccepted {
                            name: self.file_name,
                            lines: self.chunk_lines,
                        });
                    }
                    writer.append(data.as_bytes())?;
                }
                None => dl.observer.on_event(&FetchEvent::ChunkWithoutData {
                    name: self.file_name,
                    chunk: self.chunks,
                }),
            }

            self.more_data_pending = chunk.more_pending();
            if let Some(next) = chunk.next_marker {
                self.marker = next;
            }
            self.chunks += 1;
        }

        Ok(SessionEnd::Complete {
            chunks: self.chunks,
        })
    }
}
