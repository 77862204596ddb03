//! Diagnostic events emitted by the retrier and the downloader.
//!
//! The core never logs directly; it hands each event to an [`Observer`]. The
//! CLI installs [`TracingObserver`], tests install a recorder.

use crate::service::RemoteError;
use std::path::Path;
use std::time::Duration;

/// Something worth reporting while fetching logs.
#[derive(Debug)]
pub enum FetchEvent<'a> {
    /// A remote call failed; the retrier sleeps `delay` before trying again.
    RetryScheduled {
        what: &'a str,
        attempt: u32,
        delay: Duration,
        error: &'a RemoteError,
    },
    /// A remote call failed for the last time allowed.
    RetriesExhausted {
        what: &'a str,
        attempts: u32,
        error: &'a RemoteError,
    },
    ListingFailed { instance: &'a str },
    FileListed { name: &'a str, size_bytes: u64 },
    /// Name did not match the configured filter.
    FileFiltered { name: &'a str },
    /// Remote name has no base name to save it under.
    NoBaseName { name: &'a str },
    /// Local copy already has the remote size.
    FileUpToDate { name: &'a str },
    /// Local copy exists with a different size and is about to be replaced.
    SizeMismatch {
        name: &'a str,
        local_bytes: u64,
        remote_bytes: u64,
    },
    ChunkRequested {
        name: &'a str,
        marker: &'a str,
        chunk: u64,
        lines: u32,
    },
    ChunkReceived {
        name: &'a str,
        pending: bool,
        marker: Option<&'a str>,
    },
    /// Truncated response discarded; the same marker is requested with fewer lines.
    ChunkTruncated { name: &'a str, retry_lines: u32 },
    /// Truncated response kept because the line count is at its floor.
    TruncationAccepted { name: &'a str, lines: u32 },
    ChunkWithoutData { name: &'a str, chunk: u64 },
    FileCompleted {
        name: &'a str,
        path: &'a Path,
        bytes: u64,
        chunks: u64,
    },
    FileAbandoned { name: &'a str, path: &'a Path },
    /// A partial file could not be removed and is still on disk.
    CleanupFailed {
        path: &'a Path,
        error: &'a anyhow::Error,
    },
}

/// Sink for [`FetchEvent`]s.
pub trait Observer {
    fn on_event(&self, event: &FetchEvent<'_>);
}

/// Forwards events to `tracing` at the level each one deserves.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&self, event: &FetchEvent<'_>) {
        match event {
            FetchEvent::RetryScheduled {
                what,
                attempt,
                delay,
                error,
            } => tracing::warn!(
                "sleep #{} ({:.3} seconds) due to failure in {}: {}",
                attempt,
                delay.as_secs_f64(),
                what,
                error
            ),
            FetchEvent::RetriesExhausted {
                what,
                attempts,
                error,
            } => tracing::warn!("{} failed {} time(s), giving up: {}", what, attempts, error),
            FetchEvent::ListingFailed { instance } => {
                tracing::error!("Error describing log files for instance: {}", instance)
            }
            FetchEvent::FileListed { name, size_bytes } => {
                tracing::debug!("listed {} ({} bytes)", name, size_bytes)
            }
            FetchEvent::FileFiltered { name } => tracing::info!("Skipping {}", name),
            FetchEvent::NoBaseName { name } => {
                tracing::error!("cannot derive a local file name from {:?}, skipping", name)
            }
            FetchEvent::FileUpToDate { name } => {
                tracing::info!("File {} exists, skipping", name)
            }
            FetchEvent::SizeMismatch {
                name,
                local_bytes,
                remote_bytes,
            } => {
                tracing::info!(
                    "Log file {} exists, but size does not match, redownloading.",
                    name
                );
                tracing::info!(
                    "Local files size {} expected size:{}",
                    local_bytes,
                    remote_bytes
                );
            }
            FetchEvent::ChunkRequested {
                name,
                marker,
                chunk,
                lines,
            } => tracing::info!(
                "requesting {} marker:{} chunk:{} lines:{}",
                name,
                marker,
                chunk,
                lines
            ),
            FetchEvent::ChunkReceived {
                name,
                pending,
                marker,
            } => tracing::info!(
                "{} AdditionalDataPending:{} Marker:{}",
                name,
                pending,
                marker.unwrap_or("-")
            ),
            FetchEvent::ChunkTruncated { name, retry_lines } => {
                tracing::info!("Log segment was truncated");
                tracing::info!("retrying {} with {} lines", name, retry_lines);
            }
            FetchEvent::TruncationAccepted { name, lines } => tracing::warn!(
                "Log segment of {} truncated at the {} line floor, keeping it",
                name,
                lines
            ),
            FetchEvent::ChunkWithoutData { name, chunk } => {
                tracing::error!("No LogFileData for file:{} (chunk {})", name, chunk)
            }
            FetchEvent::FileCompleted {
                name,
                path,
                bytes,
                chunks,
            } => tracing::info!(
                "downloaded {} to {} ({} bytes in {} chunk(s))",
                name,
                path.display(),
                bytes,
                chunks
            ),
            FetchEvent::FileAbandoned { name, path } => {
                tracing::error!(
                    "Error downloading file:{} - too many errors from AWS",
                    name
                );
                tracing::debug!("removed partial file {}", path.display());
            }
            FetchEvent::CleanupFailed { path, error } => {
                tracing::warn!("partial file {} left on disk: {:#}", path.display(), error)
            }
        }
    }
}
