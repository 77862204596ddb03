//! Log file downloader.
//!
//! Lists the instance's log files (through the retrier), then walks them in
//! order: filter by name, skip local copies that already have the remote size,
//! and fetch the rest chunk by chunk (see [`session`]). Only a failed listing
//! ends the run early; a file whose chunk calls run out of attempts is
//! reported and the next file is tried.

mod error;
mod report;
pub mod session;

pub use error::FetchError;
pub use report::{FetchReport, FileOutcome};
pub use session::{DownloadSession, SessionEnd};

use crate::config::FetchConfig;
use crate::observe::{FetchEvent, Observer};
use crate::retry::{run_with_retry, Sleeper};
use crate::service::{LogFileDescriptor, LogService};
use crate::storage::{self, LocalState, LogFileWriter};
use std::path::Path;

/// Everything a run needs, borrowed for its duration.
pub struct LogDownloader<'a, S: LogService + ?Sized> {
    pub(crate) service: &'a S,
    pub(crate) config: &'a FetchConfig,
    pub(crate) sleeper: &'a dyn Sleeper,
    pub(crate) observer: &'a dyn Observer,
}

impl<'a, S: LogService + ?Sized> LogDownloader<'a, S> {
    pub fn new(
        service: &'a S,
        config: &'a FetchConfig,
        sleeper: &'a dyn Sleeper,
        observer: &'a dyn Observer,
    ) -> Self {
        Self {
            service,
            config,
            sleeper,
            observer,
        }
    }

    /// List, then process every file in listing order.
    pub fn run(&self) -> Result<FetchReport, FetchError> {
        storage::ensure_output_dir(&self.config.output_dir)?;
        let files = self.list()?;

        let mut report = FetchReport {
            listed: files.len(),
            ..Default::default()
        };
        for file in &files {
            let outcome = self.fetch_file(file)?;
            report.record(&outcome);
        }
        Ok(report)
    }

    /// The listing call, retried. Exhaustion is fatal for the run.
    pub fn list(&self) -> Result<Vec<LogFileDescriptor>, FetchError> {
        let instance = self.config.instance_id.as_str();
        let files = run_with_retry(
            &self.config.backoff,
            self.sleeper,
            self.observer,
            "listing of log files",
            || self.service.list_log_files(instance),
        )
        .map_err(|source| {
            self.observer
                .on_event(&FetchEvent::ListingFailed { instance });
            FetchError::Listing {
                instance: instance.to_string(),
                source,
            }
        })?;

        for f in &files {
            self.observer.on_event(&FetchEvent::FileListed {
                name: &f.name,
                size_bytes: f.size_bytes,
            });
        }
        Ok(files)
    }

    /// Filter, skip check, then download one file.
    pub fn fetch_file(&self, file: &LogFileDescriptor) -> Result<FileOutcome, FetchError> {
        let name = file.name.as_str();
        if !self.config.wants(name) {
            self.observer.on_event(&FetchEvent::FileFiltered { name });
            return Ok(FileOutcome::Filtered);
        }

        let Some(dest) = storage::destination_path(&self.config.output_dir, name) else {
            self.observer.on_event(&FetchEvent::NoBaseName { name });
            return Ok(FileOutcome::Failed {
                name: name.to_string(),
            });
        };

        match storage::local_state(&dest, file.size_bytes)? {
            LocalState::Missing => {}
            LocalState::UpToDate => {
                self.observer.on_event(&FetchEvent::FileUpToDate { name });
                return Ok(FileOutcome::UpToDate);
            }
            LocalState::SizeMismatch { local_bytes } => {
                self.observer.on_event(&FetchEvent::SizeMismatch {
                    name,
                    local_bytes,
                    remote_bytes: file.size_bytes,
                });
                storage::remove_stale(&dest)?;
            }
        }

        let mut writer = LogFileWriter::create(&dest)?;
        let session =
            DownloadSession::new(name, self.config.initial_lines, self.config.min_lines());
        let end = match session.run(self, &mut writer) {
            Ok(end) => end,
            Err(e) => {
                discard_partial(writer, &dest, self.observer);
                return Err(e.into());
            }
        };

        match end {
            SessionEnd::Complete { chunks } => {
                let bytes = writer.finish()?;
                self.observer.on_event(&FetchEvent::FileCompleted {
                    name,
                    path: &dest,
                    bytes,
                    chunks,
                });
                Ok(FileOutcome::Downloaded {
                    path: dest,
                    bytes,
                    chunks,
                })
            }
            SessionEnd::Exhausted(_) => {
                writer.discard()?;
                self.observer
                    .on_event(&FetchEvent::FileAbandoned { name, path: &dest });
                Ok(FileOutcome::Failed {
                    name: name.to_string(),
                })
            }
        }
    }
}

/// Remove a partial file on the way out of a failed run. The run's own error
/// wins; a cleanup failure is only reported.
fn discard_partial(writer: LogFileWriter, path: &Path, observer: &dyn Observer) {
    if let Err(error) = writer.discard() {
        observer.on_event(&FetchEvent::CleanupFailed {
            path,
            error: &error,
        });
    }
}
