//! CLI for rdslogs.

use anyhow::{Context, Result};
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::Parser;
use rdslogs_core::config::{
    self, FetchConfig, FileConfig, DEFAULT_BACKOFF_ATTEMPTS, DEFAULT_LINES,
};
use rdslogs_core::downloader::{FetchReport, LogDownloader};
use rdslogs_core::logging::Verbosity;
use rdslogs_core::observe::TracingObserver;
use rdslogs_core::region::{Region, REGION_CODES};
use rdslogs_core::retry::{BackoffPolicy, ThreadSleeper};
use rdslogs_core::service::RdsLogService;
use std::path::PathBuf;

/// Download RDS instance log files, chunk by chunk, with backoff on throttling.
#[derive(Debug, Parser)]
#[command(name = "rdslogs", version)]
#[command(about = "Download the log files of an RDS database instance", long_about = None)]
pub struct Cli {
    /// Turn on debug logging.
    #[arg(short, long)]
    pub debug: bool,

    /// Turn off all logging except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// DB instance identifier.
    #[arg(short, long, value_name = "ID")]
    pub instance: String,

    /// Output directory; created if it does not exist.
    #[arg(short, long, value_name = "DIR", default_value = "./")]
    pub output: PathBuf,

    /// AWS region [default: us-east-1].
    #[arg(
        short,
        long,
        value_parser = PossibleValuesParser::new(REGION_CODES).try_map(|s| s.parse::<Region>())
    )]
    pub region: Option<Region>,

    /// Only download logs whose name matches this regular expression (searched, not anchored).
    #[arg(short = 'm', long = "match", value_name = "REGEX")]
    pub logfile_match: Option<String>,

    /// Initial number of lines to request per chunk; reduced when logs get truncated [default: 1000].
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub lines: Option<u32>,

    /// Max times to sleep with exponential backoff due to throttling [default: 10].
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub backoff: Option<u32>,

    /// Defaults file (region, lines, backoff, backoff_unit_ms) [default: ~/.config/rdslogs/config.toml].
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append log output to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// How a run ended, for the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Complete,
    SomeFilesFailed,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Complete => 0,
            RunStatus::SomeFilesFailed => 2,
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.debug, self.quiet)
    }

    /// Flags first, then the defaults file, then built-in defaults.
    pub fn fetch_config(&self, file: &FileConfig) -> Result<FetchConfig> {
        let mut cfg = FetchConfig::new(self.instance.clone(), self.output.clone());
        cfg.region = self.region.or(file.region).unwrap_or_default();
        cfg.initial_lines = self.lines.or(file.lines).unwrap_or(DEFAULT_LINES);
        cfg.backoff = BackoffPolicy::new(
            self.backoff.or(file.backoff).unwrap_or(DEFAULT_BACKOFF_ATTEMPTS),
            file.backoff_unit(),
        );
        if cfg.initial_lines == 0 {
            anyhow::bail!("lines must be at least 1");
        }
        if cfg.backoff.max_attempts == 0 {
            anyhow::bail!("backoff must be at least 1");
        }
        match &self.logfile_match {
            Some(pattern) => cfg.with_name_filter(pattern),
            None => Ok(cfg),
        }
    }

    /// An explicit `--config` must exist; the XDG default is optional.
    fn load_file_config(&self) -> Result<FileConfig> {
        match &self.config {
            Some(path) => config::load_from(path),
            None => config::load_default(),
        }
    }

    pub fn run(&self) -> Result<RunStatus> {
        let file_cfg = self.load_file_config()?;
        let cfg = self.fetch_config(&file_cfg)?;
        tracing::debug!("resolved config: {:?}", cfg);

        let service = RdsLogService::connect(cfg.region)?;
        let report = LogDownloader::new(&service, &cfg, &ThreadSleeper, &TracingObserver)
            .run()
            .with_context(|| format!("instance {}", cfg.instance_id))?;

        log_summary(&report);
        Ok(if report.all_succeeded() {
            RunStatus::Complete
        } else {
            RunStatus::SomeFilesFailed
        })
    }
}

fn log_summary(report: &FetchReport) {
    tracing::info!(
        "{} listed, {} downloaded ({} bytes), {} already present, {} filtered, {} failed",
        report.listed,
        report.downloaded,
        report.bytes_written,
        report.up_to_date,
        report.filtered,
        report.failed.len()
    );
    for name in &report.failed {
        tracing::error!("not downloaded: {}", name);
    }
}

#[cfg(test)]
mod tests;
