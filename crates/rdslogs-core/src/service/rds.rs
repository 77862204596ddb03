//! Amazon RDS backend for [`LogService`].
//!
//! The SDK is async; this type owns a current-thread runtime and blocks on
//! each call so the downloader keeps exactly one request in flight.

use super::{ChunkResult, LogFileDescriptor, LogService, RemoteError};
use crate::region::Region;
use anyhow::{Context, Result};
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::Client;
use tokio::runtime::Runtime;

const DESCRIBE: &str = "DescribeDBLogFiles";
const DOWNLOAD: &str = "DownloadDBLogFilePortion";

/// RDS client plus the runtime it is driven on.
pub struct RdsLogService {
    client: Client,
    runtime: Runtime,
}

impl RdsLogService {
    /// Build a client for `region` with credentials from the default provider chain.
    pub fn connect(region: Region) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start runtime for the RDS client")?;
        let sdk_config = runtime.block_on(
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_sdk_rds::config::Region::new(region.code()))
                .load(),
        );
        tracing::debug!(region = %region, "RDS client ready");
        Ok(Self {
            client: Client::new(&sdk_config),
            runtime,
        })
    }
}

impl LogService for RdsLogService {
    /// Lists every log file, following the listing marker until the service stops returning one.
    fn list_log_files(&self, instance_id: &str) -> Result<Vec<LogFileDescriptor>, RemoteError> {
        let mut files = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let out = self
                .runtime
                .block_on(
                    self.client
                        .describe_db_log_files()
                        .db_instance_identifier(instance_id)
                        .set_marker(marker.take())
                        .send(),
                )
                .map_err(|e| RemoteError::new(DESCRIBE, DisplayErrorContext(&e).to_string()))?;

            for detail in out.describe_db_log_files() {
                let Some(name) = detail.log_file_name() else {
                    continue;
                };
                files.push(LogFileDescriptor {
                    name: name.to_string(),
                    size_bytes: detail.size().unwrap_or(0).max(0) as u64,
                });
            }

            match out.marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }
        Ok(files)
    }

    fn download_log_chunk(
        &self,
        instance_id: &str,
        file_name: &str,
        marker: &str,
        max_lines: u32,
    ) -> Result<ChunkResult, RemoteError> {
        let out = self
            .runtime
            .block_on(
                self.client
                    .download_db_log_file_portion()
                    .db_instance_identifier(instance_id)
                    .log_file_name(file_name)
                    .marker(marker)
                    .number_of_lines(i32::try_from(max_lines).unwrap_or(i32::MAX))
                    .send(),
            )
            .map_err(|e| RemoteError::new(DOWNLOAD, DisplayErrorContext(&e).to_string()))?;

        Ok(ChunkResult {
            data: out.log_file_data().map(str::to_string),
            next_marker: out.marker().map(str::to_string),
            additional_data_pending: out.additional_data_pending(),
        })
    }
}
