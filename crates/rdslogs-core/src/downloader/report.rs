use std::path::PathBuf;

/// How one listed file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Name did not match the filter.
    Filtered,
    /// Local copy already had the remote size.
    UpToDate,
    Downloaded {
        path: PathBuf,
        bytes: u64,
        chunks: u64,
    },
    /// A chunk call ran out of attempts (or the name was unusable); the run went on.
    Failed { name: String },
}

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub listed: usize,
    pub downloaded: usize,
    pub filtered: usize,
    pub up_to_date: usize,
    pub failed: Vec<String>,
    pub bytes_written: u64,
}

impl FetchReport {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Filtered => self.filtered += 1,
            FileOutcome::UpToDate => self.up_to_date += 1,
            FileOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes_written += bytes;
            }
            FileOutcome::Failed { name } => self.failed.push(name.clone()),
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
