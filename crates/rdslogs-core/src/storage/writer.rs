//! Sequential append writer for one destination log file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination file opened for one download. Chunks are appended in the order
/// they arrive; the file is closed when the writer is finished, discarded, or dropped.
pub struct LogFileWriter {
    out: BufWriter<File>,
    path: PathBuf,
    bytes_written: u64,
}

impl LogFileWriter {
    /// Create (or truncate) the destination.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
            bytes_written: 0,
        })
    }

    pub fn append(&mut self, data: &[u8]) -> Result<()> {
        self.out
            .write_all(data)
            .with_context(|| format!("write to {} failed", self.path.display()))?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    #[cfg(test)]
    fn from_file_and_path(file: File, path: &Path) -> Self {
        Self {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
            bytes_written: 0,
        }
    }

    /// Flush buffered data and close the file. Returns the bytes written.
    /// A failed flush removes the file so a short copy is never left behind.
    pub fn finish(mut self) -> Result<u64> {
        if let Err(e) = self.out.flush() {
            let err = anyhow::Error::new(e)
                .context(format!("flush of {} failed", self.path.display()));
            return match self.discard() {
                Ok(()) => Err(err),
                Err(cleanup) => Err(err.context(format!("{:#}", cleanup))),
            };
        }
        Ok(self.bytes_written)
    }

    /// Close and delete the file; used when a download is abandoned part way.
    pub fn discard(self) -> Result<()> {
        let path = self.path.clone();
        drop(self.out);
        std::fs::remove_file(&path)
            .with_context(|| format!("failed to remove partial file {}", path.display()))
    }
}
