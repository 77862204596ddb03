//! Local side of a download: output directory, destination paths, the
//! size-based skip check, and the sequential file writer.

mod writer;

pub use writer::LogFileWriter;

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Create the output directory (and parents) if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))
}

/// Output dir joined with the base name of the remote file; directory parts of
/// the remote name are dropped. `None` when the name has no usable base name.
pub fn destination_path(output_dir: &Path, remote_name: &str) -> Option<PathBuf> {
    let base = remote_name.rsplit('/').next()?;
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(output_dir.join(base))
}

/// What to do with a destination given the remote size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalState {
    /// Nothing there yet.
    Missing,
    /// Same size as the remote file; treated as already downloaded.
    UpToDate,
    /// Present with a different size; must be replaced.
    SizeMismatch { local_bytes: u64 },
}

/// Compare an existing destination file against the remote size.
pub fn local_state(path: &Path, remote_bytes: u64) -> Result<LocalState> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() == remote_bytes => Ok(LocalState::UpToDate),
        Ok(meta) => Ok(LocalState::SizeMismatch {
            local_bytes: meta.len(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(LocalState::Missing),
        Err(e) => Err(e).with_context(|| format!("failed to stat {}", path.display())),
    }
}

/// Delete a stale destination file. Already gone is fine.
pub fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
    }
}
