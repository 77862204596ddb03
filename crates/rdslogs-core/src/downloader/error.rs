use crate::retry::Exhausted;

/// Failures that end a whole run. Per-file exhaustion is not one of them; it
/// is reported as [`FileOutcome::Failed`](super::FileOutcome::Failed).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The listing call ran out of attempts.
    #[error("could not list log files for instance {instance}")]
    Listing {
        instance: String,
        #[source]
        source: Exhausted,
    },
    /// Local file system failure (output dir, destination file).
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
