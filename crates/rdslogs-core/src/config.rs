use crate::region::Region;
use crate::retry::BackoffPolicy;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LINES: u32 = 1000;
pub const DEFAULT_BACKOFF_ATTEMPTS: u32 = 10;
pub const DEFAULT_BACKOFF_UNIT_MS: u64 = 1000;

/// Optional defaults read from `~/.config/rdslogs/config.toml`.
/// Every key may be omitted; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub region: Option<Region>,
    /// Initial lines requested per chunk.
    pub lines: Option<u32>,
    /// Max backoff attempts per remote call.
    pub backoff: Option<u32>,
    /// Length of one backoff time unit in milliseconds (the k-th retry waits `unit * 2^k`).
    pub backoff_unit_ms: Option<u64>,
}

impl FileConfig {
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms.unwrap_or(DEFAULT_BACKOFF_UNIT_MS))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rdslogs")?;
    Ok(xdg_dirs.get_config_file("config.toml"))
}

/// Load the defaults file at `path`. The file must exist.
pub fn load_from(path: &Path) -> Result<FileConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: FileConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

/// Load the defaults file from the XDG config dir. No file there means empty defaults.
pub fn load_default() -> Result<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    load_from(&path)
}

/// Everything one run needs, resolved from flags and the defaults file.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub instance_id: String,
    pub region: Region,
    pub output_dir: PathBuf,
    /// Only names where this matches somewhere are downloaded.
    pub name_filter: Option<Regex>,
    pub initial_lines: u32,
    pub backoff: BackoffPolicy,
}

impl FetchConfig {
    pub fn new(instance_id: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            instance_id: instance_id.into(),
            region: Region::default(),
            output_dir: output_dir.into(),
            name_filter: None,
            initial_lines: DEFAULT_LINES,
            backoff: BackoffPolicy::new(
                DEFAULT_BACKOFF_ATTEMPTS,
                Duration::from_millis(DEFAULT_BACKOFF_UNIT_MS),
            ),
        }
    }

    /// Compile and set the name filter.
    pub fn with_name_filter(mut self, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)
            .with_context(|| format!("invalid --match pattern '{}'", pattern))?;
        self.name_filter = Some(re);
        Ok(self)
    }

    /// Regex search, not full match.
    pub fn wants(&self, name: &str) -> bool {
        self.name_filter.as_ref().map_or(true, |re| re.is_match(name))
    }

    /// Lowest line count truncation recovery may request: 10% of the initial
    /// count, rounded up, never below one line.
    pub fn min_lines(&self) -> u32 {
        self.initial_lines.div_ceil(10).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let cfg = FetchConfig::new("db-1", "./");
        assert_eq!(cfg.initial_lines, 1000);
        assert_eq!(cfg.backoff.max_attempts, 10);
        assert_eq!(cfg.backoff.unit, Duration::from_secs(1));
        assert_eq!(cfg.region, Region::UsEast1);
        assert!(cfg.wants("anything"));
    }

    #[test]
    fn filter_is_a_search() {
        let cfg = FetchConfig::new("db-1", "./")
            .with_name_filter(r"2024-05-0\d")
            .unwrap();
        assert!(cfg.wants("error/postgresql.log.2024-05-01-10"));
        assert!(!cfg.wants("error/postgresql.log.2024-06-01-10"));
    }

    #[test]
    fn invalid_filter_rejected() {
        let err = FetchConfig::new("db-1", "./")
            .with_name_filter("(unclosed")
            .unwrap_err();
        assert!(format!("{:#}", err).contains("(unclosed"));
    }

    #[test]
    fn min_lines_is_ten_percent() {
        let mut cfg = FetchConfig::new("db-1", "./");
        assert_eq!(cfg.min_lines(), 100);
        cfg.initial_lines = 100;
        assert_eq!(cfg.min_lines(), 10);
        cfg.initial_lines = 105;
        assert_eq!(cfg.min_lines(), 11);
        cfg.initial_lines = 5;
        assert_eq!(cfg.min_lines(), 1);
    }

    #[test]
    fn config_toml_values() {
        let toml = r#"
            region = "eu-west-1"
            lines = 500
            backoff = 4
            backoff_unit_ms = 250
        "#;
        let cfg: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.region, Some(Region::EuWest1));
        assert_eq!(cfg.lines, Some(500));
        assert_eq!(cfg.backoff, Some(4));
        assert_eq!(cfg.backoff_unit(), Duration::from_millis(250));
    }

    #[test]
    fn config_toml_empty_and_bad_region() {
        let cfg: FileConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, FileConfig::default());
        assert_eq!(cfg.backoff_unit(), Duration::from_secs(1));
        assert!(toml::from_str::<FileConfig>(r#"region = "xx-nowhere-1""#).is_err());
        assert!(toml::from_str::<FileConfig>("colour = true").is_err());
    }

    #[test]
    fn load_from_requires_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("typo.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("typo.toml"));
        let path = dir.path().join("config.toml");
        fs::write(&path, "lines = 200\n").unwrap();
        assert_eq!(load_from(&path).unwrap().lines, Some(200));
    }
}
