//! CLI parse and config-resolution tests.

use super::{Cli, RunStatus};
use clap::Parser;
use rdslogs_core::config::FileConfig;
use rdslogs_core::logging::Verbosity;
use rdslogs_core::region::Region;
use std::path::PathBuf;
use std::time::Duration;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_minimal() {
    let cli = parse(&["rdslogs", "-i", "prod-db-1"]);
    assert_eq!(cli.instance, "prod-db-1");
    assert_eq!(cli.output, PathBuf::from("./"));
    assert!(cli.region.is_none());
    assert!(cli.logfile_match.is_none());
    assert!(cli.lines.is_none());
    assert!(cli.backoff.is_none());
    assert_eq!(cli.verbosity(), Verbosity::Normal);
}

#[test]
fn cli_parse_all_flags() {
    let cli = parse(&[
        "rdslogs", "-d", "-i", "db", "-o", "/tmp/logs", "-r", "eu-central-1", "-m", "error/.*",
        "-l", "500", "-b", "4",
    ]);
    assert_eq!(cli.output, PathBuf::from("/tmp/logs"));
    assert_eq!(cli.region, Some(Region::EuCentral1));
    assert_eq!(cli.logfile_match.as_deref(), Some("error/.*"));
    assert_eq!(cli.lines, Some(500));
    assert_eq!(cli.backoff, Some(4));
    assert_eq!(cli.verbosity(), Verbosity::Debug);
}

#[test]
fn cli_parse_long_flags() {
    let cli = parse(&[
        "rdslogs", "--quiet", "--instance", "db", "--output", "out", "--region", "sa-east-1",
        "--match", "slow", "--lines", "50", "--backoff", "2", "--log-file", "run.log",
    ]);
    assert_eq!(cli.verbosity(), Verbosity::Quiet);
    assert_eq!(cli.region, Some(Region::SaEast1));
    assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
}

#[test]
fn cli_requires_instance() {
    assert!(Cli::try_parse_from(["rdslogs"]).is_err());
}

#[test]
fn cli_rejects_unknown_region() {
    assert!(Cli::try_parse_from(["rdslogs", "-i", "db", "-r", "us-east-2"]).is_err());
}

#[test]
fn cli_rejects_zero_lines_and_backoff() {
    assert!(Cli::try_parse_from(["rdslogs", "-i", "db", "-l", "0"]).is_err());
    assert!(Cli::try_parse_from(["rdslogs", "-i", "db", "-b", "0"]).is_err());
}

#[test]
fn fetch_config_defaults() {
    let cfg = parse(&["rdslogs", "-i", "db"])
        .fetch_config(&FileConfig::default())
        .unwrap();
    assert_eq!(cfg.instance_id, "db");
    assert_eq!(cfg.region, Region::UsEast1);
    assert_eq!(cfg.initial_lines, 1000);
    assert_eq!(cfg.backoff.max_attempts, 10);
    assert_eq!(cfg.backoff.unit, Duration::from_secs(1));
    assert!(cfg.name_filter.is_none());
}

#[test]
fn flags_override_file_config() {
    let file = FileConfig {
        region: Some(Region::ApSouth1),
        lines: Some(200),
        backoff: Some(3),
        backoff_unit_ms: Some(100),
    };
    let from_file = parse(&["rdslogs", "-i", "db"]).fetch_config(&file).unwrap();
    assert_eq!(from_file.region, Region::ApSouth1);
    assert_eq!(from_file.initial_lines, 200);
    assert_eq!(from_file.backoff.max_attempts, 3);
    assert_eq!(from_file.backoff.unit, Duration::from_millis(100));

    let from_flags = parse(&["rdslogs", "-i", "db", "-r", "us-west-2", "-l", "700", "-b", "6"])
        .fetch_config(&file)
        .unwrap();
    assert_eq!(from_flags.region, Region::UsWest2);
    assert_eq!(from_flags.initial_lines, 700);
    assert_eq!(from_flags.backoff.max_attempts, 6);
}

#[test]
fn zero_values_from_file_rejected() {
    let file = FileConfig {
        lines: Some(0),
        ..Default::default()
    };
    assert!(parse(&["rdslogs", "-i", "db"]).fetch_config(&file).is_err());
    let file = FileConfig {
        backoff: Some(0),
        ..Default::default()
    };
    assert!(parse(&["rdslogs", "-i", "db"]).fetch_config(&file).is_err());
}

#[test]
fn bad_match_pattern_rejected() {
    let err = parse(&["rdslogs", "-i", "db", "-m", "[a-"])
        .fetch_config(&FileConfig::default())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("--match"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let cli = parse(&[
        "rdslogs",
        "-i",
        "db",
        "--config",
        "/nonexistent/rdslogs/typo.toml",
    ]);
    let err = cli.load_file_config().unwrap_err();
    assert!(format!("{:#}", err).contains("typo.toml"));
}

#[test]
fn exit_codes() {
    assert_eq!(RunStatus::Complete.exit_code(), 0);
    assert_eq!(RunStatus::SomeFilesFailed.exit_code(), 2);
}
