use clap::Parser;
use rdslogs_core::logging;

mod cli;

use crate::cli::{Cli, RunStatus};

fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible; fall back to stderr if the log file is unusable.
    let verbosity = cli.verbosity();
    if let Err(err) = logging::init_logging(verbosity, cli.log_file.as_deref()) {
        logging::init_logging_stderr(verbosity);
        tracing::warn!("{:#}; logging to stderr", err);
    }

    match cli.run() {
        Ok(RunStatus::Complete) => {}
        Ok(status) => std::process::exit(status.exit_code()),
        Err(err) => {
            eprintln!("rdslogs error: {:#}", err);
            std::process::exit(1);
        }
    }
}
