//! `meta-init` binary entry point.
use std::process::ExitCode;

use clap::Parser;

use meta_init::cli::Cli;
use meta_init::commands;
use meta_init::logging::{self, Logger};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose, args.log_file.as_deref());
    let log = Logger::new(args.log_file.clone());

    let result = args
        .apply_opts()
        .and_then(|opts| commands::apply::run(&opts, &log));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
