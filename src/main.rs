use std::process::ExitCode;

use clap::Parser;
use html_mailer::{init_logging, run, Cli, InputInterrupted};
use log::error;

/// Conventional status for a process stopped by Ctrl+C
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_handle = match init_logging(cli.log_level.into()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Unexpected error: {e:?}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<InputInterrupted>().is_some() => {
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            error!("{e:?}");
            eprintln!("Unexpected error: {e:?}");
            ExitCode::FAILURE
        }
    }
}
