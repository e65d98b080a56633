use std::process::ExitCode;

use clap::Parser;
use cdnfailover::cli::Cli;

fn main() -> ExitCode {
    match Cli::parse().execute() {
        Ok(code) => code,
        Err(error) => {
            cdnfailover::logger::error(&format!("{error:#}"));
            ExitCode::FAILURE
        }
    }
}
