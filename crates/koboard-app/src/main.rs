//! Command-line entry point.

use clap::Parser;
use koboard_app::{Args, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    log::info!("Starting KoBoard");
    match run(&args) {
        Ok(summary) => {
            log::info!(
                "Board has {} nodes ({} records applied, {} dropped)",
                summary.nodes,
                summary.applied,
                summary.dropped
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("koboard: {}", e);
            ExitCode::FAILURE
        }
    }
}
