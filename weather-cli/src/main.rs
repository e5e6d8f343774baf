//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive prompts and configuration
//! - Human-friendly output

use clap::Parser;

mod cli;
mod logging;

#[tokio::main]
async fn main() {
    let cmd = cli::Cli::parse();
    logging::init(cmd.verbose);

    if let Err(err) = cmd.run().await {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}
