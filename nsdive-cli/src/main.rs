//! nsdive CLI
//!
//! Temporarily adopt the Linux namespaces of another process and run a
//! command inside them.

use clap::Parser;
use std::process;
use tracing::Level;

mod cli;
mod enter;

use cli::Cli;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Handle errors
    if let Err(e) = enter::execute(&cli) {
        eprintln!("❌ Error: {e:#}");
        process::exit(1);
    }
}
