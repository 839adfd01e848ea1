// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! hoyo-history CLI
//!
//! Command-line interface for printing wish and transaction histories

use clap::Parser;
use hoyo_history::cli::{Cli, Runner};
use hoyo_history::LogLevel;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::from(level).into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        if e.is_auth_error() {
            eprintln!("Error: {e} (the authkey may have expired)");
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}
