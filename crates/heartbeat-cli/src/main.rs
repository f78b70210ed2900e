//! heartbeat - command-line client for the HeartBeat task API.
//!
//! Credentials persist between invocations, so an expired access token is
//! refreshed transparently on the next command. When the session cannot be
//! recovered the stored credentials are wiped and the user is asked to log
//! in again.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, tasks};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let api = cli.api.as_deref();
    match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, api).await,
        Commands::Tasks(cmd) => tasks::handle(cmd, api).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output stays pipeable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
