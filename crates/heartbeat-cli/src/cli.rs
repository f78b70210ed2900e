//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::tasks::TasksCommand;

/// Command-line client for the HeartBeat task API.
#[derive(Parser, Debug)]
#[command(name = "heartbeat")]
#[command(author, version = env!("HEARTBEAT_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Backend base URL (defaults to the one used at login, then http://127.0.0.1:8000)
    #[arg(long, env = "HEARTBEAT_API", global = true)]
    pub api: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in, register and manage the stored session
    Auth(AuthCommand),

    /// List, view, create and update tasks
    Tasks(TasksCommand),
}
