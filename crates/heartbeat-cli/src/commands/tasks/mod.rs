//! Task subcommand implementations.

mod create;
mod get;
mod list;
mod update;

use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct TasksCommand {
    #[command(subcommand)]
    pub command: TasksSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TasksSubcommand {
    /// List tasks
    List(list::ListArgs),

    /// Show a single task
    Get(get::GetArgs),

    /// Create a task
    Create(create::CreateArgs),

    /// Update a task
    Update(update::UpdateArgs),
}

pub async fn handle(cmd: TasksCommand, api: Option<&str>) -> Result<()> {
    match cmd.command {
        TasksSubcommand::List(args) => list::run(args, api).await,
        TasksSubcommand::Get(args) => get::run(args, api).await,
        TasksSubcommand::Create(args) => create::run(args, api).await,
        TasksSubcommand::Update(args) => update::run(args, api).await,
    }
}
