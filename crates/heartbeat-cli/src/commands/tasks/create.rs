//! Create task command implementation.

use anyhow::{Context, Result};
use clap::Args;

use heartbeat_core::{NewTask, Route, TaskApi};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Task title
    pub title: String,

    /// Optional longer description
    #[arg(long, short)]
    pub description: Option<String>,
}

pub async fn run(args: CreateArgs, api: Option<&str>) -> Result<()> {
    let session = CliSession::open(api)?;
    session.require_login(Route::Home)?;

    let mut new_task = NewTask::new(args.title);
    if let Some(description) = args.description {
        new_task = new_task.with_description(description);
    }

    let task = session
        .tasks()
        .create_task(&new_task)
        .await
        .context("Failed to create task")?;

    output::success(&format!("Created task {}", task.id));
    output::task_line(&task);

    Ok(())
}
