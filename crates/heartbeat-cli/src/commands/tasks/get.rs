//! Get task command implementation.

use anyhow::{Context, Result};
use clap::Args;

use heartbeat_core::{Route, TaskApi, TaskId};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Task ID
    pub id: TaskId,

    /// Print the task as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: GetArgs, api: Option<&str>) -> Result<()> {
    let session = CliSession::open(api)?;
    session.require_login(Route::TaskDetail(args.id))?;

    let task = session
        .tasks()
        .get_task(args.id)
        .await
        .with_context(|| format!("Failed to fetch task {}", args.id))?;

    if args.json {
        output::json_pretty(&task)?;
    } else {
        output::task(&task);
    }

    Ok(())
}
