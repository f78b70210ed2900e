//! List tasks command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use heartbeat_core::{Page, Route, TaskBoard};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Number of tasks to skip
    #[arg(long)]
    pub skip: Option<u32>,

    /// Maximum number of tasks to return
    #[arg(long)]
    pub limit: Option<u32>,

    /// Print one JSON object per task
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, api: Option<&str>) -> Result<()> {
    let session = CliSession::open(api)?;
    session.require_login(Route::Home)?;

    let page = Page {
        skip: args.skip,
        limit: args.limit,
    };

    let mut board = TaskBoard::new(session.tasks());
    let tasks = board.refresh(page).await.context("Failed to list tasks")?;

    if tasks.is_empty() {
        eprintln!("{}", "No tasks found.".dimmed());
        return Ok(());
    }

    for task in tasks {
        if args.json {
            output::json(task)?;
        } else {
            output::task_line(task);
        }
    }

    Ok(())
}
