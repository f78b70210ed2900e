//! Update task command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use heartbeat_core::{Route, TaskApi, TaskId, TaskUpdate};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Task ID
    pub id: TaskId,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long, short)]
    pub description: Option<String>,

    /// Mark the task active
    #[arg(long, conflicts_with = "done")]
    pub active: bool,

    /// Mark the task done
    #[arg(long)]
    pub done: bool,
}

impl UpdateArgs {
    fn to_update(&self) -> TaskUpdate {
        let is_active = match (self.active, self.done) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        TaskUpdate {
            title: self.title.clone(),
            description: self.description.clone(),
            is_active,
        }
    }
}

pub async fn run(args: UpdateArgs, api: Option<&str>) -> Result<()> {
    let update = args.to_update();
    if update.is_empty() {
        bail!("Nothing to update. Pass --title, --description, --active or --done.");
    }

    let session = CliSession::open(api)?;
    session.require_login(Route::TaskDetail(args.id))?;

    let task = session
        .tasks()
        .update_task(args.id, &update)
        .await
        .with_context(|| format!("Failed to update task {}", args.id))?;

    output::success(&format!("Updated task {}", task.id));
    output::task_line(&task);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(active: bool, done: bool) -> UpdateArgs {
        UpdateArgs {
            id: TaskId::new(1),
            title: None,
            description: None,
            active,
            done,
        }
    }

    #[test]
    fn done_flag_deactivates() {
        assert_eq!(args(false, true).to_update().is_active, Some(false));
        assert_eq!(args(true, false).to_update().is_active, Some(true));
    }

    #[test]
    fn no_flags_is_empty() {
        assert!(args(false, false).to_update().is_empty());
    }
}
