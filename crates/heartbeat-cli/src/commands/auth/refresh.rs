//! Refresh command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use heartbeat_core::Route;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, api: Option<&str>) -> Result<()> {
    let session = CliSession::open(api)?;
    session.require_login(Route::Settings)?;

    eprintln!("{}", "Refreshing session...".dimmed());

    session
        .auth()
        .refresh()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed");
    Ok(())
}
