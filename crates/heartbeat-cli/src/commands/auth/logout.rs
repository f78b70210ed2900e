//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs, api: Option<&str>) -> Result<()> {
    let session = CliSession::open(api)?;
    session.auth().logout().context("Failed to clear session")?;
    output::success("Logged out");
    Ok(())
}
