//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use heartbeat_core::LoginCredentials;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "HEARTBEAT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, api: Option<&str>) -> Result<()> {
    let session = CliSession::open(api)?;
    let credentials = LoginCredentials::new(&args.username, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let user = session
        .auth()
        .login(&credentials)
        .await
        .context("Failed to login")?;

    session.remember_api()?;

    output::success(&format!("Logged in as {}", user.username));
    println!();
    output::user(&user);
    output::field("API", session.api().as_str());

    Ok(())
}
