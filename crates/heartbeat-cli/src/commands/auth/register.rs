//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;

use heartbeat_core::Registration;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username for the new account
    #[arg(long)]
    pub username: String,

    /// Password for the new account
    #[arg(long, env = "HEARTBEAT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: RegisterArgs, api: Option<&str>) -> Result<()> {
    let session = CliSession::open(api)?;
    let registration = Registration::new(&args.username, &args.password);

    let user = session
        .auth()
        .register(&registration)
        .await
        .context("Failed to register")?;

    output::success(&format!("Registered {}", user.username));
    output::field("User ID", &user.id.to_string());
    if let Some(code) = &user.invitation_code {
        output::field("Invitation code", code);
    }
    eprintln!("Run 'heartbeat auth login' to sign in.");

    Ok(())
}
