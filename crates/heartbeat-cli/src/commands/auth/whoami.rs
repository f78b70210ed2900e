//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use heartbeat_core::Route;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Show the cached user without contacting the backend
    #[arg(long)]
    pub offline: bool,

    /// Print the user as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: WhoamiArgs, api: Option<&str>) -> Result<()> {
    let session = CliSession::open(api)?;
    session.require_login(Route::Settings)?;

    let auth = session.auth();
    let user = if args.offline {
        auth.current_user().context("Failed to read stored user")?
    } else {
        auth.fetch_user().await.context("Failed to fetch user")?
    };
    let user = user.context("No user information stored. Run 'heartbeat auth login' first.")?;

    if args.json {
        output::json_pretty(&user)?;
    } else {
        output::user(&user);
        output::field("API", session.api().as_str());
    }

    Ok(())
}
