//! Auth subcommand implementations.

mod login;
mod logout;
mod refresh;
mod register;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the signed-in user
    Whoami(whoami::WhoamiArgs),

    /// Refresh the access token now
    Refresh(refresh::RefreshArgs),
}

pub async fn handle(cmd: AuthCommand, api: Option<&str>) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, api).await,
        AuthSubcommand::Register(args) => register::run(args, api).await,
        AuthSubcommand::Logout(args) => logout::run(args, api),
        AuthSubcommand::Whoami(args) => whoami::run(args, api).await,
        AuthSubcommand::Refresh(args) => refresh::run(args, api).await,
    }
}
