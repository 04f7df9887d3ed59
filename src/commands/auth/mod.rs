mod login;
mod logout;
mod password;
mod register;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::session::route::Route;
use crate::state::State;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Login(login::Options),
    #[clap(name = "register", alias = "signup")]
    Register(register::Options),
    Logout(logout::Options),
    #[clap(name = "forgot-password")]
    ForgotPassword(password::ForgotOptions),
    #[clap(name = "reset-password")]
    ResetPassword(password::ResetOptions),
}

#[derive(Debug, Parser)]
#[clap(about = "Authenticate with the analysis API")]
pub struct Options {
    #[clap(subcommand)]
    pub commands: Commands,
}

impl Options {
    pub fn route(&self) -> Route {
        match self.commands {
            Commands::Login(_) | Commands::Logout(_) => Route::Login,
            Commands::Register(_) => Route::Register,
            Commands::ForgotPassword(_) | Commands::ResetPassword(_) => Route::ForgotPassword,
        }
    }
}

pub async fn handle(options: Options, state: State) -> Result<()> {
    match options.commands {
        Commands::Login(options) => login::handle(options, state).await,
        Commands::Register(options) => register::handle(options, state).await,
        Commands::Logout(options) => logout::handle(options, state).await,
        Commands::ForgotPassword(options) => password::handle_forgot(options, state).await,
        Commands::ResetPassword(options) => password::handle_reset(options, state).await,
    }
}
