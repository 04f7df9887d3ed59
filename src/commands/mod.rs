pub mod auth;
pub mod completions;
pub mod projects;
pub mod settings;
pub mod users;
pub mod whoami;

use anyhow::Result;
use clap::Subcommand;

use crate::config::EXEC_NAME;
use crate::session::route::{Navigator, Route};
use crate::state::State;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Auth(auth::Options),
    #[clap(name = "whoami", alias = "info", alias = "me")]
    Whoami(whoami::Options),
    #[clap(name = "projects", alias = "project")]
    Projects(projects::Options),
    Settings(settings::Options),
    Users(users::Options),
    Completions(completions::Options),
}

impl Commands {
    /// Dashboard page a command stands in for.
    pub fn route(&self) -> Option<Route> {
        match self {
            Commands::Auth(options) => Some(options.route()),
            Commands::Whoami(_) => Some(Route::Dashboard),
            Commands::Projects(options) => Some(options.route()),
            Commands::Settings(_) => Some(Route::Settings),
            Commands::Users(_) => Some(Route::AdminUsers),
            Commands::Completions(_) => None,
        }
    }
}

pub async fn handle_command(command: Commands, mut state: State) -> Result<()> {
    let Some(route) = command.route() else {
        return match command {
            Commands::Completions(options) => completions::handle(options, state),
            _ => unreachable!(),
        };
    };

    // resolve the session and let the guard decide before anything runs
    state.enter(route).await?;

    let router = state.router.clone();

    let result = match command {
        Commands::Auth(options) => auth::handle(options, state).await,
        Commands::Whoami(options) => whoami::handle(options, state).await,
        Commands::Projects(options) => projects::handle(options, state).await,
        Commands::Settings(options) => settings::handle(options, state).await,
        Commands::Users(options) => users::handle(options, state).await,
        Commands::Completions(_) => unreachable!(),
    };

    if result.is_err() && route != Route::Login && router.current() == Route::Login {
        log::warn!("Your session has ended, run `{EXEC_NAME} auth login` to sign in again");
    }

    result
}
