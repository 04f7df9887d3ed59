mod analyze;
mod chat;
mod create;
mod list;
mod results;
pub mod types;
pub mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::session::route::Route;
use crate::state::State;

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[clap(name = "new", alias = "create")]
    Create(create::Options),
    #[clap(name = "ls", alias = "list")]
    List(list::Options),
    #[clap(name = "results", alias = "report")]
    Results(results::Options),
    #[clap(name = "analyze", alias = "refine")]
    Analyze(analyze::Options),
    Chat(chat::Options),
}

#[derive(Debug, Parser)]
#[clap(about = "Interact with analysis projects")]
pub struct Options {
    #[clap(subcommand)]
    pub commands: Commands,
}

impl Options {
    pub fn route(&self) -> Route {
        match &self.commands {
            Commands::Create(_) => Route::NewProject,
            Commands::List(_) => Route::Projects,
            Commands::Results(options) => Route::Project(options.project),
            Commands::Analyze(options) => Route::Project(options.project),
            Commands::Chat(options) => Route::Project(options.project),
        }
    }
}

pub async fn handle(options: Options, state: State) -> Result<()> {
    match options.commands {
        Commands::Create(options) => create::handle(options, state).await,
        Commands::List(options) => list::handle(options, state).await,
        Commands::Results(options) => results::handle(options, state).await,
        Commands::Analyze(options) => analyze::handle(options, state).await,
        Commands::Chat(options) => chat::handle(options, state).await,
    }
}
