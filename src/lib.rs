pub mod commands;
pub mod config;
pub mod pipeline;
pub mod session;
pub mod state;
pub mod store;
pub mod utils;

use clap::Parser;
use commands::Commands;

#[derive(Debug, Parser)]
#[clap(
    name = "rival",
    about = "Run competitive analyses from the command line",
    version,
    author
)]
pub struct CLI {
    #[clap(subcommand)]
    pub commands: Commands,

    #[clap(
        long = "api-url",
        help = "Base URL of the analysis API",
        long_help = "Base URL of the analysis API, defaults to `RIVAL_API_URL` or http://localhost:8000",
        global = true
    )]
    pub api_url: Option<String>,

    #[clap(
        short = 'v',
        long = "verbose",
        help = "Print more information",
        global = true
    )]
    pub verbose: bool,
}
