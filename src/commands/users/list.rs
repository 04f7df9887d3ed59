use anyhow::Result;
use clap::Parser;

use super::utils::{format_users, get_all_users};
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "List all users")]
pub struct Options {
    #[clap(short, long, help = "Only print the IDs of the users")]
    pub quiet: bool,
}

pub async fn handle(options: Options, state: State) -> Result<()> {
    let users = get_all_users(state.http()).await?;

    if options.quiet {
        let ids = users
            .iter()
            .map(|user| user.id.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        println!("{ids}");
    } else {
        println!("{}", format_users(&users, true)?.join("\n"));
    }

    Ok(())
}
