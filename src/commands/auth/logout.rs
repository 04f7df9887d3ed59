use anyhow::Result;
use clap::Parser;

use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Logout the current user")]
pub struct Options {}

pub async fn handle(_options: Options, mut state: State) -> Result<()> {
    let was_logged_in = state.user().is_ok();

    state.session.logout().await;

    if was_logged_in {
        log::info!("You have been logged out");
    } else {
        log::info!("You were not logged in, nothing to do");
    }

    Ok(())
}
