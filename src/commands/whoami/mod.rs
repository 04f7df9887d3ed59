use anyhow::Result;
use clap::Parser;

use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Get information about the current user")]
pub struct Options {}

pub async fn handle(_options: Options, state: State) -> Result<()> {
    let user = state.user()?;

    log::info!(
        "You are logged in as `{}` ({})",
        user.display_name(),
        user.email
    );

    log::info!("Role: {}", user.role);

    if let Some(created_at) = user.created_at {
        log::info!("Member since: {}", created_at.format("%Y-%m-%d"));
    }

    Ok(())
}
