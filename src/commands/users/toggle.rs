use anyhow::{anyhow, Result};
use clap::Parser;

use super::utils::{get_all_users, set_active};
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Activate or deactivate a user")]
pub struct Options {
    #[clap(help = "ID of the user")]
    pub user: i64,
}

pub async fn handle(options: Options, state: State) -> Result<()> {
    let users = get_all_users(state.http()).await?;

    let user = users
        .iter()
        .find(|user| user.id == options.user)
        .ok_or_else(|| anyhow!("User {} not found", options.user))?;

    let updated = set_active(state.http(), user.id, !user.is_active).await?;

    log::info!(
        "User `{}` is now {}",
        updated.email,
        if updated.is_active { "active" } else { "inactive" }
    );

    Ok(())
}
