use std::str::FromStr;

use anyhow::Result;
use clap::Parser;

use super::types::UserCreate;
use super::utils::{create_user, format_users};
use crate::session::types::Role;
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Create a user")]
pub struct Options {
    #[clap(help = "Email of the user")]
    pub email: String,

    #[clap(short = 'n', long = "name", help = "Full name of the user")]
    pub name: Option<String>,

    #[clap(
        short = 'r',
        long = "role",
        help = "Role of the user, one of user, admin, super_admin",
        default_value = "user",
        value_parser = Role::from_str
    )]
    pub role: Role,

    #[clap(long = "password", help = "Initial password, prompted for when left out")]
    pub password: Option<String>,
}

pub async fn handle(options: Options, state: State) -> Result<()> {
    let password = match options.password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let user = create_user(
        state.http(),
        &UserCreate {
            email: options.email,
            full_name: options.name,
            role: options.role,
            password,
        },
    )
    .await?;

    log::info!("Created user {}", format_users(&[user], false)?.join(""));

    Ok(())
}
