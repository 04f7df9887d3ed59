use anyhow::Result;
use clap::Parser;

use crate::session::types::RegisterRequest;
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Create an account and login with it")]
pub struct Options {
    #[clap(long = "email", help = "Email of the new account")]
    pub email: Option<String>,
    #[clap(short = 'n', long = "name", help = "Full name of the new account")]
    pub name: Option<String>,
    #[clap(long = "password", help = "Password of the new account")]
    pub password: Option<String>,
}

pub async fn handle(options: Options, mut state: State) -> Result<()> {
    let email = match options.email {
        Some(email) => email,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Email")
            .interact_text()?,
    };

    let full_name = match options.name {
        Some(name) => name,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Full name")
            .interact_text()?,
    };

    let password = match options.password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    state
        .session
        .register(&RegisterRequest {
            email,
            full_name,
            password,
        })
        .await?;

    let user = state.user()?;

    log::info!("Registered and logged in as: `{}` ({})", user.display_name(), user.email);

    Ok(())
}
