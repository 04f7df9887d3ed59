use anyhow::Result;
use clap::Parser;

use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Login with email and password")]
pub struct Options {
    #[clap(long = "email", help = "Email of the account")]
    pub email: Option<String>,
    #[clap(
        long = "password",
        help = "Password of the account",
        long_help = "Password of the account, prompted for when left out"
    )]
    pub password: Option<String>,
}

pub async fn handle(options: Options, mut state: State) -> Result<()> {
    if let Ok(user) = state.user() {
        log::debug!("Replacing the session of `{}`", user.email);
    }

    let email = match options.email {
        Some(email) => email,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Email")
            .interact_text()?,
    };

    let password = match options.password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?,
    };

    state.session.login(&email, &password).await?;

    let user = state.user()?;

    log::info!("Logged in as: `{}` ({})", user.display_name(), user.email);

    Ok(())
}
