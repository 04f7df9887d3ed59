use anyhow::Result;
use clap::Parser;

use crate::config::EXEC_NAME;
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Request a password reset for an account")]
pub struct ForgotOptions {
    #[clap(help = "Email of the account")]
    pub email: Option<String>,
}

pub async fn handle_forgot(options: ForgotOptions, state: State) -> Result<()> {
    let email = match options.email {
        Some(email) => email,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Email")
            .interact_text()?,
    };

    let response = state.session.request_password_reset(&email).await?;

    log::info!("{}", response.message);

    if let Some(token) = response.token {
        log::info!("Reset token: {token}");
        log::info!("Run `{EXEC_NAME} auth reset-password --token {token}` to choose a new password");
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[clap(about = "Choose a new password using a reset token")]
pub struct ResetOptions {
    #[clap(long = "token", help = "Reset token from the password reset request")]
    pub token: Option<String>,
    #[clap(long = "password", help = "The new password")]
    pub password: Option<String>,
}

pub async fn handle_reset(options: ResetOptions, state: State) -> Result<()> {
    let token = match options.token {
        Some(token) => token,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Reset token")
            .interact_text()?,
    };

    let password = match options.password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt("New password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    state.session.reset_password(&token, &password).await?;

    log::info!("Password updated, run `{EXEC_NAME} auth login` to sign in");

    Ok(())
}
