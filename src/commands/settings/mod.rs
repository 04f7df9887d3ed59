use anyhow::{bail, Result};
use clap::Parser;

use crate::session::types::{UserProfile, UserUpdate};
use crate::state::State;

#[derive(Debug, Parser, Default, PartialEq, Eq)]
#[clap(about = "Update your account settings")]
pub struct Options {
    #[clap(short = 'n', long = "name", help = "New full name")]
    pub name: Option<String>,
    #[clap(long = "email", help = "New email")]
    pub email: Option<String>,
    #[clap(long = "notifications", help = "Receive email notifications")]
    pub notifications: Option<bool>,
    #[clap(
        long = "password",
        help = "Change the password",
        long_help = "Change the password, the new one is prompted for"
    )]
    pub password: bool,
}

pub async fn handle(options: Options, mut state: State) -> Result<()> {
    let update = if Options::default() == options {
        prompt_update(state.user()?)?
    } else {
        from_flags(options)?
    };

    if update.is_empty() {
        log::info!("Nothing was changed");
        return Ok(());
    }

    let Some(user) = state.session.update_user(&update).await? else {
        bail!("You are not logged in");
    };

    log::info!(
        "Updated settings of `{}` ({}), notifications {}",
        user.display_name(),
        user.email,
        if user.notifications_enabled { "on" } else { "off" }
    );

    Ok(())
}

fn from_flags(options: Options) -> Result<UserUpdate> {
    let password = if options.password {
        Some(prompt_password()?)
    } else {
        None
    };

    Ok(UserUpdate {
        full_name: options.name,
        email: options.email,
        notifications_enabled: options.notifications,
        password,
        ..Default::default()
    })
}

fn prompt_update(user: &UserProfile) -> Result<UserUpdate> {
    let full_name = dialoguer::Input::<String>::new()
        .with_prompt("Full name")
        .with_initial_text(user.full_name.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let email = dialoguer::Input::<String>::new()
        .with_prompt("Email")
        .with_initial_text(user.email.clone())
        .interact_text()?;

    let notifications_enabled = dialoguer::Confirm::new()
        .with_prompt("Receive email notifications?")
        .default(user.notifications_enabled)
        .interact()?;

    let password = if dialoguer::Confirm::new()
        .with_prompt("Change your password?")
        .default(false)
        .interact()?
    {
        Some(prompt_password()?)
    } else {
        None
    };

    Ok(changes(user, full_name, email, notifications_enabled, password))
}

fn prompt_password() -> Result<String> {
    Ok(dialoguer::Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?)
}

/// Only the fields that differ from the current profile end up in the update.
fn changes(
    user: &UserProfile,
    full_name: String,
    email: String,
    notifications_enabled: bool,
    password: Option<String>,
) -> UserUpdate {
    UserUpdate {
        full_name: (user.full_name.as_deref().unwrap_or_default() != full_name)
            .then_some(full_name),
        email: (user.email != email).then_some(email),
        notifications_enabled: (user.notifications_enabled != notifications_enabled)
            .then_some(notifications_enabled),
        password,
        ..Default::default()
    }
}
