use anyhow::Result;
use clap::Parser;

use super::utils::send_chat;
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Ask a question about a project's analysis")]
pub struct Options {
    #[clap(help = "ID of the project")]
    pub project: i64,

    #[clap(help = "The question to ask")]
    pub message: Option<String>,
}

pub async fn handle(options: Options, state: State) -> Result<()> {
    let message = match options.message {
        Some(message) => message,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Message")
            .interact_text()?,
    };

    let answer = send_chat(state.http(), options.project, &message).await?;

    println!("{answer}");

    Ok(())
}
