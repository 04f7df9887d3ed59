use anyhow::Result;
use clap::Parser;

use super::utils::{format_recommendations, get_results};
use crate::config::EXEC_NAME;
use crate::state::State;
use crate::utils::highlight;

#[derive(Debug, Parser)]
#[clap(about = "Show the latest analysis of a project")]
pub struct Options {
    #[clap(help = "ID of the project")]
    pub project: i64,

    #[clap(long, help = "Print the raw analysis as JSON")]
    pub json: bool,
}

pub async fn handle(options: Options, state: State) -> Result<()> {
    let Some(result) = get_results(state.http(), options.project).await? else {
        log::info!(
            "No results yet, run {} to start an analysis",
            highlight(&format!("{EXEC_NAME} projects analyze {}", options.project))
        );
        return Ok(());
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result.results_json)?);
        return Ok(());
    }

    log::info!(
        "Analysis v{} of project {}{}",
        result.version,
        result.project_id,
        result
            .created_at
            .map(|created_at| format!(" from {}", created_at.format("%Y-%m-%d %H:%M")))
            .unwrap_or_default()
    );

    let recommendations = result.recommendations();

    if recommendations.is_empty() {
        println!("{}", serde_json::to_string_pretty(&result.results_json)?);
    } else {
        println!("{}", format_recommendations(&recommendations)?.join("\n"));
    }

    Ok(())
}
