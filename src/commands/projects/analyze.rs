use anyhow::Result;
use clap::Parser;
use serde_json::{Map, Value};

use crate::pipeline::run_analysis;
use crate::state::State;
use crate::utils::parse_key_val;

#[derive(Debug, Parser)]
#[clap(about = "Run the analysis of a project again")]
pub struct Options {
    #[clap(help = "ID of the project")]
    pub project: i64,

    #[clap(
        short = 'c',
        long = "constraint",
        help = "Constraint to refine the analysis with, in the form of KEY=VALUE",
        value_parser = parse_key_val::<String, String>
    )]
    pub constraints: Vec<(String, String)>,
}

pub async fn handle(options: Options, state: State) -> Result<()> {
    let constraints = (!options.constraints.is_empty()).then(|| {
        options
            .constraints
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect::<Map<String, Value>>()
    });

    run_analysis(state.http(), options.project, constraints.as_ref()).await?;

    log::info!("Analysis of project {} started", options.project);

    Ok(())
}
