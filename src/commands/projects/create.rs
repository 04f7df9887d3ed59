use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::utils::parse_competitor;
use crate::config::EXEC_NAME;
use crate::pipeline::types::{OrgDraft, ProjectDraft, Report, UploadPolicy};
use crate::pipeline::Orchestrator;
use crate::session::route::{Navigator, Route};
use crate::state::State;
use crate::utils::highlight;

#[derive(Debug, Parser)]
#[clap(about = "Create a project, upload its documents and start the analysis")]
pub struct Options {
    #[clap(help = "Name of the project")]
    pub name: Option<String>,

    #[clap(short, long, help = "Industry the organizations compete in")]
    pub industry: Option<String>,

    #[clap(short, long, help = "Name of your own organization")]
    pub base: Option<String>,

    #[clap(short = 'f', long = "base-file", help = "Document about your own organization")]
    pub base_files: Vec<PathBuf>,

    #[clap(
        short = 'c',
        long = "competitor",
        help = "Competitor in the form of NAME or NAME=FILE,FILE",
        value_parser = parse_competitor
    )]
    pub competitors: Vec<OrgDraft>,

    #[clap(
        long = "batch",
        help = "Document to add as its own competitor",
        long_help = "Document to add as its own competitor, named after the file up to its first `.`"
    )]
    pub batch: Vec<PathBuf>,

    #[clap(
        long = "keep-going",
        help = "Keep uploading after a failed upload and start the analysis anyway"
    )]
    pub keep_going: bool,
}

pub async fn handle(options: Options, state: State) -> Result<()> {
    let policy = if options.keep_going {
        UploadPolicy::Continue
    } else {
        UploadPolicy::Abort
    };

    let draft = draft(options)?;

    log::info!(
        "Creating `{}` with {} competitors and {} documents",
        draft.name,
        draft.competitors.len(),
        draft.file_count()
    );

    let result = Orchestrator::new(state.http())
        .policy(policy)
        .run(&draft)
        .await;

    match result {
        Ok(report) => {
            print_report(&report);

            if let Some(id) = report.project_id {
                state.router.navigate(Route::Project(id));

                log::info!(
                    "Created project `{}` ({id}), uploaded {} documents and started the analysis",
                    draft.name,
                    report.uploaded()
                );

                log::info!(
                    "Run {} to see the results once they are ready",
                    highlight(&format!("{EXEC_NAME} projects results {id}"))
                );
            }

            Ok(())
        }

        Err(error) => {
            if let Some(report) = error.report() {
                print_report(report);

                if let Some(id) = report.project_id {
                    log::warn!("Project {id} was created and is left as is");
                }
            }

            Err(error.into())
        }
    }
}

fn print_report(report: &Report) {
    for outcome in &report.outcomes {
        match &outcome.error {
            None => log::debug!("Done {}", outcome.step),
            Some(error) => log::warn!("Failed {}: {error}", outcome.step),
        }
    }
}

/// Fills in whatever the flags left out by asking, then expands batch files.
fn draft(options: Options) -> Result<ProjectDraft> {
    let interactive = options.name.is_none();

    let name = match options.name {
        Some(name) => name,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Project name")
            .interact_text()?,
    };

    let industry = match options.industry {
        Some(industry) => Some(industry),
        None if interactive => Some(
            dialoguer::Input::<String>::new()
                .with_prompt("Industry (optional)")
                .allow_empty(true)
                .interact_text()?,
        )
        .filter(|industry| !industry.trim().is_empty()),
        None => None,
    };

    let base_name = match options.base {
        Some(base) => base,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Your organization")
            .interact_text()?,
    };

    let mut base_files = options.base_files;

    if interactive && base_files.is_empty() {
        base_files = prompt_files(&base_name)?;
    }

    let mut competitors = options.competitors;

    if interactive && competitors.is_empty() && options.batch.is_empty() {
        competitors = prompt_competitors()?;
    }

    for path in options.batch {
        competitors.push(OrgDraft::from_batch_file(path)?);
    }

    Ok(ProjectDraft {
        name,
        industry,
        base_org: OrgDraft::new(base_name, base_files),
        competitors,
    })
}

fn prompt_competitors() -> Result<Vec<OrgDraft>> {
    let mut competitors = vec![];

    loop {
        let name = dialoguer::Input::<String>::new()
            .with_prompt("Competitor (leave empty to finish)")
            .allow_empty(true)
            .interact_text()?;

        if name.trim().is_empty() {
            break;
        }

        let files = prompt_files(&name)?;

        competitors.push(OrgDraft::new(name, files));
    }

    Ok(competitors)
}

fn prompt_files(organization: &str) -> Result<Vec<PathBuf>> {
    let files = dialoguer::Input::<String>::new()
        .with_prompt(format!("Documents for `{organization}` (comma separated)"))
        .allow_empty(true)
        .interact_text()?;

    Ok(split_files(&files))
}

fn split_files(files: &str) -> Vec<PathBuf> {
    files
        .split(',')
        .map(str::trim)
        .filter(|file| !file.is_empty())
        .map(PathBuf::from)
        .collect()
}
