pub mod types;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reqwest::Method;
use serde_json::{Map, Value};
use thiserror::Error;

use self::types::{
    CreatedProject, DraftError, Organization, OrgDraft, ProjectCreate, ProjectDraft, Report, Step,
    UploadPolicy,
};
use crate::state::http::{json_body, HttpClient, HttpError};
use crate::utils::mime_type;

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("the server returned no organization named `{0}`")]
    Unresolved(String),
    #[error("could not read `{}`: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StepError {
    /// A rejected credential ends the session, so nothing after it can succeed.
    pub fn ends_session(&self) -> bool {
        matches!(self, StepError::Http(error) if error.is_unauthorized())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error("Error creating project: {step} failed: {source}")]
    Step {
        step: Step,
        report: Box<Report>,
        #[source]
        source: StepError,
    },
}

impl PipelineError {
    fn step(step: Step, report: Report, source: StepError) -> Self {
        Self::Step {
            step,
            report: Box::new(report),
            source,
        }
    }

    /// Steps attempted before the failure, if any were.
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Step { report, .. } => Some(report.as_ref()),
            Self::Draft(_) => None,
        }
    }
}

/// Maps draft names onto the organizations the server created.
struct OrgIndex<'a> {
    base: Option<&'a Organization>,
    competitors: HashMap<&'a str, i64>,
}

impl<'a> OrgIndex<'a> {
    fn new(organizations: &'a [Organization]) -> Self {
        Self {
            base: organizations.iter().find(|org| org.is_base),
            competitors: organizations
                .iter()
                .filter(|org| !org.is_base)
                .map(|org| (org.name.as_str(), org.id))
                .collect(),
        }
    }

    fn resolve(&self, name: &str, is_base: bool) -> Option<i64> {
        if is_base {
            self.base.filter(|org| org.name == name).map(|org| org.id)
        } else {
            self.competitors.get(name).copied()
        }
    }
}

/// Creates a project with its organizations, uploads every draft file
/// against the organization it belongs to, then starts the analysis.
///
/// Steps run strictly in order, one request at a time. Nothing is rolled
/// back: a failure leaves the project and the uploads made so far in place.
#[derive(Debug)]
pub struct Orchestrator<'a> {
    http: &'a HttpClient,
    policy: UploadPolicy,
}

impl<'a> Orchestrator<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            http,
            policy: UploadPolicy::default(),
        }
    }

    pub fn policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn run(&self, draft: &ProjectDraft) -> Result<Report, PipelineError> {
        draft.validate()?;

        let mut report = Report::default();

        let project = match self.create(draft).await {
            Ok(project) => project,
            Err(error) => {
                report.failed(Step::CreateProject, &error);
                return Err(PipelineError::step(Step::CreateProject, report, error));
            }
        };

        log::debug!("Created project {} ({})", project.name, project.id);

        report.project_id = Some(project.id);
        report.succeeded(Step::CreateProject);

        let index = OrgIndex::new(&project.organizations);
        let mut first_failure = None;

        let organizations = std::iter::once((&draft.base_org, true))
            .chain(draft.competitors.iter().map(|org| (org, false)));

        for (org, is_base) in organizations {
            let step = Step::Resolve {
                organization: org.name.clone(),
            };

            let Some(org_id) = index.resolve(&org.name, is_base) else {
                let error = StepError::Unresolved(org.name.clone());
                report.failed(step.clone(), &error);
                return Err(PipelineError::step(step, report, error));
            };

            report.succeeded(step);

            if let Err((step, error)) = self
                .upload_all(project.id, org_id, org, &mut report)
                .await
            {
                if self.policy == UploadPolicy::Abort || error.ends_session() {
                    return Err(PipelineError::step(step, report, error));
                }

                first_failure.get_or_insert((step, error));
            }
        }

        if let Err(error) = run_analysis(self.http, project.id, None).await {
            let error = StepError::from(error);
            report.failed(Step::TriggerAnalysis, &error);
            return Err(PipelineError::step(Step::TriggerAnalysis, report, error));
        }

        report.succeeded(Step::TriggerAnalysis);

        match first_failure {
            Some((step, error)) => Err(PipelineError::step(step, report, error)),
            None => Ok(report),
        }
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<CreatedProject, StepError> {
        let project = self
            .http
            .request::<CreatedProject>(
                Method::POST,
                "/projects",
                json_body(&ProjectCreate::from(draft))?,
            )
            .await?
            .ok_or_else(|| HttpError::MissingBody("/projects".to_string()))?;

        Ok(project)
    }

    /// Uploads the files of one organization. With [`UploadPolicy::Continue`]
    /// every file is attempted and the first failure is handed back, unless
    /// the server rejected the credential.
    async fn upload_all(
        &self,
        project_id: i64,
        org_id: i64,
        org: &OrgDraft,
        report: &mut Report,
    ) -> Result<(), (Step, StepError)> {
        let mut first_failure = None;

        for file in &org.files {
            let step = Step::Upload {
                organization: org.name.clone(),
                organization_id: org_id,
                file: file.clone(),
            };

            log::info!("Uploading `{}` for `{}`", file.display(), org.name);

            match upload_file(self.http, project_id, org_id, file).await {
                Ok(()) => report.succeeded(step),
                Err(error) => {
                    log::debug!("Failed to upload `{}`: {error}", file.display());
                    report.failed(step.clone(), &error);

                    if self.policy == UploadPolicy::Abort || error.ends_session() {
                        return Err((step, error));
                    }

                    first_failure.get_or_insert((step, error));
                }
            }
        }

        match first_failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

pub async fn upload_file(
    http: &HttpClient,
    project_id: i64,
    org_id: i64,
    path: &Path,
) -> Result<(), StepError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| StepError::File {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    http.upload::<Value>(
        &format!("/uploads/{project_id}/{org_id}"),
        file_name,
        bytes,
        mime_type(path),
    )
    .await?;

    Ok(())
}

/// Starts (or re-runs) the analysis of a project, optionally with tuning
/// constraints such as `budget` or `compliance`.
pub async fn run_analysis(
    http: &HttpClient,
    project_id: i64,
    constraints: Option<&Map<String, Value>>,
) -> Result<Option<Value>, HttpError> {
    let data = match constraints {
        Some(constraints) => json_body(constraints)?,
        None => None,
    };

    http.request::<Value>(
        Method::POST,
        &format!("/projects/{project_id}/run-analysis"),
        data,
    )
    .await
}
