use std::collections::HashSet;
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An organization as the user described it, before the server knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgDraft {
    pub name: String,
    pub files: Vec<PathBuf>,
}

impl OrgDraft {
    pub fn new(name: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            files,
        }
    }

    /// One competitor per batch file, named after the file up to its
    /// first dot (`beta.corp.pdf` becomes `beta`).
    pub fn from_batch_file(path: PathBuf) -> Result<Self, DraftError> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| DraftError::InvalidFileName(path.clone()))?
            .to_string();

        Ok(Self::new(name, vec![path]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub industry: Option<String>,
    pub base_org: OrgDraft,
    pub competitors: Vec<OrgDraft>,
}

impl ProjectDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingProjectName);
        }

        if self.base_org.name.trim().is_empty() {
            return Err(DraftError::MissingBaseName);
        }

        let mut seen = HashSet::new();

        for (idx, competitor) in self.competitors.iter().enumerate() {
            if competitor.name.trim().is_empty() {
                return Err(DraftError::MissingCompetitorName(idx + 1));
            }

            if !seen.insert(competitor.name.as_str()) {
                return Err(DraftError::DuplicateCompetitor(competitor.name.clone()));
            }
        }

        Ok(())
    }

    pub fn file_count(&self) -> usize {
        self.organizations().map(|org| org.files.len()).sum()
    }

    /// Base organization first, then competitors in the order given.
    pub fn organizations(&self) -> impl Iterator<Item = &OrgDraft> {
        std::iter::once(&self.base_org).chain(self.competitors.iter())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Project name cannot be empty")]
    MissingProjectName,
    #[error("Base organization name cannot be empty")]
    MissingBaseName,
    #[error("Competitor #{0} has no name")]
    MissingCompetitorName(usize),
    #[error("Competitor `{0}` was added more than once")]
    DuplicateCompetitor(String),
    #[error("Cannot name a competitor after `{}`", .0.display())]
    InvalidFileName(PathBuf),
}

#[derive(Debug, Serialize)]
pub struct OrganizationCreate<'a> {
    pub name: &'a str,
    pub is_base: bool,
}

#[derive(Debug, Serialize)]
pub struct ProjectCreate<'a> {
    pub name: &'a str,
    pub industry: Option<&'a str>,
    pub base_org: OrganizationCreate<'a>,
    pub competitors: Vec<OrganizationCreate<'a>>,
}

impl<'a> From<&'a ProjectDraft> for ProjectCreate<'a> {
    fn from(draft: &'a ProjectDraft) -> Self {
        Self {
            name: &draft.name,
            industry: draft.industry.as_deref(),
            base_org: OrganizationCreate {
                name: &draft.base_org.name,
                is_base: true,
            },
            competitors: draft
                .competitors
                .iter()
                .map(|competitor| OrganizationCreate {
                    name: &competitor.name,
                    is_base: false,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub is_base: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CreatedProject {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub organizations: Vec<Organization>,
}

/// What to do with the remaining uploads once one of them fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPolicy {
    /// Stop at the first failed upload, analysis is not triggered.
    #[default]
    Abort,
    /// Attempt every upload and trigger analysis, then report the failure.
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    CreateProject,
    Resolve {
        organization: String,
    },
    Upload {
        organization: String,
        organization_id: i64,
        file: PathBuf,
    },
    TriggerAnalysis,
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreateProject => write!(f, "creating the project"),
            Step::Resolve { organization } => write!(f, "resolving organization `{organization}`"),
            Step::Upload {
                organization, file, ..
            } => write!(
                f,
                "uploading `{}` for `{organization}`",
                file_label(file)
            ),
            Step::TriggerAnalysis => write!(f, "starting the analysis"),
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: Step,
    pub error: Option<String>,
}

/// Ordered record of every step the pipeline attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub project_id: Option<i64>,
    pub outcomes: Vec<StepOutcome>,
}

impl Report {
    pub(super) fn succeeded(&mut self, step: Step) {
        self.outcomes.push(StepOutcome { step, error: None });
    }

    pub(super) fn failed(&mut self, step: Step, error: &impl Display) {
        self.outcomes.push(StepOutcome {
            step,
            error: Some(error.to_string()),
        });
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.error.is_some())
    }

    pub fn uploaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.error.is_none() && matches!(outcome.step, Step::Upload { .. }))
            .count()
    }

    pub fn analysis_started(&self) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| outcome.step == Step::TriggerAnalysis && outcome.error.is_none())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn draft(competitors: &[&str]) -> ProjectDraft {
        ProjectDraft {
            name: "Acme Q4".to_string(),
            industry: Some("Fintech".to_string()),
            base_org: OrgDraft::new("Acme", vec![]),
            competitors: competitors
                .iter()
                .map(|name| OrgDraft::new(*name, vec![]))
                .collect(),
        }
    }

    #[test]
    fn test_batch_file_names() {
        let org = OrgDraft::from_batch_file(PathBuf::from("/tmp/beta.png")).unwrap();
        assert_eq!(org.name, "beta");
        assert_eq!(org.files, vec![PathBuf::from("/tmp/beta.png")]);

        let org = OrgDraft::from_batch_file(PathBuf::from("gamma.corp.pdf")).unwrap();
        assert_eq!(org.name, "gamma");

        let org = OrgDraft::from_batch_file(PathBuf::from("README")).unwrap();
        assert_eq!(org.name, "README");

        assert_eq!(
            OrgDraft::from_batch_file(PathBuf::from(".hidden")),
            Err(DraftError::InvalidFileName(PathBuf::from(".hidden")))
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(draft(&["Beta", "Gamma"]).validate(), Ok(()));

        let mut missing = draft(&[]);
        missing.name = " ".to_string();
        assert_eq!(missing.validate(), Err(DraftError::MissingProjectName));

        let mut missing = draft(&[]);
        missing.base_org.name = String::new();
        assert_eq!(missing.validate(), Err(DraftError::MissingBaseName));

        assert_eq!(
            draft(&["Beta", ""]).validate(),
            Err(DraftError::MissingCompetitorName(2))
        );
        assert_eq!(
            draft(&["Beta", "Gamma", "Beta"]).validate(),
            Err(DraftError::DuplicateCompetitor("Beta".to_string()))
        );
    }

    #[test]
    fn test_create_payload() {
        let payload = serde_json::to_value(ProjectCreate::from(&draft(&["Beta"]))).unwrap();

        assert_eq!(
            payload,
            serde_json::json!({
                "name": "Acme Q4",
                "industry": "Fintech",
                "base_org": { "name": "Acme", "is_base": true },
                "competitors": [{ "name": "Beta", "is_base": false }]
            })
        );
    }
}
