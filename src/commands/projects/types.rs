use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::pipeline::types::Organization;

#[derive(Debug, Deserialize, Clone)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub region: Option<String>,
    pub owner_id: i64,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
}

impl Project {
    pub fn base_org(&self) -> Option<&Organization> {
        self.organizations.iter().find(|org| org.is_base)
    }

    pub fn competitor_count(&self) -> usize {
        self.organizations.iter().filter(|org| !org.is_base).count()
    }
}

/// Latest analysis of a project, `results_json` is whatever the analysis produced.
#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisResult {
    pub id: i64,
    pub project_id: i64,
    pub version: i64,
    pub results_json: Value,
    pub constraints: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Recommendation {
    pub title: String,
    pub impact: Option<String>,
    pub confidence: Option<f64>,
}

impl AnalysisResult {
    pub fn recommendations(&self) -> Vec<Recommendation> {
        self.results_json
            .get("recommendations")
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
}
