use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use reqwest::{Method, StatusCode};
use tabwriter::TabWriter;

use super::types::{AnalysisResult, ChatAnswer, Project, Recommendation};
use crate::pipeline::types::OrgDraft;
use crate::state::http::HttpClient;
use crate::utils::into_lines;

const UNAVAILABLE_ELEMENT: &str = "-";

pub async fn get_all_projects(http: &HttpClient) -> Result<Vec<Project>> {
    let response = http
        .request::<Vec<Project>>(Method::GET, "/projects", None)
        .await?
        .ok_or_else(|| anyhow!("Error while parsing response"))?;

    Ok(response)
}

/// Latest analysis of a project, `None` while nothing has been produced yet.
pub async fn get_results(http: &HttpClient, project_id: i64) -> Result<Option<AnalysisResult>> {
    match http
        .request::<AnalysisResult>(Method::GET, &format!("/projects/{project_id}/results"), None)
        .await
    {
        Ok(result) => Ok(result),
        Err(error) if error.status() == Some(StatusCode::NOT_FOUND) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

pub async fn send_chat(http: &HttpClient, project_id: i64, message: &str) -> Result<String> {
    let request = http
        .builder(Method::POST, &format!("/projects/{project_id}/chat"))
        .query(&[("message", message)]);

    let response = http
        .send::<ChatAnswer>(request)
        .await?
        .ok_or_else(|| anyhow!("Error while parsing response"))?;

    Ok(response.answer)
}

pub fn format_projects(projects: &[Project], title: bool) -> Result<Vec<String>> {
    let mut tw = TabWriter::new(vec![]);

    if title {
        writeln!(tw, "ID\tNAME\tINDUSTRY\tBASE\tCOMPETITORS\tCREATED")?;
    }

    for project in projects {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}\t{}\t{}",
            project.id,
            project.name,
            project.industry.as_deref().unwrap_or(UNAVAILABLE_ELEMENT),
            project
                .base_org()
                .map_or(UNAVAILABLE_ELEMENT, |org| org.name.as_str()),
            project.competitor_count(),
            project.created_at.map_or_else(
                || UNAVAILABLE_ELEMENT.to_string(),
                |created_at| created_at.format("%Y-%m-%d %H:%M").to_string()
            ),
        )?;
    }

    into_lines(tw)
}

pub fn format_recommendations(recommendations: &[Recommendation]) -> Result<Vec<String>> {
    let mut tw = TabWriter::new(vec![]);

    writeln!(tw, "RECOMMENDATION\tIMPACT\tCONFIDENCE")?;

    for recommendation in recommendations {
        writeln!(
            tw,
            "{}\t{}\t{}",
            recommendation.title,
            recommendation.impact.as_deref().unwrap_or(UNAVAILABLE_ELEMENT),
            recommendation.confidence.map_or_else(
                || UNAVAILABLE_ELEMENT.to_string(),
                |confidence| format!("{confidence}%")
            ),
        )?;
    }

    into_lines(tw)
}

/// Parses `NAME` or `NAME=FILE[,FILE...]` into a competitor.
pub fn parse_competitor(s: &str) -> Result<OrgDraft, String> {
    let (name, files) = match s.split_once('=') {
        Some((name, files)) => (name, files),
        None => (s, ""),
    };

    let name = name.trim();

    if name.is_empty() {
        return Err(format!("invalid competitor `{s}`, expected NAME or NAME=FILE,FILE"));
    }

    let files = files
        .split(',')
        .map(str::trim)
        .filter(|file| !file.is_empty())
        .map(PathBuf::from)
        .collect();

    Ok(OrgDraft::new(name, files))
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::session::route::Route;
    use crate::state::http::testing::{Harness, Recorded};

    fn project() -> serde_json::Value {
        json!({
            "id": 7, "name": "Acme Q4", "industry": "Fintech", "region": null, "owner_id": 1,
            "created_at": "2024-05-01T10:30:00Z",
            "organizations": [
                { "id": 11, "name": "Acme", "is_base": true, "project_id": 7 },
                { "id": 12, "name": "Beta", "is_base": false, "project_id": 7 }
            ]
        })
    }

    #[test]
    fn test_parse_competitor() {
        assert_eq!(parse_competitor("Beta").unwrap(), OrgDraft::new("Beta", vec![]));
        assert_eq!(
            parse_competitor("Beta Corp=deck.pdf, pricing.csv").unwrap(),
            OrgDraft::new(
                "Beta Corp",
                vec![PathBuf::from("deck.pdf"), PathBuf::from("pricing.csv")]
            )
        );
        assert!(parse_competitor("=deck.pdf").is_err());
    }

    #[test]
    fn test_format_projects() {
        let projects: Vec<Project> = serde_json::from_value(json!([project()])).unwrap();

        let lines = format_projects(&projects, true).unwrap();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Acme Q4"));
        assert!(lines[1].contains("2024-05-01 10:30"));
    }

    #[tokio::test]
    async fn test_get_all_projects() {
        let harness = Harness::new(Route::Projects, Some("t1"), |_: &Recorded| {
            (200, json!([project()]))
        });

        let projects = get_all_projects(&harness.http).await.unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].base_org().unwrap().id, 11);
        assert_eq!(projects[0].competitor_count(), 1);
        assert_eq!(harness.backend.lines(), vec!["GET /projects"]);
    }

    #[tokio::test]
    async fn test_missing_results() {
        let harness = Harness::new(Route::Project(7), Some("t1"), |request: &Recorded| {
            match request.path.as_str() {
                "/projects/7/results" => (200, json!(null)),
                _ => (404, json!({ "detail": "Project not found" })),
            }
        });

        assert!(get_results(&harness.http, 7).await.unwrap().is_none());
        assert!(get_results(&harness.http, 8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_results_recommendations() {
        let harness = Harness::new(Route::Project(7), Some("t1"), |_: &Recorded| {
            (
                200,
                json!({
                    "id": 3, "project_id": 7, "version": 2, "constraints": null,
                    "created_at": "2024-05-02T08:00:00Z",
                    "results_json": { "recommendations": [
                        { "title": "Lower entry pricing", "impact": "High", "confidence": 82 }
                    ] }
                }),
            )
        });

        let result = get_results(&harness.http, 7).await.unwrap().unwrap();
        let recommendations = result.recommendations();

        assert_eq!(result.version, 2);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].title, "Lower entry pricing");
        assert!(format_recommendations(&recommendations).unwrap()[1].contains("82%"));
    }

    #[tokio::test]
    async fn test_send_chat() {
        let harness = Harness::new(Route::Project(7), Some("t1"), |_: &Recorded| {
            (200, json!({ "answer": "Focus on pricing" }))
        });

        let answer = send_chat(&harness.http, 7, "what now?").await.unwrap();
        let requests = harness.backend.requests();

        assert_eq!(answer, "Focus on pricing");
        assert_eq!(requests[0].line(), "POST /projects/7/chat");
        assert_eq!(requests[0].query.as_deref(), Some("message=what+now%3F"));
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer t1"));
    }
}
