use std::io::Write;

use anyhow::{anyhow, bail, Result};
use reqwest::Method;
use tabwriter::TabWriter;

use super::types::{ActiveUpdate, CreateUserResponse, UserCreate};
use crate::session::types::UserProfile;
use crate::state::http::{json_body, HttpClient};
use crate::utils::into_lines;

pub async fn get_all_users(http: &HttpClient) -> Result<Vec<UserProfile>> {
    let response = http
        .request::<Vec<UserProfile>>(Method::GET, "/users", None)
        .await?
        .ok_or_else(|| anyhow!("Error while parsing response"))?;

    Ok(response)
}

pub async fn create_user(http: &HttpClient, user: &UserCreate) -> Result<UserProfile> {
    let response = http
        .request::<CreateUserResponse>(Method::POST, "/users", json_body(user)?)
        .await?
        .ok_or_else(|| anyhow!("Error while parsing response"))?;

    match response {
        CreateUserResponse::Created(user) => Ok(user),
        CreateUserResponse::Rejected { error } => bail!("Could not create user: {error}"),
    }
}

pub async fn set_active(http: &HttpClient, user_id: i64, is_active: bool) -> Result<UserProfile> {
    let response = http
        .request::<UserProfile>(
            Method::PATCH,
            &format!("/users/{user_id}"),
            json_body(&ActiveUpdate { is_active })?,
        )
        .await?
        .ok_or_else(|| anyhow!("Error while parsing response"))?;

    Ok(response)
}

pub fn format_users(users: &[UserProfile], title: bool) -> Result<Vec<String>> {
    let mut tw = TabWriter::new(vec![]);

    if title {
        writeln!(tw, "ID\tEMAIL\tNAME\tROLE\tSTATUS")?;
    }

    for user in users {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}\t{}",
            user.id,
            user.email,
            user.full_name.as_deref().unwrap_or("-"),
            user.role,
            if user.is_active { "active" } else { "inactive" },
        )?;
    }

    into_lines(tw)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::session::route::Route;
    use crate::session::types::Role;
    use crate::state::http::testing::{Harness, Recorded};

    fn jane() -> serde_json::Value {
        json!({ "id": 2, "email": "jane@acme.io", "full_name": "Jane", "role": "user",
                "is_active": true, "notifications_enabled": true,
                "created_at": "2024-05-01T10:30:00Z" })
    }

    fn new_user() -> UserCreate {
        UserCreate {
            email: "jane@acme.io".to_string(),
            full_name: Some("Jane".to_string()),
            role: Role::User,
            password: "hunter22".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let harness = Harness::new(Route::AdminUsers, Some("admin"), |_: &Recorded| (200, jane()));

        let user = create_user(&harness.http, &new_user()).await.unwrap();
        let requests = harness.backend.requests();

        assert_eq!(user.id, 2);
        assert_eq!(requests[0].line(), "POST /users");
        assert_eq!(requests[0].json()["role"], "user");
    }

    #[tokio::test]
    async fn test_create_user_rejected_in_body() {
        let harness = Harness::new(Route::AdminUsers, Some("admin"), |_: &Recorded| {
            (200, json!({ "error": "Email already registered" }))
        });

        let error = create_user(&harness.http, &new_user()).await.unwrap_err();

        assert_eq!(error.to_string(), "Could not create user: Email already registered");
    }

    #[tokio::test]
    async fn test_set_active() {
        let harness = Harness::new(Route::AdminUsers, Some("admin"), |request: &Recorded| {
            let mut user = jane();
            user["is_active"] = request.json()["is_active"].clone();
            (200, user)
        });

        let user = set_active(&harness.http, 2, false).await.unwrap();

        assert!(!user.is_active);
        assert_eq!(harness.backend.lines(), vec!["PATCH /users/2"]);
        assert_eq!(harness.backend.requests()[0].json(), json!({ "is_active": false }));
    }

    #[test]
    fn test_format_users() {
        let users: Vec<UserProfile> = serde_json::from_value(json!([jane()])).unwrap();

        let lines = format_users(&users, true).unwrap();

        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("jane@acme.io"));
        assert!(lines[1].contains("active"));
    }
}
