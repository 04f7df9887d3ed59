pub mod guard;
pub mod route;
pub mod types;

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

use self::guard::{guard, Access};
use self::route::{Navigator, Route};
use self::types::{
    LoginRequest, LoginResponse, PasswordResetConfirm, PasswordResetRequest,
    PasswordResetResponse, RegisterRequest, UserProfile, UserUpdate,
};
use crate::state::http::{json_body, HttpClient, HttpError};

const ME_PATH: &str = "/auth/me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Resolving,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub phase: Phase,
}

impl Session {
    fn anonymous() -> Self {
        Self {
            user: None,
            phase: Phase::Ready,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            phase: Phase::Resolving,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to authenticate: {0}")]
    Authentication(#[source] HttpError),
    #[error("Could not load your profile: {0}")]
    ProfileResolution(#[source] HttpError),
    #[error(transparent)]
    Request(#[from] HttpError),
    #[error("Failed to store credentials: {0}")]
    Storage(#[source] anyhow::Error),
}

/// Owns who (if anyone) is signed in, and every transition of that belief.
#[derive(Debug)]
pub struct SessionController {
    http: HttpClient,
    navigator: Arc<dyn Navigator>,
    session: Session,
}

impl SessionController {
    pub fn new(http: HttpClient, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            http,
            navigator,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.user.as_ref()
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn access(&self, route: Route) -> Access {
        guard(self.session.phase, self.user(), route)
    }

    /// Resolves the stored credential into a session. Only the first call
    /// does anything.
    pub async fn startup(&mut self) {
        if self.session.phase == Phase::Ready {
            log::debug!("Session already resolved");
            return;
        }

        if self.http.tokens().get().is_none() {
            self.session = Session::anonymous();

            if !self.navigator.current().is_public() {
                self.navigator.navigate(Route::Login);
            }

            return;
        }

        // a stored token that doesn't resolve just means nobody is signed in
        if let Err(error) = self.resolve().await {
            log::debug!("Discarding stored session: {error}");
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), SessionError> {
        let response = self
            .http
            .request::<LoginResponse>(
                Method::POST,
                "/auth/login",
                json_body(&LoginRequest { email, password })?,
            )
            .await
            .and_then(|response| {
                response.ok_or_else(|| HttpError::MissingBody("/auth/login".to_string()))
            })
            .map_err(SessionError::Authentication)?;

        self.http
            .tokens()
            .set(response.access_token)
            .await
            .map_err(SessionError::Storage)?;

        self.resolve().await?;

        self.navigator.navigate(Route::Dashboard);

        Ok(())
    }

    /// Registration alone doesn't sign anyone in, so this logs in right after.
    pub async fn register(&mut self, fields: &RegisterRequest) -> Result<(), SessionError> {
        self.http
            .request::<Value>(Method::POST, "/auth/register", json_body(fields)?)
            .await
            .map_err(SessionError::Authentication)?;

        self.login(&fields.email, &fields.password).await
    }

    pub async fn logout(&mut self) {
        self.forget().await;
        self.navigator.navigate(Route::Login);
    }

    /// Sends a partial update for the signed in user and adopts whatever the
    /// server answers with. Does nothing without a user.
    pub async fn update_user(
        &mut self,
        update: &UserUpdate,
    ) -> Result<Option<&UserProfile>, SessionError> {
        let Some(id) = self.session.user.as_ref().map(|user| user.id) else {
            return Ok(None);
        };

        let path = format!("/users/{id}");

        let response = self
            .http
            .request::<UserProfile>(Method::PATCH, &path, json_body(update)?)
            .await;

        let user = match response {
            Ok(Some(user)) => user,
            Ok(None) => return Err(HttpError::MissingBody(path).into()),
            Err(error) => {
                if error.is_unauthorized() {
                    self.session = Session::anonymous();
                }

                return Err(error.into());
            }
        };

        self.session.user = Some(user);

        Ok(self.session.user.as_ref())
    }

    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<PasswordResetResponse, SessionError> {
        let path = "/auth/forgot-password";

        let response = self
            .http
            .request::<PasswordResetResponse>(
                Method::POST,
                path,
                json_body(&PasswordResetRequest { email })?,
            )
            .await?
            .ok_or_else(|| HttpError::MissingBody(path.to_string()))?;

        Ok(response)
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), SessionError> {
        self.http
            .request::<Value>(
                Method::POST,
                "/auth/reset-password",
                json_body(&PasswordResetConfirm {
                    token,
                    new_password,
                })?,
            )
            .await?;

        Ok(())
    }

    async fn resolve(&mut self) -> Result<(), SessionError> {
        let response = self
            .http
            .request::<UserProfile>(Method::GET, ME_PATH, None)
            .await
            .and_then(|user| user.ok_or_else(|| HttpError::MissingBody(ME_PATH.to_string())));

        match response {
            Ok(user) => {
                self.session = Session {
                    user: Some(user),
                    phase: Phase::Ready,
                };

                Ok(())
            }

            Err(error) => {
                self.forget().await;

                Err(SessionError::ProfileResolution(error))
            }
        }
    }

    async fn forget(&mut self) {
        if let Err(error) = self.http.tokens().clear().await {
            log::warn!("Failed to clear the stored token: {error}");
        }

        self.session = Session::anonymous();
    }
}
