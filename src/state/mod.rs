pub mod http;

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use self::http::HttpClient;
use crate::config::{API_URL_ENV, DEFAULT_API_URL, EXEC_NAME};
use crate::session::guard::Access;
use crate::session::route::{Navigator, RedirectToLogin, Route, Router};
use crate::session::types::UserProfile;
use crate::session::SessionController;
use crate::store::auth::{FileTokenStore, MemoryTokenStore, TokenStore};

#[derive(Debug)]
pub struct State {
    pub router: Arc<Router>,
    pub session: SessionController,
}

pub struct StateOptions {
    pub override_api_url: Option<String>,
    pub override_token: Option<String>,
}

impl State {
    pub async fn new(options: StateOptions) -> Result<Self> {
        // a token from the environment is never written to disk
        let tokens: Arc<dyn TokenStore> = match options.override_token {
            Some(token) => Arc::new(MemoryTokenStore::with_token(token)),
            None => Arc::new(FileTokenStore::load().await?),
        };

        let api_url = options
            .override_api_url
            .or_else(|| std::env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self::with_tokens(tokens, &api_url)
    }

    pub fn with_tokens(tokens: Arc<dyn TokenStore>, api_url: &str) -> Result<Self> {
        log::debug!("Using API at {api_url}");

        let router = Arc::new(Router::new(Route::Dashboard));

        let http = HttpClient::new(
            api_url,
            tokens,
            Arc::new(RedirectToLogin::new(router.clone())),
        )?;

        Ok(State {
            session: SessionController::new(http, router.clone()),
            router,
        })
    }

    pub fn http(&self) -> &HttpClient {
        self.session.http()
    }

    /// Moves to `route` the way the dashboard would: resolve the session
    /// first, then only continue if the guard lets us through.
    pub async fn enter(&mut self, route: Route) -> Result<()> {
        self.router.enter(route);
        self.session.startup().await;

        match self.session.access(route) {
            Access::Granted => Ok(()),
            Access::Loading => bail!("Your session is still being resolved"),
            Access::Redirect(target) => {
                if self.router.current() != target {
                    self.router.navigate(target);
                }

                bail!("You are not logged in. Please run `{EXEC_NAME} auth login` first.")
            }
            Access::Unauthorized => bail!("You need to be an admin to access `{route}`"),
        }
    }

    pub fn user(&self) -> Result<&UserProfile> {
        self.session.user().with_context(|| {
            format!("You are not logged in. Please run `{EXEC_NAME} auth login` first.")
        })
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::state::http::testing::FakeBackend;

    fn backend() -> FakeBackend {
        FakeBackend::start(|request| match request.authorization.as_deref() {
            Some("Bearer admin") => (
                200,
                json!({ "id": 1, "email": "root@acme.io", "full_name": null, "role": "super_admin",
                        "is_active": true, "notifications_enabled": false, "created_at": null }),
            ),
            Some("Bearer user") => (
                200,
                json!({ "id": 2, "email": "jane@acme.io", "full_name": "Jane", "role": "user",
                        "is_active": true, "notifications_enabled": true, "created_at": null }),
            ),
            _ => (401, json!({ "detail": "Not authenticated" })),
        })
    }

    fn new_state(backend: &FakeBackend, token: Option<&str>) -> State {
        let tokens: Arc<dyn TokenStore> = match token {
            Some(token) => Arc::new(MemoryTokenStore::with_token(token)),
            None => Arc::new(MemoryTokenStore::new()),
        };

        State::with_tokens(tokens, &backend.url).unwrap()
    }

    #[tokio::test]
    async fn test_enter_protected_route_without_session() {
        let backend = backend();
        let mut state = new_state(&backend, None);

        assert!(state.enter(Route::Projects).await.is_err());
        assert_eq!(state.router.current(), Route::Login);
        assert_eq!(state.router.history(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn test_enter_public_route_without_session() {
        let backend = backend();
        let mut state = new_state(&backend, None);

        state.enter(Route::ForgotPassword).await.unwrap();
        assert!(state.router.history().is_empty());
        assert!(state.user().is_err());
    }

    #[tokio::test]
    async fn test_enter_admin_route() {
        let backend = backend();

        let mut state = new_state(&backend, Some("user"));
        let error = state.enter(Route::AdminUsers).await.unwrap_err();
        assert_eq!(error.to_string(), "You need to be an admin to access `/admin/users`");
        assert!(state.router.history().is_empty());

        let mut state = new_state(&backend, Some("admin"));
        state.enter(Route::AdminUsers).await.unwrap();
        assert_eq!(state.user().unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_enter_with_stale_token() {
        let backend = backend();
        let mut state = new_state(&backend, Some("stale"));

        assert!(state.enter(Route::Settings).await.is_err());
        assert_eq!(state.http().tokens().get(), None);
        assert_eq!(state.router.current(), Route::Login);
    }
}
