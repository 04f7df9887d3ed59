#[cfg(test)]
pub mod testing;
mod types;

use std::fmt::Debug;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as AsyncClient, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use self::types::HttpError;
use self::types::ErrorResponse;
use crate::config::VERSION;
use crate::store::auth::TokenStore;

/// Serializes `value` into a body for [`HttpClient::request`].
pub fn json_body<T>(value: &T) -> Result<Option<(reqwest::Body, &'static str)>, HttpError>
where
    T: Serialize + ?Sized,
{
    Ok(Some((serde_json::to_vec(value)?.into(), "application/json")))
}

/// Notified whenever the server rejects the stored credential.
pub trait SessionObserver: Debug + Send + Sync {
    fn session_invalidated(&self);
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    pub client: AsyncClient,
    pub base_url: String,
    pub ua: String,
    tokens: Arc<dyn TokenStore>,
    observer: Arc<dyn SessionObserver>,
}

impl HttpClient {
    pub fn new(
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let ua = format!(
            "rival_cli/{VERSION} on {}",
            sys_info::os_type().unwrap_or_else(|_| "unknown".to_string())
        );

        let client = AsyncClient::builder()
            .user_agent(ua.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            ua,
            tokens,
            observer,
        })
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Starts a request against the API, carrying the stored credential
    /// if there is one.
    pub fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));

        match self.tokens.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn send<T>(&self, request: RequestBuilder) -> Result<Option<T>, HttpError>
    where
        T: DeserializeOwned,
    {
        let request = request.build()?;

        log::debug!("request: {} {}", request.method(), request.url());

        #[cfg(debug_assertions)]
        let now = tokio::time::Instant::now();

        let response = self.client.execute(request).await?;

        #[cfg(debug_assertions)]
        log::debug!("response in: {:#?}", now.elapsed());

        self.handle_response(response).await
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        data: Option<(reqwest::Body, &str)>,
    ) -> Result<Option<T>, HttpError>
    where
        T: DeserializeOwned,
    {
        let mut request = self.builder(method, path);

        if let Some((body, content_type)) = data {
            request = request.header(CONTENT_TYPE, content_type).body(body);
        }

        self.send(request).await
    }

    /// Sends a single file as a `multipart/form-data` body under `file`.
    pub async fn upload<T>(
        &self,
        path: &str,
        file_name: String,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<Option<T>, HttpError>
    where
        T: DeserializeOwned,
    {
        let form = Form::new().part(
            "file",
            Part::bytes(bytes).file_name(file_name).mime_str(mime)?,
        );

        self.send(self.builder(Method::POST, path).multipart(form))
            .await
    }

    pub async fn handle_response<T>(&self, response: reqwest::Response) -> Result<Option<T>, HttpError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let message = Self::error_message(response, status).await;

            self.invalidate().await;

            return Err(HttpError::Unauthorized { message });
        }

        if !status.is_success() {
            let message = Self::error_message(response, status).await;

            return Err(HttpError::Status { status, message });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.bytes().await?;

        if body.is_empty() {
            return Ok(None);
        }

        // `null` bodies are a valid "nothing here" answer
        serde_json::from_slice::<Option<T>>(&body).map_err(HttpError::from)
    }

    async fn error_message(response: reqwest::Response, status: StatusCode) -> String {
        match response.json::<ErrorResponse>().await {
            Ok(body) => body.message(),
            Err(err) => {
                log::debug!("Error deserialize message: {:#?}", err);

                format!("HTTP {status}")
            }
        }
    }

    /// Every 401 ends the session, no matter which call observed it.
    async fn invalidate(&self) {
        if let Err(error) = self.tokens.clear().await {
            log::warn!("Failed to clear the stored token: {error}");
        }

        self.observer.session_invalidated();
    }
}

#[cfg(test)]
mod test {
    use serde_json::{json, Value};

    use super::testing::Harness;
    use super::*;
    use crate::session::route::Route;

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let harness = Harness::new(Route::Projects, Some("secret"), |_| (200, json!([])));

        harness
            .http
            .request::<Value>(Method::GET, "/projects", None)
            .await
            .unwrap();

        harness.tokens.clear().await.unwrap();

        harness
            .http
            .request::<Value>(Method::GET, "/projects", None)
            .await
            .unwrap();

        let requests = harness.backend.requests();
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer secret"));
        assert_eq!(requests[1].authorization, None);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_token_and_redirects() {
        let harness = Harness::new(Route::Project(3), Some("expired"), |_| {
            (401, json!({ "detail": "Could not validate credentials" }))
        });

        let error = harness
            .http
            .request::<Value>(Method::GET, "/projects/3/results", None)
            .await
            .unwrap_err();

        assert!(error.is_unauthorized());
        assert_eq!(
            error.to_string(),
            "Unauthorized: Could not validate credentials"
        );
        assert_eq!(harness.tokens.get(), None);
        assert_eq!(harness.router.history(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn test_unauthorized_on_public_route_does_not_redirect() {
        let harness = Harness::new(Route::ForgotPassword, Some("expired"), |_| {
            (401, json!({ "detail": "nope" }))
        });

        harness
            .http
            .request::<Value>(Method::POST, "/auth/forgot-password", None)
            .await
            .unwrap_err();

        assert_eq!(harness.tokens.get(), None);
        assert!(harness.router.history().is_empty());
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        let harness = Harness::new(Route::Projects, Some("secret"), |_| {
            (403, json!({ "detail": "Not authorized" }))
        });

        let error = harness
            .http
            .request::<Value>(Method::POST, "/projects/1/run-analysis", None)
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(error.to_string(), "Not authorized (HTTP 403 Forbidden)");
        assert_eq!(harness.tokens.get(), Some("secret".to_string()));
        assert!(harness.router.history().is_empty());
    }

    #[tokio::test]
    async fn test_null_body_is_none() {
        let harness = Harness::new(Route::Projects, Some("secret"), |_| (200, Value::Null));

        let response = harness
            .http
            .request::<Value>(Method::GET, "/projects/1/results", None)
            .await
            .unwrap();

        assert_eq!(response, None);
    }
}
