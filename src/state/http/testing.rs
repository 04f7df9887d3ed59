//! In-process stand-in for the backend, recording every request it serves.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::JoinHandle;

use super::HttpClient;
use crate::session::route::{RedirectToLogin, Route, Router};
use crate::store::auth::MemoryTokenStore;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// `METHOD /path`, handy for asserting call order.
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

type Responder = Arc<dyn Fn(&Recorded) -> (u16, Value) + Send + Sync>;

pub struct FakeBackend {
    pub url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    server: JoinHandle<()>,
}

impl FakeBackend {
    pub fn start<F>(responder: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, Value) + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(vec![]));
        let responder: Responder = Arc::new(responder);

        let recorder = requests.clone();

        let service = make_service_fn(move |_| {
            let recorder = recorder.clone();
            let responder = responder.clone();

            async move {
                Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                    request_handler(req, recorder.clone(), responder.clone())
                }))
            }
        });

        let address: SocketAddr = ([127, 0, 0, 1], 0).into();

        let server = Server::bind(&address).serve(service);
        let url = format!("http://{}", server.local_addr());

        let server = tokio::spawn(async move {
            if let Err(error) = server.await {
                log::error!("Fake backend error: {error}");
            }
        });

        Self {
            url,
            requests,
            server,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.requests().iter().map(Recorded::line).collect()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn request_handler(
    req: Request<Body>,
    recorder: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
) -> Result<Response<Body>, Infallible> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let authorization = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let body = hyper::body::to_bytes(req.into_body())
        .await
        .map(|bytes| bytes.to_vec())
        .unwrap_or_default();

    let recorded = Recorded {
        method,
        path,
        query,
        authorization,
        body,
    };

    let (status, value) = responder(&recorded);

    recorder.lock().push(recorded);

    let body = if status == 204 {
        Body::empty()
    } else {
        Body::from(value.to_string())
    };

    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(body)
        .unwrap())
}

/// A client wired to a fake backend, an in-memory token store and a router.
pub struct Harness {
    pub backend: FakeBackend,
    pub tokens: Arc<MemoryTokenStore>,
    pub router: Arc<Router>,
    pub http: HttpClient,
}

impl Harness {
    pub fn new<F>(route: Route, token: Option<&str>, responder: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, Value) + Send + Sync + 'static,
    {
        let backend = FakeBackend::start(responder);

        let tokens = Arc::new(match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        });

        let router = Arc::new(Router::new(route));

        let http = HttpClient::new(
            &backend.url,
            tokens.clone(),
            Arc::new(RedirectToLogin::new(router.clone())),
        )
        .unwrap();

        Self {
            backend,
            tokens,
            router,
            http,
        }
    }
}
