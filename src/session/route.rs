use std::fmt::{self, Debug, Display};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use parking_lot::Mutex;

use crate::state::http::SessionObserver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Login,
    Register,
    ForgotPassword,
    Projects,
    NewProject,
    Project(i64),
    Settings,
    AdminUsers,
}

impl Route {
    /// Routes reachable without a session.
    pub const PUBLIC: [Route; 3] = [Route::Login, Route::Register, Route::ForgotPassword];

    pub fn is_public(&self) -> bool {
        Self::PUBLIC.contains(self)
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::AdminUsers)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Dashboard => write!(f, "/"),
            Route::Login => write!(f, "/login"),
            Route::Register => write!(f, "/register"),
            Route::ForgotPassword => write!(f, "/forgot-password"),
            Route::Projects => write!(f, "/projects"),
            Route::NewProject => write!(f, "/projects/new"),
            Route::Project(id) => write!(f, "/projects/{id}"),
            Route::Settings => write!(f, "/settings"),
            Route::AdminUsers => write!(f, "/admin/users"),
        }
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let segments = s
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();

        let route = match segments.as_slice() {
            [] => Route::Dashboard,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            ["projects"] => Route::Projects,
            ["projects", "new"] => Route::NewProject,
            ["projects", id] => Route::Project(
                id.parse()
                    .map_err(|_| anyhow!("Invalid project id in route: {s}"))?,
            ),
            ["settings"] => Route::Settings,
            ["admin", "users"] => Route::AdminUsers,
            _ => bail!("Unknown route: {s}"),
        };

        Ok(route)
    }
}

/// Where the client currently "is", and the only way to move it.
pub trait Navigator: Debug + Send + Sync {
    fn current(&self) -> Route;
    fn navigate(&self, route: Route);
}

#[derive(Debug)]
struct RouterState {
    current: Route,
    history: Vec<Route>,
}

/// In-process navigator, remembers every navigation it was asked to make.
#[derive(Debug)]
pub struct Router {
    state: Mutex<RouterState>,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            state: Mutex::new(RouterState {
                current: initial,
                history: vec![],
            }),
        }
    }

    /// Enter a route without counting it as a navigation.
    pub fn enter(&self, route: Route) {
        self.state.lock().current = route;
    }

    pub fn history(&self) -> Vec<Route> {
        self.state.lock().history.clone()
    }
}

impl Navigator for Router {
    fn current(&self) -> Route {
        self.state.lock().current
    }

    fn navigate(&self, route: Route) {
        log::debug!("Navigating to {route}");

        let mut state = self.state.lock();
        state.current = route;
        state.history.push(route);
    }
}

/// Sends the user back to the login entry point once the session is gone,
/// unless they are already on a public route.
#[derive(Debug, Clone)]
pub struct RedirectToLogin {
    navigator: Arc<dyn Navigator>,
}

impl RedirectToLogin {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }
}

impl SessionObserver for RedirectToLogin {
    fn session_invalidated(&self) {
        if !self.navigator.current().is_public() {
            self.navigator.navigate(Route::Login);
        }
    }
}
