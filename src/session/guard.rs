use super::route::Route;
use super::types::UserProfile;
use super::Phase;

/// What a route should show for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Session still resolving, show a neutral placeholder and stay put.
    Loading,
    Redirect(Route),
    Granted,
    /// Signed in, but the role does not allow this view.
    Unauthorized,
}

pub fn guard(phase: Phase, user: Option<&UserProfile>, route: Route) -> Access {
    if route.is_public() {
        return Access::Granted;
    }

    match (phase, user) {
        (Phase::Resolving, _) => Access::Loading,
        (Phase::Ready, None) => Access::Redirect(Route::Login),
        (Phase::Ready, Some(user)) if route.requires_admin() && !user.role.is_admin() => {
            Access::Unauthorized
        }
        (Phase::Ready, Some(_)) => Access::Granted,
    }
}
