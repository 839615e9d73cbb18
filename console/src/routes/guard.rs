//! Admin route guard.
//!
//! A protected route renders only for a complete session whose identity has
//! the `ADMIN` role; everything else is sent to the login screen with a
//! history replace, so "back" cannot return to the blocked page. A non-admin
//! session is blocked but left in place.
//!
//! The guard reads a fresh snapshot on every call. Nothing is cached, so a
//! logout anywhere in the process is seen by the next check.

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

use super::{NavigationMode, Navigator, Route};
use crate::state::{Session, SessionStatus, SessionStore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect { to: Route, mode: NavigationMode },
}

impl GuardDecision {
    #[must_use]
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render)
    }
}

/// Decision for a protected route.
#[must_use]
pub fn admin_guard(session: &Session) -> GuardDecision {
    match session.status() {
        SessionStatus::AuthenticatedAdmin => GuardDecision::Render,
        SessionStatus::Anonymous | SessionStatus::AuthenticatedNonAdmin => {
            GuardDecision::Redirect { to: Route::Login, mode: NavigationMode::Replace }
        }
    }
}

/// Decision for the login screen: an admin who is already signed in goes
/// straight to the dashboard. Anyone else sees the form.
#[must_use]
pub fn login_guard(session: &Session) -> GuardDecision {
    match session.status() {
        SessionStatus::AuthenticatedAdmin => GuardDecision::Redirect { to: Route::Dashboard, mode: NavigationMode::Replace },
        SessionStatus::Anonymous | SessionStatus::AuthenticatedNonAdmin => GuardDecision::Render,
    }
}

/// Guard bound to the console's session store.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Decide whether `route` may render right now.
    #[must_use]
    pub fn check(&self, route: &Route) -> GuardDecision {
        let session = self.session.current();
        if route.is_protected() { admin_guard(&session) } else { login_guard(&session) }
    }

    /// Navigate to `route` through the guard. Returns the route that ended
    /// up current.
    pub fn resolve(&self, route: Route, mode: NavigationMode, navigator: &dyn Navigator) -> Route {
        match self.check(&route) {
            GuardDecision::Render => navigator.navigate(route, mode),
            GuardDecision::Redirect { to, mode } => {
                tracing::debug!(from = %route, to = %to, "route guard redirect");
                navigator.navigate(to, mode);
            }
        }
        navigator.current()
    }
}
