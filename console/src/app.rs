//! Top-level console wiring.
//!
//! ARCHITECTURE
//! ============
//! `Console` owns one `SessionStore` and hands clones of it to the gateway
//! (token injection) and the route guard (render decisions). It also owns the
//! navigator, and is the only subscriber that reacts to
//! `GatewayEvent::Unauthenticated`: it clears the session, then replaces the
//! current history entry with the login screen. The gateway runs listeners
//! before returning the 401, so callers always observe the torn-down state.

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

use std::sync::Arc;

use crate::config::ConsoleConfig;
use crate::net::api::AdminApi;
use crate::net::error::ApiError;
use crate::net::gateway::{GatewayClient, GatewayEvent};
use crate::net::types::AdminUser;
use crate::routes::{History, NavigationMode, Navigator, Route, RouteGuard};
use crate::state::{FileStorage, SessionError, SessionStore};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to save session: {0}")]
    Session(#[from] SessionError),
}

impl ConsoleError {
    /// Text to show the operator, falling back to `fallback` when the error
    /// carries nothing more specific.
    #[must_use]
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) => e.display_message(fallback),
            Self::Session(e) => e.to_string(),
        }
    }
}

pub struct Console {
    config: ConsoleConfig,
    session: SessionStore,
    api: AdminApi,
    guard: RouteGuard,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("api_url", &self.config.api_url)
            .field("session", &self.session)
            .field("route", &self.navigator.current())
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Open the console described by `config`, rehydrating the persisted
    /// session if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: ConsoleConfig) -> Result<Self, ApiError> {
        let session = match &config.session_file {
            Some(path) => SessionStore::open(FileStorage::new(path)),
            None => {
                tracing::warn!("no session file configured; session will not survive this process");
                SessionStore::in_memory()
            }
        };
        Self::with_parts(config, session, Arc::new(History::default()))
    }

    /// Assemble a console from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn with_parts(
        config: ConsoleConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let gateway = GatewayClient::new(&config, session.clone())?;

        let teardown_session = session.clone();
        let teardown_nav = Arc::clone(&navigator);
        gateway.subscribe(move |event: &GatewayEvent| match event {
            GatewayEvent::Unauthenticated { method, path } => {
                tracing::info!(%method, path, "session rejected by backend; signing out");
                teardown_session.logout();
                teardown_nav.navigate(Route::Login, NavigationMode::Replace);
            }
        });

        Ok(Self { config, guard: RouteGuard::new(session.clone()), session, api: AdminApi::new(gateway), navigator })
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn api(&self) -> &AdminApi {
        &self.api
    }

    #[must_use]
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    #[must_use]
    pub fn current_route(&self) -> Route {
        self.navigator.current()
    }

    /// Push `route` through the guard. Returns the route that is now current.
    pub fn open(&self, route: Route) -> Route {
        self.guard.resolve(route, NavigationMode::Push, self.navigator.as_ref())
    }

    /// Sign in, store the session, and land on the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Api`] for a rejected or failed login and
    /// [`ConsoleError::Session`] when the session could not be stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, ConsoleError> {
        let resp = self.api.login(email, password).await?;
        let user = resp.user;
        self.session.set_auth(resp.access_token, user.clone())?;
        tracing::info!(user_id = %user.id, role = %user.role, "signed in");

        self.guard.resolve(Route::Dashboard, NavigationMode::Replace, self.navigator.as_ref());
        Ok(user)
    }

    /// Clear the session and show the login screen.
    pub fn logout(&self) {
        self.session.logout();
        tracing::info!("signed out");
        self.navigator.navigate(Route::Login, NavigationMode::Replace);
    }
}
