//! Gateway client: the single choke point for backend HTTP.
//!
//! ARCHITECTURE
//! ============
//! Request side: the current session token, if any, is attached as a bearer
//! credential right before dispatch. Response side: any non-success status
//! becomes `ApiError::Status` carrying the JSON body (if any) for message
//! normalization.
//!
//! A 401 additionally emits `GatewayEvent::Unauthenticated` to every
//! registered listener *before* the error is returned. The top-level console
//! listens for it and performs logout + redirect; the gateway itself never
//! navigates. Because listeners run synchronously, by the time a caller sees
//! the 401 the session is already torn down.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use crate::config::ConsoleConfig;
use crate::state::SessionStore;

/// Signals raised by the gateway for the application to act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayEvent {
    /// The backend rejected the session (HTTP 401) on `method path`.
    Unauthenticated { method: Method, path: String },
}

/// Receiver of gateway events.
pub trait GatewayListener: Send + Sync {
    fn on_event(&self, event: &GatewayEvent);
}

impl<F> GatewayListener for F
where
    F: Fn(&GatewayEvent) + Send + Sync,
{
    fn on_event(&self, event: &GatewayEvent) {
        self(event);
    }
}

/// Configured HTTP client bound to one backend and one session.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    listeners: Arc<RwLock<Vec<Arc<dyn GatewayListener>>>>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl GatewayClient {
    /// Build a client for `config.api_url` that reads tokens from `session`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &ConsoleConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_owned(),
            session,
            listeners: Arc::new(RwLock::new(Vec::new())),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Register a listener for gateway events. Listeners run in registration
    /// order on the task that received the triggering response.
    pub fn subscribe(&self, listener: impl GatewayListener + 'static) {
        self.listeners.write().unwrap_or_else(std::sync::PoisonError::into_inner).push(Arc::new(listener));
    }

    /// `GET path` with no query string.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.build(Method::GET, path)?;
        self.dispatch(Method::GET, path, request).await
    }

    /// `GET path?query`. Fields the query serializes as absent are omitted.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get_with_query<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut request = self.build(Method::GET, path)?;
        if let Some(query) = query {
            request = request.query(query);
        }
        self.dispatch(Method::GET, path, request).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build(Method::POST, path)?.json(body);
        self.dispatch(Method::POST, path, request).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build(Method::PATCH, path)?.json(body);
        self.dispatch(Method::PATCH, path, request).await
    }

    fn build(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        if !path.starts_with('/') {
            return Err(ApiError::InvalidUrl(path.to_owned()));
        }
        let url = format!("{}{path}", self.base_url);

        let request = self.http.request(method, url);
        Ok(match self.session.current().token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        tracing::debug!(%method, path, "dispatching request");

        let response = request.send().await.map_err(|e| {
            tracing::debug!(error = %e, %method, path, "request failed before a response");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(status = status.as_u16(), %method, path, "response received");

        if !status.is_success() {
            let body = serde_json::from_str::<Value>(&text).ok();
            if status == StatusCode::UNAUTHORIZED {
                tracing::warn!(%method, path, "backend rejected session; signalling teardown");
                self.emit(&GatewayEvent::Unauthenticated { method, path: path.to_owned() });
            }
            return Err(ApiError::Status { status: status.as_u16(), body });
        }

        parse_body(&text)
    }

    fn emit(&self, event: &GatewayEvent) {
        let listeners: Vec<Arc<dyn GatewayListener>> =
            self.listeners.read().unwrap_or_else(std::sync::PoisonError::into_inner).clone();
        for listener in listeners {
            listener.on_event(event);
        }
    }
}

/// Decode a success body; an empty body decodes as JSON `null`.
fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
