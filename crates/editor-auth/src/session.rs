//! Session management: login, signup, and the persisted bearer session.
//!
//! The current session lives in a `watch` channel so observers see every
//! login and logout; the durable copy lives in a [`SessionStore`]. The two
//! are only ever changed together, through [`SessionManager::set_session`]
//! and [`SessionManager::logout`].
//!
//! Public operations never return errors. Transport failures, non-success
//! statuses and malformed bodies are logged and reported as `None`, and the
//! existing session is left as it was.

use crate::http::{error_message, summarize_response_body};
use crate::{AuthError, AuthResult, TokenProvider};
use editor_storage::{KeyValueStorage, SessionStore};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// The authenticated identity held by the client.
///
/// Either both fields are set or neither is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    /// Bearer token, empty when logged out.
    pub token: String,
    /// Opaque user record returned by the server.
    pub user: Option<Value>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty() && self.user.is_some()
    }
}

/// Successful login response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Value,
    /// Any other fields the server sends back.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Owns the session token and user record.
pub struct SessionManager {
    store: SessionStore,
    api_url: String,
    http_client: Client,
    session: watch::Sender<Session>,
}

impl SessionManager {
    /// Create a session manager, restoring any session found in `storage`.
    ///
    /// # Arguments
    /// * `storage` - Durable backend holding the token and user keys
    /// * `api_url` - Base URL of the document API (e.g. `http://localhost:1337`)
    pub fn new(storage: Arc<dyn KeyValueStorage>, api_url: impl Into<String>) -> Self {
        Self::with_http_client(storage, api_url, Client::new())
    }

    /// Create a session manager that sends requests through `http_client`.
    pub fn with_http_client(
        storage: Arc<dyn KeyValueStorage>,
        api_url: impl Into<String>,
        http_client: Client,
    ) -> Self {
        let store = SessionStore::new(storage);

        let initial = match store.load() {
            Ok(Some(stored)) => Session {
                token: stored.token,
                user: Some(stored.user),
            },
            Ok(None) => Session::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored session, starting logged out");
                Session::default()
            }
        };
        debug!(
            authenticated = initial.is_authenticated(),
            "Session manager initialized"
        );

        let (session, _) = watch::channel(initial);

        Self {
            store,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            http_client,
            session,
        }
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/api/auth/{}", self.api_url, endpoint)
    }

    /// Snapshot of the current token and user.
    pub fn current_session(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Current bearer token, empty when logged out.
    pub fn token(&self) -> String {
        self.session.borrow().token.clone()
    }

    /// Current user record.
    pub fn user(&self) -> Option<Value> {
        self.session.borrow().user.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    /// Observe session changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Log in with email and password.
    ///
    /// On success the returned token and user become the current session and
    /// are persisted. On any failure the session is left untouched and `None`
    /// is returned.
    pub async fn login(&self, email: &str, password: &str) -> Option<LoginResponse> {
        match self.try_login(email, password).await {
            Ok(response) => {
                self.set_session(response.token.clone(), response.user.clone());
                info!(email = %email, "Login successful");
                Some(response)
            }
            Err(e) => {
                error!(email = %email, rejected = e.is_rejected(), error = %e, "Login error");
                None
            }
        }
    }

    /// Register a new account.
    ///
    /// Does not log in; returns the server's response body or `None`.
    pub async fn signup(&self, email: &str, password: &str) -> Option<Value> {
        match self.try_signup(email, password).await {
            Ok(response) => {
                info!(email = %email, "Signup successful");
                Some(response)
            }
            Err(e) => {
                error!(email = %email, rejected = e.is_rejected(), error = %e, "Signup error");
                None
            }
        }
    }

    /// Replace the session in memory and in durable storage.
    ///
    /// A storage failure is logged; the in-memory session is still updated.
    pub fn set_session(&self, token: impl Into<String>, user: Value) {
        let token = token.into();
        if let Err(e) = self.store.save(&token, &user) {
            warn!(error = %e, "Failed to persist session");
        }
        self.session.send_replace(Session {
            token,
            user: Some(user),
        });
    }

    /// Clear the session in memory and in durable storage.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to remove stored session");
        }
        self.session.send_replace(Session::default());
        info!("Logged out");
    }

    async fn try_login(&self, email: &str, password: &str) -> AuthResult<LoginResponse> {
        let url = self.auth_url("login");
        debug!(url = %url, "Sending login request");

        let response = self
            .http_client
            .post(&url)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let login: LoginResponse = read_json(response, "Failed to log in").await?;

        // Token and user are only ever stored as a pair.
        if login.token.is_empty() {
            return Err(AuthError::IncompleteSession("token"));
        }
        if login.user.is_null() {
            return Err(AuthError::IncompleteSession("user"));
        }
        Ok(login)
    }

    async fn try_signup(&self, email: &str, password: &str) -> AuthResult<Value> {
        let url = self.auth_url("signup");
        debug!(url = %url, "Sending signup request");

        let response = self
            .http_client
            .post(&url)
            .json(&Credentials { email, password })
            .send()
            .await?;
        read_json(response, "Failed to sign up").await
    }
}

impl TokenProvider for SessionManager {
    fn bearer_token(&self) -> String {
        self.token()
    }
}

/// Decode a JSON body, turning non-success statuses into
/// [`AuthError::Rejected`] with the server's message when it sent one.
async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> AuthResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(
            status = %status,
            body_summary = %summarize_response_body(&body),
            "Auth request rejected"
        );
        return Err(AuthError::Rejected {
            status,
            message: error_message(&body).unwrap_or_else(|| fallback.to_string()),
        });
    }

    Ok(serde_json::from_str(&body)?)
}
