//! Session store: the authenticated identity and its persistence.
//!
//! Owns the [`Session`] exclusively. Login, signup, password change, and
//! logout all talk to the remote auth endpoints; `restore` only reads the
//! session file. In-memory and persisted state are updated together under
//! the write lock so the two never diverge.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use gearstock_core::{Role, Session};

use crate::config::ClientConfig;
use crate::storage;

/// File name of the persisted session inside the data directory.
const SESSION_FILE: &str = "session.json";

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Auth service unreachable or timed out.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service rejected the request; carries its message verbatim.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Operation attempted with no active session.
    #[error("not logged in")]
    Unauthenticated,

    /// 2xx response whose body could not be parsed.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Session file could not be written or removed.
    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Holds the authenticated identity and keeps it persisted across restarts.
///
/// Cheaply cloneable; all clones share the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    client: reqwest::Client,
    login_url: String,
    signup_url: String,
    change_password_url: String,
    path: PathBuf,
    session: RwLock<Option<Session>>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    name: &'a str,
    username: &'a str,
    password: &'a str,
    role: Role,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    user_id: &'a str,
    old_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

impl SessionStore {
    /// Create a store with no session loaded. Call [`Self::restore`] once at
    /// startup to pick up a persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(SessionStoreInner {
                client,
                login_url: config.endpoint("auth/login"),
                signup_url: config.endpoint("auth/signup"),
                change_password_url: config.endpoint("auth/change-password"),
                path: config.data_dir.join(SESSION_FILE),
                session: RwLock::new(None),
            }),
        })
    }

    /// Read the persisted session without contacting the remote service.
    ///
    /// Credential freshness is not validated; an expired token simply fails
    /// on its first authenticated call. A missing or malformed session file
    /// is treated as "not logged in".
    pub async fn restore(&self) -> Option<Session> {
        let session: Option<Session> = storage::read_json_lenient(&self.inner.path).await;
        if let Some(restored) = session {
            debug!(username = %restored.username, "restored persisted session");
            *self.inner.session.write().await = Some(restored.clone());
            return Some(restored);
        }
        None
    }

    /// Authenticate with username and password.
    ///
    /// On success the session is stored in memory and persisted before the
    /// call returns.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with the server's message on bad
    /// credentials, `AuthError::Network` if the service is unreachable, and
    /// `AuthError::Storage` if the session file cannot be written.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .inner
            .client
            .post(&self.inner.login_url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let session: Session = Self::parse(response).await?;
        self.store(session.clone()).await?;
        info!(username = %session.username, role = %session.role, "logged in");
        Ok(session)
    }

    /// Register a new account. Same contract as [`Self::login`], different
    /// endpoint.
    ///
    /// # Errors
    ///
    /// Same as [`Self::login`]; the server rejects duplicate usernames.
    #[instrument(skip(self, password), fields(username = %username, role = %role))]
    pub async fn signup(
        &self,
        name: &str,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Session, AuthError> {
        let response = self
            .inner
            .client
            .post(&self.inner.signup_url)
            .json(&SignupRequest {
                name,
                username,
                password,
                role,
            })
            .send()
            .await?;

        let session: Session = Self::parse(response).await?;
        self.store(session.clone()).await?;
        info!(username = %session.username, role = %session.role, "signed up");
        Ok(session)
    }

    /// Change the active user's password.
    ///
    /// Returns the server's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` if no session is active.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<String, AuthError> {
        let (user_id, token) = {
            let guard = self.inner.session.read().await;
            let session = guard.as_ref().ok_or(AuthError::Unauthenticated)?;
            (session.user_id.clone(), session.token.clone())
        };

        let response = self
            .inner
            .client
            .post(&self.inner.change_password_url)
            .bearer_auth(token.expose_secret())
            .json(&ChangePasswordRequest {
                user_id: &user_id,
                old_password,
                new_password,
            })
            .send()
            .await?;

        let confirmation: MessageResponse = Self::parse(response).await?;
        Ok(confirmation
            .message
            .unwrap_or_else(|| "password changed".to_string()))
    }

    /// Clear the in-memory and persisted session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` only if the session file exists and
    /// cannot be removed; a missing file is fine.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        let mut guard = self.inner.session.write().await;
        *guard = None;

        match tokio::fs::remove_file(&self.inner.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(AuthError::Storage(e)),
        }
        info!("logged out");
        Ok(())
    }

    /// The current session, if any.
    pub async fn current(&self) -> Option<Session> {
        self.inner.session.read().await.clone()
    }

    /// The bearer credential of the current session, if any.
    pub async fn credential(&self) -> Option<SecretString> {
        self.inner
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// Store and persist a session under the write lock, so memory and disk
    /// cannot diverge.
    async fn store(&self, session: Session) -> Result<(), AuthError> {
        let mut guard = self.inner.session.write().await;
        storage::write_json_atomic(&self.inner.path, &session).await?;
        *guard = Some(session);
        Ok(())
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AuthError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<MessageResponse>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
