use std::fmt::{self, Display};
use std::sync::Arc;

use log::{error, info, warn};
use reqwest::Method;
use serde::Serialize;

use crate::api::auth::{
    AuthResponse, LoginRequest, RegisterRequest, UserSummary, LOGIN_PATH, LOGOUT_PATH,
    REFRESH_PATH, REGISTER_PATH,
};
use crate::client::{Client, Payload, Reply, RequestError};
use crate::store::{CredentialStore, StoredIdentity};

/// Whether the client believes it holds a session. This is a local belief
/// only: a token the server has revoked still reads as `Authenticated`
/// until a protected call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Anonymous => write!(f, "anonymous"),
            SessionStatus::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Drives the session lifecycle: acquiring a credential, keeping it in the
/// store and dropping it again.
///
/// A stored token is never validated or cleared behind the caller's back.
/// When a protected call fails with [`RequestError::Authentication`], it is
/// up to the caller to treat the session as gone, typically by calling
/// [`SessionManager::logout`].
pub struct SessionManager {
    client: Client,
    store: Arc<dyn CredentialStore>,
}

impl SessionManager {
    pub fn new(client: Client) -> Self {
        let store = client.store().clone();
        Self { client, store }
    }

    pub fn status(&self) -> SessionStatus {
        if self.store.has_token() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    /// Presence check on the stored credential, no server round trip.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.status(), SessionStatus::Authenticated)
    }

    /// The identity cached by the last login, register or profile read.
    pub fn identity(&self) -> Option<StoredIdentity> {
        self.store.load_identity()
    }

    /// Logs in, replacing any session already held. On failure the store is
    /// left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserSummary, RequestError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        info!("Logging in as '{email}'");
        self.acquire(LOGIN_PATH, Payload::json(&req)?, "login failed").await
    }

    /// Same contract as [`SessionManager::login`], on the registration
    /// endpoint.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, RequestError> {
        let req = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        info!("Registering user '{username}' with email '{email}'");
        self.acquire(REGISTER_PATH, Payload::json(&req)?, "registration failed")
            .await
    }

    /// Exchanges the current credential for a fresh one.
    pub async fn refresh(&self) -> Result<UserSummary, RequestError> {
        info!("Refreshing session token");
        self.acquire(REFRESH_PATH, Payload::None, "token refresh failed").await
    }

    /// Ends the session. The server is told on a best-effort basis; the local
    /// credential is always dropped, so this never fails.
    pub async fn logout(&self) {
        match self
            .client
            .send_unit(Method::POST, LOGOUT_PATH, Payload::None, "logout failed")
            .await
        {
            Ok(()) => info!("Server session closed"),
            Err(e) => warn!("Server logout failed, clearing local session anyway: {e}"),
        }

        if let Err(e) = self.store.clear() {
            error!("Clear credential store failed: {e:#}");
        }
    }

    async fn acquire(
        &self,
        path: &str,
        payload: Payload,
        fallback: &str,
    ) -> Result<UserSummary, RequestError> {
        let reply: Reply<AuthResponse> = self.client.send(Method::POST, path, payload).await?;

        let reason = reply.envelope.reason().unwrap_or(fallback).to_string();
        let auth = match reply.envelope.data {
            Some(auth) if reply.envelope.success && !auth.token.is_empty() => auth,
            _ => {
                warn!("Server refused to issue a session: {reason}");
                return Err(RequestError::Authentication(reason));
            }
        };

        self.store.save(&auth.token).map_err(RequestError::Storage)?;
        if let Err(e) = self.store.save_identity(&auth.user) {
            warn!("Cache user identity failed: {e:#}");
        }

        info!(
            "Session established for user '{}' ({})",
            auth.user.username, auth.user.id
        );
        Ok(auth.user)
    }
}
