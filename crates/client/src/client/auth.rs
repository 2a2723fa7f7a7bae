//! Authentication API client methods

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use society_core::SessionRecord;

use super::SocietyClient;
use crate::error::ClientError;
use crate::types::{LoginRequest, LoginResponse, RegisterRequest};

impl SocietyClient {
    /// Register a user via the generic `POST /api/auth/register` route
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn register_user(&self, request: &RegisterRequest) -> Result<Value, ClientError> {
        let path = self.config().endpoints.register.clone();
        self.post(&path, request).await
    }

    /// Log in via the generic `POST /api/auth/login` route.
    ///
    /// On success the response's bearer token (when present) is persisted,
    /// and a session record is saved when the response carries a role —
    /// subsequent requests from this client authenticate automatically.
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn login_user(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let path = self.config().endpoints.login.clone();
        let response: LoginResponse = self.post(&path, request).await?;
        self.establish_session(&response);
        Ok(response)
    }

    /// Fetch the current user via `GET /api/auth/me`; requires a token
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn me(&self) -> Result<Value, ClientError> {
        let path = self.config().endpoints.me.clone();
        self.get(&path).await
    }

    /// Local logout: clears the token, session record and activity timestamp.
    /// Purely client-side, no request is issued.
    pub fn logout(&self) {
        self.sessions().logout();
        info!("logged out, local session cleared");
    }

    /// Persist whatever authenticated state a login response carries.
    /// Storage failures are logged, not surfaced: the login itself succeeded.
    pub(crate) fn establish_session(&self, response: &LoginResponse) {
        if let Some(token) = response.token.as_deref() {
            self.sessions().save_token(token);
        }
        let Some(role) = response.role else {
            return;
        };
        let record = SessionRecord {
            user_id: response.user_id_string().unwrap_or_default(),
            email: response.email.clone().unwrap_or_default(),
            name: response.display_name().unwrap_or_default(),
            role,
            login_time: Utc::now(),
        };
        if let Err(err) = self.sessions().save_session(&record) {
            warn!(%err, "failed to persist session record after login");
        } else {
            info!(role = %role, "session established");
        }
    }
}
