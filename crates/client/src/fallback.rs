//! Endpoint fallback probing
//!
//! The backend's route surface has drifted across deployments: login and
//! admin registration have several historical route names and payload
//! key conventions. Probing tries an ordered candidate list, stops at the
//! first success, and reports a single aggregated error when everything
//! fails. This is not a retry mechanism: no candidate is attempted twice
//! and there is no waiting between attempts.

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::client::{ResponseBody, SocietyClient};
use crate::error::ClientError;

/// Historical login payload key conventions, tried in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{ "email": ..., "password": ... }`
    Email,
    /// `{ "username": ..., "password": ... }`
    Username,
    /// `{ "identifier": ..., "password": ... }`
    Identifier,
}

impl PayloadShape {
    /// The full grid of shapes, in probing order
    pub const ALL: [Self; 3] = [Self::Email, Self::Username, Self::Identifier];

    /// The identifier key this shape uses
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
            Self::Identifier => "identifier",
        }
    }

    /// Build a login body in this shape
    #[must_use]
    pub fn body(self, identifier: &str, password: &str) -> Value {
        json!({ (self.key()): identifier, "password": password })
    }
}

/// First successful candidate of a probing run
#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    /// Endpoint that succeeded
    pub endpoint: String,
    /// Payload shape that succeeded, for operations that vary the body
    pub payload_shape: Option<PayloadShape>,
    /// The successful response body
    pub response: ResponseBody,
}

impl SocietyClient {
    /// Try the configured login endpoints in order with the conventional
    /// email/password body, returning the first success.
    ///
    /// A successful response establishes the session the same way
    /// [`login_user`](Self::login_user) does.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CandidatesExhausted`] when every candidate
    /// fails.
    pub async fn try_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<FallbackOutcome, ClientError> {
        let body = PayloadShape::Email.body(email, password);
        let attempts: Vec<_> = self
            .config()
            .endpoints
            .login_candidates
            .iter()
            .map(|endpoint| (endpoint.clone(), Some(PayloadShape::Email), body.clone()))
            .collect();
        let outcome = self.post_first_success("login", attempts).await?;
        self.establish_session_from(&outcome.response);
        Ok(outcome)
    }

    /// Try the full endpoint × payload-shape grid for login, returning the
    /// first success. Endpoints vary in the outer loop, shapes in the inner
    /// one, matching the historical probing order.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CandidatesExhausted`] when every combination
    /// fails.
    pub async fn try_login_variants(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<FallbackOutcome, ClientError> {
        let mut attempts = Vec::new();
        for endpoint in &self.config().endpoints.login_variant_candidates {
            for shape in PayloadShape::ALL {
                attempts.push((
                    endpoint.clone(),
                    Some(shape),
                    shape.body(identifier, password),
                ));
            }
        }
        let outcome = self.post_first_success("login", attempts).await?;
        self.establish_session_from(&outcome.response);
        Ok(outcome)
    }

    /// Try the configured admin registration endpoints in order with the
    /// given body, returning the first success.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CandidatesExhausted`] when every candidate
    /// fails.
    pub async fn try_admin_register(&self, body: &Value) -> Result<FallbackOutcome, ClientError> {
        let attempts: Vec<_> = self
            .config()
            .endpoints
            .admin_register_candidates
            .iter()
            .map(|endpoint| (endpoint.clone(), None, body.clone()))
            .collect();
        self.post_first_success("admin register", attempts).await
    }

    /// POST each candidate in order until one completes without an error.
    ///
    /// Failed candidates are logged and skipped; only the aggregated error
    /// surfaces, so callers never see a partial success.
    async fn post_first_success(
        &self,
        operation: &'static str,
        attempts: Vec<(String, Option<PayloadShape>, Value)>,
    ) -> Result<FallbackOutcome, ClientError> {
        let total = attempts.len();
        let mut last_error = ClientError::Configuration(format!("no {operation} candidates"));

        for (endpoint, payload_shape, body) in attempts {
            debug!(%endpoint, shape = ?payload_shape, "probing {operation} candidate");
            let request = match self.request(reqwest::Method::POST, &endpoint) {
                Ok(request) => request.json(&body),
                Err(err) => {
                    warn!(%endpoint, %err, "{operation} candidate rejected");
                    last_error = err;
                    continue;
                }
            };
            match self.execute_raw(request).await {
                Ok(response) => {
                    debug!(%endpoint, "{operation} candidate succeeded");
                    return Ok(FallbackOutcome {
                        endpoint,
                        payload_shape,
                        response,
                    });
                }
                Err(err) => {
                    warn!(%endpoint, %err, "{operation} candidate failed");
                    last_error = err;
                }
            }
        }

        Err(ClientError::CandidatesExhausted {
            operation,
            attempts: total,
            last_error: last_error.to_string(),
        })
    }

    /// Best-effort session establishment from a loosely-shaped login body
    fn establish_session_from(&self, response: &ResponseBody) {
        if let Some(value) = response.as_json()
            && let Ok(login) = serde_json::from_value(value.clone())
        {
            self.establish_session(&login);
        }
    }
}
