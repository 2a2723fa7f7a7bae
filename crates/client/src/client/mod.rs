//! Society API client
//!
//! Wraps the HTTP transport with the policy every page script relies on:
//! consistent headers, per-request timeout, bearer-token attachment, error
//! normalization, and the 401/403 session teardown.

pub mod admins;
pub mod auth;
pub mod items;
pub mod password_reset;
pub mod students;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Method, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, warn};
use url::Url;

use society_core::{ApiConfig, MemoryStorage, SessionManager, Storage};

use crate::error::ClientError;

/// Parsed response payload: JSON when the server says so, raw text otherwise
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body parsed from an `application/json` response
    Json(Value),
    /// Raw body of any other content type
    Text(String),
}

impl ResponseBody {
    /// The parsed JSON value, if this body was JSON
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Convert into a JSON value; text bodies become JSON strings
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }

    /// Human-readable error message for a failed response: the body's
    /// `message` or `error` field, the raw text, or the status reason.
    fn error_message(&self, status: StatusCode) -> String {
        let fallback = || {
            status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {}", status.as_u16()), ToString::to_string)
        };
        match self {
            Self::Text(text) if !text.trim().is_empty() => text.clone(),
            Self::Text(_) => fallback(),
            Self::Json(value) => value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map_or_else(fallback, ToString::to_string),
        }
    }
}

/// Cookie policy applied to requests, mirroring the browser fetch modes.
///
/// Derived at build time: a base URL sharing the page's origin includes
/// cookies, a cross-origin base omits them. On native targets this is
/// informational only — reqwest sends no cookies without a cookie store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsMode {
    /// Send cookies with each request
    Include,
    /// Never send cookies
    Omit,
}

/// Society API client
#[derive(Clone)]
pub struct SocietyClient {
    http: Client,
    config: ApiConfig,
    credentials: CredentialsMode,
    sessions: SessionManager,
}

impl SocietyClient {
    /// Create a client from a resolved configuration and a storage backend
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to initialize.
    pub fn new(config: ApiConfig, storage: Arc<dyn Storage>) -> Result<Self, ClientError> {
        Self::builder().config(config).storage(storage).build()
    }

    /// Create a new client builder
    #[must_use]
    pub fn builder() -> SocietyClientBuilder {
        SocietyClientBuilder::default()
    }

    /// The resolved configuration snapshot
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The session manager backing this client
    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// The base URL all relative paths resolve against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The cookie policy this client derived or was given
    #[must_use]
    pub fn credentials(&self) -> CredentialsMode {
        self.credentials
    }

    /// Resolve a request path against the configured base.
    ///
    /// Relative paths are joined onto the base with exactly one slash
    /// between them. Absolute URLs must share the base's origin; a mismatch
    /// fails fast in every environment rather than silently talking to an
    /// arbitrary host.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HostMismatch`] for a foreign-origin absolute
    /// URL and [`ClientError::Configuration`] for an unparseable one.
    pub fn resolve_url(&self, path: &str) -> Result<String, ClientError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            let requested = Url::parse(path)
                .map_err(|err| ClientError::Configuration(format!("invalid URL {path}: {err}")))?;
            let base = Url::parse(self.base_url()).map_err(|err| {
                ClientError::Configuration(format!("invalid base URL {}: {err}", self.base_url()))
            })?;
            if requested.origin() != base.origin() {
                return Err(ClientError::HostMismatch {
                    url: path.to_string(),
                    base: self.base_url().to_string(),
                });
            }
            return Ok(path.to_string());
        }
        Ok(format!("{}{}", self.base_url().trim_end_matches('/'), path))
    }

    /// Create a request builder with the default headers and timeout applied
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved against the base.
    pub fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let url = self.resolve_url(path)?;
        let mut request = self
            .http
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json");

        #[cfg(not(target_arch = "wasm32"))]
        {
            request = request.timeout(self.config.timeout);
        }

        #[cfg(target_arch = "wasm32")]
        {
            request = match self.credentials {
                CredentialsMode::Include => request.fetch_credentials_include(),
                CredentialsMode::Omit => request.fetch_credentials_omit(),
            };
        }

        if let Some(token) = self.sessions.token() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        Ok(request)
    }

    /// Execute a request and deserialize a successful JSON response
    ///
    /// # Errors
    ///
    /// Propagates transport, timeout and HTTP errors from [`Self::execute_raw`],
    /// plus a serialization error when the body does not match `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        match self.execute_raw(request).await? {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value)?),
            ResponseBody::Text(text) => Ok(serde_json::from_str(&text)?),
        }
    }

    /// Execute a request and normalize the outcome.
    ///
    /// A 2xx response yields its parsed body. A non-2xx response becomes an
    /// error carrying the status and parsed body; 401 and 403 additionally
    /// clear the persisted token and session record before the error is
    /// returned, so callers can rely on the teardown without re-implementing
    /// it. A timeout aborts the transport and surfaces as the distinct
    /// [`ClientError::Timeout`] variant.
    ///
    /// # Errors
    ///
    /// See above; every failure path returns control to the caller.
    pub async fn execute_raw(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ResponseBody, ClientError> {
        let response = request.send().await.map_err(ClientError::transport)?;

        let status = response.status();
        let url = response.url().to_string();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.contains("application/json"));

        let body = if is_json {
            ResponseBody::Json(
                response
                    .json::<Value>()
                    .await
                    .map_err(ClientError::transport)?,
            )
        } else {
            ResponseBody::Text(response.text().await.map_err(ClientError::transport)?)
        };

        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(%url, status = status.as_u16(), "auth failure, clearing stored session");
            self.sessions.expire();
        }

        let message = body.error_message(status);
        error!(%url, status = status.as_u16(), %message, "API request failed");
        Err(ClientError::from_status(
            status,
            message,
            body.as_json().cloned(),
        ))
    }

    /// GET a path and deserialize the JSON response
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.request(Method::GET, path)?;
        self.execute(request).await
    }

    /// POST a JSON body to a path and deserialize the JSON response
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute(request).await
    }
}

/// Builder for [`SocietyClient`]
#[derive(Default)]
pub struct SocietyClientBuilder {
    config: Option<ApiConfig>,
    storage: Option<Arc<dyn Storage>>,
    base_url: Option<String>,
    page_origin: Option<String>,
    credentials: Option<CredentialsMode>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SocietyClientBuilder {
    /// Use a resolved configuration snapshot
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use the given storage backend for tokens, sessions and overrides
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Override the base URL after resolution. Applied verbatim; intended
    /// for debugging against arbitrary hosts and for tests.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// The origin of the page hosting this client, used to derive the
    /// cookie policy: a base sharing the page origin includes cookies,
    /// everything else omits them
    #[must_use]
    pub fn page_origin(mut self, origin: impl Into<String>) -> Self {
        self.page_origin = Some(origin.into());
        self
    }

    /// Explicit cookie policy, overriding the derivation
    #[must_use]
    pub fn credentials(mut self, credentials: CredentialsMode) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    ///
    /// Without an explicit configuration, one is resolved from the storage
    /// backend (an empty in-memory store by default, which resolves to
    /// production).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to initialize.
    pub fn build(self) -> Result<SocietyClient, ClientError> {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let mut config = self
            .config
            .unwrap_or_else(|| ApiConfig::resolve(None, storage.as_ref()));

        if let Some(base_url) = self.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }

        let credentials = self.credentials.unwrap_or_else(|| {
            derive_credentials(&config.base_url, self.page_origin.as_deref())
        });

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| "society-client/0.1.0".to_string());
        let http = ClientBuilder::new().user_agent(user_agent).build()?;

        Ok(SocietyClient {
            http,
            config,
            credentials,
            sessions: SessionManager::new(storage),
        })
    }
}

/// Same-origin bases include cookies, cross-origin (or unknown) bases omit
/// them
fn derive_credentials(base_url: &str, page_origin: Option<&str>) -> CredentialsMode {
    let same_origin = || {
        let base = Url::parse(base_url).ok()?;
        let page = Url::parse(page_origin?).ok()?;
        Some(base.origin() == page.origin())
    };
    if same_origin().unwrap_or(false) {
        CredentialsMode::Include
    } else {
        CredentialsMode::Omit
    }
}
