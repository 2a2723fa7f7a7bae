//! Environment-aware API configuration
//!
//! Resolution happens once per page load and produces an immutable snapshot:
//! consumers never observe a base URL changing underneath them. Forcing a
//! different environment returns a fresh [`ApiConfig`] instead of mutating
//! shared state.

use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::storage::{Storage, keys};

/// Production backend origin
pub const PRODUCTION_BASE: &str = "https://back-end-11-uvgh.onrender.com";

/// Local development backend origin
pub const LOCAL_BASE: &str = "http://localhost:5000";

/// Default per-request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Which backend the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// The deployed backend; the default unless explicitly overridden
    Production,
    /// A locally running backend
    Development,
}

impl Environment {
    /// Parse the persisted `apiEnv` value.
    ///
    /// Only `"dev"` and `"prod"` are recognized; anything else reads as no
    /// override at all. Matching is case-insensitive.
    #[must_use]
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" => Some(Self::Development),
            "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

/// API route paths and probing candidate lists.
///
/// The fallback candidate lists are configuration data rather than hardcoded
/// branches so divergent page variants can share one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Generic registration route
    pub register: String,
    /// Generic login route
    pub login: String,
    /// Current-user route, requires a bearer token
    pub me: String,
    /// Generic data route
    pub data: String,
    /// Items collection route; item routes append `/:id`
    pub items: String,
    /// Health paths tried in order by diagnostics
    pub health_paths: Vec<String>,
    /// Login endpoints tried in order by fallback probing
    pub login_candidates: Vec<String>,
    /// Extended login endpoint list for the payload-variant grid
    pub login_variant_candidates: Vec<String>,
    /// Admin registration endpoints tried in order
    pub admin_register_candidates: Vec<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        let login = "/api/auth/login".to_string();
        Self {
            register: "/api/auth/register".to_string(),
            me: "/api/auth/me".to_string(),
            data: "/api/data".to_string(),
            items: "/api/items".to_string(),
            health_paths: vec![
                "/health".to_string(),
                "/api/health".to_string(),
                "/api/status".to_string(),
            ],
            login_candidates: vec![login.clone(), "/api/login".to_string()],
            login_variant_candidates: vec![
                login.clone(),
                "/api/login".to_string(),
                "/api/admins/login".to_string(),
                "/api/students/login".to_string(),
            ],
            admin_register_candidates: vec![
                "/api/admins/register".to_string(),
                "/api/auth/admin/register".to_string(),
            ],
            login,
        }
    }
}

/// Resolved client configuration, immutable for the page's lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Environment the base URL was resolved for
    pub environment: Environment,
    /// Origin all relative paths are resolved against, no trailing slash
    pub base_url: String,
    /// Route paths and probing candidates
    pub endpoints: Endpoints,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            base_url: PRODUCTION_BASE.to_string(),
            endpoints: Endpoints::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ApiConfig {
    /// Resolve the configuration for this page load.
    ///
    /// Precedence: `explicit` override, then the persisted `apiEnv` value,
    /// then production. A persisted `apiBaseOverride` replaces the mapped
    /// base entirely (trailing slashes stripped). Production is then guarded
    /// against loopback bases left over from development: such a base is
    /// forced back to the production origin with a diagnostic.
    ///
    /// Resolution never fails and has no side effects beyond storage reads
    /// and logging.
    #[must_use]
    pub fn resolve(explicit: Option<Environment>, storage: &dyn Storage) -> Self {
        let stored = storage
            .get(keys::API_ENV)
            .and_then(|value| Environment::from_stored(&value));
        let environment = explicit.or(stored).unwrap_or(Environment::Production);

        let mapped = match environment {
            Environment::Production => PRODUCTION_BASE,
            Environment::Development => LOCAL_BASE,
        };
        let mut base_url = storage
            .get(keys::API_BASE_OVERRIDE)
            .map(|base| base.trim_end_matches('/').to_string())
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| mapped.to_string());

        if environment == Environment::Production && is_loopback(&base_url) {
            warn!(
                base = %base_url,
                "production config points at a loopback host, forcing production base"
            );
            base_url = PRODUCTION_BASE.to_string();
        }

        info!(env = ?environment, base = %base_url, "resolved API configuration");

        Self {
            environment,
            base_url,
            endpoints: Endpoints::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Return a copy of this configuration pinned to the production base
    #[must_use]
    pub fn forced_production(&self) -> Self {
        info!(base = PRODUCTION_BASE, "forcing production base");
        Self {
            environment: Environment::Production,
            base_url: PRODUCTION_BASE.to_string(),
            endpoints: self.endpoints.clone(),
            timeout: self.timeout,
        }
    }

    /// Whether the base URL points at localhost
    #[must_use]
    pub fn is_dev_local_base(&self) -> bool {
        self.environment == Environment::Development && is_loopback(&self.base_url)
    }
}

/// Whether `base` names a loopback host
fn is_loopback(base: &str) -> bool {
    Url::parse(base)
        .ok()
        .and_then(|url| {
            url.host_str().map(|host| {
                matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
            })
        })
        .unwrap_or(false)
}
