//! Health diagnostics and the development-base liveness probe
//!
//! Both operations are advisory: they log loudly, never block a page, and
//! never surface an error to the caller.

use std::time::Duration;

use reqwest::Method;
use tracing::{info, warn};

use society_core::{ApiConfig, Environment};

use crate::client::{ResponseBody, SocietyClient};

/// Timeout for the development-base liveness probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a health probing run
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Whether any health path responded successfully
    pub ok: bool,
    /// The first path that responded, when one did
    pub path_tried: Option<String>,
    /// The successful response body, when one was received
    pub response: Option<ResponseBody>,
    /// Stringified probing error, when probing itself broke
    pub error: Option<String>,
}

impl HealthReport {
    fn unreachable() -> Self {
        Self {
            ok: false,
            path_tried: None,
            response: None,
            error: None,
        }
    }
}

impl SocietyClient {
    /// Best-effort backend connectivity check.
    ///
    /// Tries the configured health paths in order and reports the first
    /// success. All paths failing is an `ok: false` report, not an error;
    /// this never blocks page interactivity.
    pub async fn ping(&self) -> HealthReport {
        for path in &self.config().endpoints.health_paths {
            let request = match self.request(Method::GET, path) {
                Ok(request) => request,
                Err(err) => {
                    warn!(%path, %err, "health probe could not build request");
                    return HealthReport {
                        error: Some(err.to_string()),
                        ..HealthReport::unreachable()
                    };
                }
            };
            match self.execute_raw(request).await {
                Ok(response) => {
                    info!(%path, "health OK");
                    return HealthReport {
                        ok: true,
                        path_tried: Some(path.clone()),
                        response: Some(response),
                        error: None,
                    };
                }
                Err(err) => {
                    warn!(%path, %err, "health path not responding");
                }
            }
        }
        warn!("health endpoints not responding");
        HealthReport::unreachable()
    }
}

/// Development-base liveness probe.
///
/// For a development configuration, issue a best-effort GET against the
/// base's `/health` path; when the local backend is unreachable, fall back
/// to the production base. Production configurations pass through
/// untouched. Never fails — a broken probe just means the fallback applies.
pub async fn probe_dev_base(config: ApiConfig) -> ApiConfig {
    if config.environment != Environment::Development {
        return config;
    }

    let probe_url = format!("{}/health", config.base_url.trim_end_matches('/'));
    let healthy = async {
        let client = reqwest::ClientBuilder::new().build().ok()?;
        let request = client.get(&probe_url);
        #[cfg(not(target_arch = "wasm32"))]
        let request = request.timeout(PROBE_TIMEOUT);
        let response = request.send().await.ok()?;
        response.status().is_success().then_some(())
    }
    .await
    .is_some();

    if healthy {
        info!(url = %probe_url, "dev health OK");
        config
    } else {
        warn!(url = %probe_url, "local dev API unreachable, switching to production base");
        config.forced_production()
    }
}
