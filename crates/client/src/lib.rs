//! Environment-aware API client for the society backend.
//!
//! Resolves which backend origin to talk to, wraps the HTTP transport with
//! timeout, bearer-token and error-normalization policy, and layers endpoint
//! fallback probing and health diagnostics on top for the unstable parts of
//! the route surface.

pub mod client;
pub mod error;
pub mod fallback;
pub mod health;
pub mod types;

pub use client::{CredentialsMode, ResponseBody, SocietyClient, SocietyClientBuilder};
pub use error::ClientError;
pub use fallback::{FallbackOutcome, PayloadShape};
pub use health::{HealthReport, probe_dev_base};
