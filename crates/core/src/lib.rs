//! Core types for the society API client: configuration resolution,
//! key-value storage, and the token/session lifecycle.

pub mod config;
pub mod error;
pub mod session;
pub mod storage;

pub use config::{ApiConfig, Endpoints, Environment};
pub use error::{CoreError, CoreResult};
pub use session::{IDLE_LIMIT_MS, Role, SessionManager, SessionRecord};
pub use storage::{MemoryStorage, Storage, keys};
