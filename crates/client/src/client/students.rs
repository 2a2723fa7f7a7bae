//! Student registration client methods

use serde_json::Value;

use super::SocietyClient;
use crate::error::ClientError;
use crate::types::StudentRegisterRequest;

impl SocietyClient {
    /// Register a student via `POST /api/students/register`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn register_student(
        &self,
        request: &StudentRegisterRequest,
    ) -> Result<Value, ClientError> {
        self.post("/api/students/register", request).await
    }
}
