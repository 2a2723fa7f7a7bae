//! Admin registration, code-flow login and record listing client methods

use serde_json::Value;

use super::SocietyClient;
use crate::error::ClientError;
use crate::types::{AdminLoginCodeRequest, AdminRegisterCodeRequest, LoginResponse};

impl SocietyClient {
    /// Register an admin via the code flow, `POST /api/admins/register-code`.
    /// The backend emails an admin code used later for login.
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn register_admin_code(
        &self,
        request: &AdminRegisterCodeRequest,
    ) -> Result<Value, ClientError> {
        self.post("/api/admins/register-code", request).await
    }

    /// Ask the backend to resend the admin code, `POST /api/admins/resend-code`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn resend_admin_code(
        &self,
        request: &AdminRegisterCodeRequest,
    ) -> Result<Value, ClientError> {
        self.post("/api/admins/resend-code", request).await
    }

    /// Passwordless admin login via `POST /api/admins/login-code`.
    ///
    /// Persists the returned token and session record like
    /// [`login_user`](Self::login_user) does.
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn login_admin_code(
        &self,
        request: &AdminLoginCodeRequest,
    ) -> Result<LoginResponse, ClientError> {
        let response: LoginResponse = self.post("/api/admins/login-code", request).await?;
        self.establish_session(&response);
        Ok(response)
    }

    /// List admin accounts via `GET /api/admins`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn list_admins(&self) -> Result<Value, ClientError> {
        self.get("/api/admins").await
    }

    /// List student records via `GET /api/admins/students`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn list_students(&self) -> Result<Value, ClientError> {
        self.get("/api/admins/students").await
    }

    /// List payment records via `GET /api/admins/payments`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn list_payments(&self) -> Result<Value, ClientError> {
        self.get("/api/admins/payments").await
    }
}
