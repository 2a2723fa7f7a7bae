//! Password reset (OTP) client methods

use serde_json::Value;

use super::SocietyClient;
use crate::error::ClientError;
use crate::types::{RequestOtpRequest, ResetPasswordRequest, VerifyOtpRequest};

impl SocietyClient {
    /// Request a one-time password via `POST /password-reset/request-otp`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn request_otp(&self, request: &RequestOtpRequest) -> Result<Value, ClientError> {
        self.post("/password-reset/request-otp", request).await
    }

    /// Verify a one-time password via `POST /password-reset/verify-otp`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<Value, ClientError> {
        self.post("/password-reset/verify-otp", request).await
    }

    /// Set a new password via `POST /password-reset/reset-password`
    ///
    /// # Errors
    ///
    /// Propagates request construction and execution errors.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<Value, ClientError> {
        self.post("/password-reset/reset-password", request).await
    }
}
