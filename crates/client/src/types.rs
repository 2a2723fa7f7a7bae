//! Request and response types for the society backend.
//!
//! The backend's response shapes are loose and have drifted between
//! deployments, so responses that matter are modeled with defaulted optional
//! fields and everything else is passed through as `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use society_core::Role;

/// Generic registration body for `POST /api/auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Full name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Year of study, where the form collects it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

/// Login body for `POST /api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Student registration body for `POST /api/students/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRegisterRequest {
    /// Full name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// University registration number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_number: Option<String>,
    /// Year of study
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

/// Admin registration body for `POST /api/admins/register-code`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegisterCodeRequest {
    /// Full name
    pub name: String,
    /// Account email the admin code is sent to
    pub email: String,
    /// University registration number
    pub reg_number: String,
    /// Year of study
    pub year: String,
}

/// Passwordless admin login body for `POST /api/admins/login-code`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginCodeRequest {
    /// University registration number
    pub reg_number: String,
    /// Full name as registered
    pub name: String,
    /// Admin code received by email
    pub admin_code: String,
}

/// OTP request body for `POST /password-reset/request-otp`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOtpRequest {
    /// Account email the OTP is sent to
    pub email: String,
}

/// OTP verification body for `POST /password-reset/verify-otp`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    /// Account email
    pub email: String,
    /// One-time password from the email
    pub otp: String,
}

/// Password reset body for `POST /password-reset/reset-password`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Account email
    pub email: String,
    /// One-time password from the email
    pub otp: String,
    /// Replacement password
    pub new_password: String,
}

/// Login response as the drifting backends actually return it.
///
/// Any of the fields may be missing; `role` present means the login counts
/// as successful for session purposes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token, persisted when present
    #[serde(default)]
    pub token: Option<String>,
    /// Backend user identifier
    #[serde(default)]
    pub user_id: Option<Value>,
    /// Account email
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Login username, used as the name when no name is present
    #[serde(default)]
    pub username: Option<String>,
    /// Session role
    #[serde(default)]
    pub role: Option<Role>,
}

impl LoginResponse {
    /// Backend user id rendered as a string, whatever JSON type it came as
    #[must_use]
    pub fn user_id_string(&self) -> Option<String> {
        match self.user_id.as_ref()? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Best display name: `name`, then `username`, then the email local part
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| self.username.clone().filter(|name| !name.is_empty()))
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .map(ToString::to_string)
            })
    }
}
