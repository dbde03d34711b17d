//! Portal error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grievance_core::{OtpError, StatusError, ValidationError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("Email must be from @srivasaviengg.ac.in or @sves.org.in domain")]
    NotInstitutionalEmail,

    #[error("Email not verified. Please verify OTP first.")]
    EmailNotVerified,

    #[error("Grievance not found. Please check your tracking ID.")]
    GrievanceNotFound,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("No token provided")]
    NoToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Admin user not found")]
    AdminNotFound,

    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    #[error("New password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("Password must contain uppercase, lowercase, number, and special character")]
    PasswordTooWeak,

    #[error("Failed to send OTP email")]
    OtpDelivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = match &self {
            PortalError::Validation(_)
            | PortalError::NotInstitutionalEmail
            | PortalError::PasswordTooShort
            | PortalError::PasswordTooWeak => StatusCode::BAD_REQUEST,
            PortalError::Otp(OtpError::NotFound) => StatusCode::NOT_FOUND,
            PortalError::Otp(_) | PortalError::Status(_) => StatusCode::BAD_REQUEST,
            PortalError::EmailNotVerified => StatusCode::FORBIDDEN,
            PortalError::GrievanceNotFound | PortalError::AdminNotFound => StatusCode::NOT_FOUND,
            PortalError::InvalidCredentials
            | PortalError::NoToken
            | PortalError::InvalidToken
            | PortalError::WrongCurrentPassword => StatusCode::UNAUTHORIZED,
            PortalError::OtpDelivery(detail) => {
                tracing::error!(detail = %detail, "OTP delivery failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PortalError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Dependency failures keep their detail in the log, not the response.
        let message = match &self {
            PortalError::Internal(_) => "Server error".to_string(),
            other => other.to_string(),
        };

        let body = json!({ "success": false, "message": message });
        (status, axum::Json(body)).into_response()
    }
}
