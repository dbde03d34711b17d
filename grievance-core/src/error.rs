//! Error types for the grievance portal core

use thiserror::Error;

/// Outcomes of checking a one-time code against the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    #[error("No OTP found for this email")]
    NotFound,

    #[error("OTP already used")]
    AlreadyConsumed,

    #[error("OTP has expired")]
    Expired,

    #[error("Invalid OTP")]
    Mismatch,
}

/// Submission payload validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid email domain. {role_label} must use {expected} email.")]
    InvalidEmailDomain {
        role_label: &'static str,
        expected: &'static str,
    },

    #[error("Invalid {role_label} ID format. Use format: {example}")]
    InvalidIdFormat {
        role_label: &'static str,
        example: &'static str,
    },

    #[error("Invalid email format")]
    InvalidEmailFormat,
}

/// Status lifecycle failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("Invalid status. Must be: pending, in-progress, resolved, or rejected")]
    Unknown(String),

    #[error("Status is final and cannot be changed after it is resolved or rejected.")]
    Immutable,
}

/// Field encryption failures.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Ciphertext decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Field decryption failed")]
    Crypto,
}
