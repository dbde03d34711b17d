//! Grievance Portal Core Library
//!
//! Domain logic for the institutional grievance portal:
//! - Email ownership is proven with short-lived one-time codes before submission
//! - Sensitive grievance text is encrypted at rest with a process-wide key
//! - Grievance status moves through a one-way lattice with terminal states

pub mod error;
pub mod otp;
pub mod secret;
pub mod status;
pub mod validate;

pub use error::{OtpError, SecretError, StatusError, ValidationError};
pub use otp::OtpRecord;
pub use secret::SecretStore;
pub use status::{Status, Transition};
pub use validate::Role;
