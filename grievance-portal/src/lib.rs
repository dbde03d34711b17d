//! Grievance Portal Service
//!
//! HTTP service for the institutional grievance portal: OTP-gated submission,
//! public status tracking by sequential tracking ID, and token-authenticated
//! admin lifecycle management.

pub mod auth;
pub mod config;
pub mod crypto;
pub mod email;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub use auth::TokenAuthority;
pub use config::Config;
pub use email::{ConsoleNotifier, Notifier, SmtpConfig, SmtpNotifier};
pub use error::PortalError;
pub use state::AppState;
pub use store::{GrievanceStore, InMemoryStore, OtpStore, PortalStore, SqliteStore};
