//! Data models for portal storage

use chrono::{DateTime, Utc};
use grievance_core::{Role, Status};

/// Public tracking identifier, assigned sequentially by the store.
pub type GrievanceId = u64;

/// A persisted grievance. `grievance_type` and `grievance` hold ciphertext as
/// written by the secret store (or legacy plaintext for pre-encryption rows).
#[derive(Debug, Clone)]
pub struct Grievance {
    pub id: GrievanceId,
    pub name: String,
    pub role: Role,
    /// Roll number (students) or staff ID
    pub external_id: String,
    pub department: String,
    /// Study year; students only
    pub year: Option<String>,
    pub email: String,
    pub mobile: String,
    pub grievance_type: String,
    pub grievance: String,
    pub status: Status,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a grievance. The store assigns the id and timestamps;
/// the workflow has already encrypted the sensitive fields and verified the email.
#[derive(Debug, Clone)]
pub struct NewGrievance {
    pub name: String,
    pub role: Role,
    pub external_id: String,
    pub department: String,
    pub year: Option<String>,
    pub email: String,
    pub mobile: String,
    pub grievance_type: String,
    pub grievance: String,
}

/// Admin listing filter; all criteria are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct GrievanceFilter {
    pub status: Option<Status>,
    pub role: Option<Role>,
    /// Case-insensitive substring match over name and email
    pub search: Option<String>,
}

/// An administrator account.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_first_login: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an admin account.
#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

/// Dashboard counters.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub total: u64,
    /// Counts keyed by status string
    pub by_status: std::collections::BTreeMap<String, u64>,
    /// Counts keyed by role string
    pub by_role: std::collections::BTreeMap<String, u64>,
    /// Grievances created in the last 7 days
    pub recent_count: u64,
}
