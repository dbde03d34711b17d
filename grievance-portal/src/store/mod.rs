//! Storage abstractions for the portal

pub mod memory;
pub mod models;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use models::*;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use grievance_core::{OtpRecord, Status};

use crate::error::PortalError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, PortalError>;

/// OTP ledger persistence. One live record per email: storing a new record
/// replaces whatever was there before.
pub trait OtpStore: Send + Sync {
    /// Store a record, superseding any prior record for the same email
    fn put_otp(&self, record: OtpRecord) -> StoreResult<()>;

    /// Fetch the most recent record for an email (lowercased lookup)
    fn latest_otp(&self, email: &str) -> StoreResult<Option<OtpRecord>>;

    /// Mark the record for email+code as consumed
    fn mark_otp_verified(&self, email: &str, code: &str) -> StoreResult<()>;
}

/// Grievance record persistence.
pub trait GrievanceStore: Send + Sync {
    /// Persist a new grievance with `status = pending` and `email_verified = true`,
    /// returning the assigned sequential tracking id
    fn create_grievance(&self, new: NewGrievance) -> StoreResult<GrievanceId>;

    /// Fetch a grievance by tracking id
    fn get_grievance(&self, id: GrievanceId) -> StoreResult<Option<Grievance>>;

    /// Filtered listing, newest first
    fn list_grievances(&self, filter: &GrievanceFilter) -> StoreResult<Vec<Grievance>>;

    /// Persist a status change and refresh `updated_at`
    fn update_status(&self, id: GrievanceId, status: Status) -> StoreResult<()>;

    /// Dashboard counters
    fn statistics(&self, now: DateTime<Utc>) -> StoreResult<Statistics>;
}

/// Administrator account persistence.
pub trait AdminStore: Send + Sync {
    fn create_admin(&self, new: NewAdminUser) -> StoreResult<u64>;

    fn get_admin(&self, id: u64) -> StoreResult<Option<AdminUser>>;

    fn get_admin_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>>;

    /// Record a successful login
    fn touch_last_login(&self, id: u64) -> StoreResult<()>;

    /// Replace the password hash and clear the first-login flag
    fn update_admin_password(&self, id: u64, password_hash: &str) -> StoreResult<()>;
}

/// Everything the portal needs from one backing store.
pub trait PortalStore: OtpStore + GrievanceStore + AdminStore {}

impl<T: OtpStore + GrievanceStore + AdminStore> PortalStore for T {}
