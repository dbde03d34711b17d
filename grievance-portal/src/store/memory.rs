//! In-memory storage implementation

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use grievance_core::{OtpRecord, Status};

use super::{
    AdminStore, AdminUser, Grievance, GrievanceFilter, GrievanceId, GrievanceStore, NewAdminUser,
    NewGrievance, OtpStore, Statistics, StoreResult,
};
use crate::error::PortalError;

/// In-memory portal store
pub struct InMemoryStore {
    otps: RwLock<HashMap<String, OtpRecord>>,
    grievances: RwLock<BTreeMap<GrievanceId, Grievance>>,
    admins: RwLock<HashMap<u64, AdminUser>>,
    next_grievance_id: AtomicU64,
    next_admin_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            otps: RwLock::new(HashMap::new()),
            grievances: RwLock::new(BTreeMap::new()),
            admins: RwLock::new(HashMap::new()),
            next_grievance_id: AtomicU64::new(1),
            next_admin_id: AtomicU64::new(1),
        }
    }

    /// Backdate the expiry of the live OTP for an email (for testing purposes)
    pub fn expire_otp(&self, email: &str) -> StoreResult<()> {
        let normalized = email.to_lowercase();
        let mut otps = self.otps.write().unwrap();
        if let Some(record) = otps.get_mut(&normalized) {
            record.expires_at = Utc::now() - Duration::minutes(1);
            Ok(())
        } else {
            Err(PortalError::Otp(grievance_core::OtpError::NotFound))
        }
    }

    /// Backdate a grievance's creation time (for testing purposes)
    pub fn set_created_at(
        &self,
        id: GrievanceId,
        created_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut grievances = self.grievances.write().unwrap();
        if let Some(record) = grievances.get_mut(&id) {
            record.created_at = created_at;
            Ok(())
        } else {
            Err(PortalError::GrievanceNotFound)
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpStore for InMemoryStore {
    fn put_otp(&self, record: OtpRecord) -> StoreResult<()> {
        let mut otps = self.otps.write().unwrap();
        otps.insert(record.email.clone(), record);
        Ok(())
    }

    fn latest_otp(&self, email: &str) -> StoreResult<Option<OtpRecord>> {
        let normalized = email.to_lowercase();
        Ok(self.otps.read().unwrap().get(&normalized).cloned())
    }

    fn mark_otp_verified(&self, email: &str, code: &str) -> StoreResult<()> {
        let normalized = email.to_lowercase();
        let mut otps = self.otps.write().unwrap();
        match otps.get_mut(&normalized) {
            Some(record) if record.code == code => {
                record.verified = true;
                Ok(())
            }
            _ => Err(PortalError::Otp(grievance_core::OtpError::NotFound)),
        }
    }
}

fn matches_filter(record: &Grievance, filter: &GrievanceFilter) -> bool {
    if let Some(status) = filter.status {
        if record.status != status {
            return false;
        }
    }
    if let Some(role) = filter.role {
        if record.role != role {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !record.name.to_lowercase().contains(&needle)
            && !record.email.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}

impl GrievanceStore for InMemoryStore {
    fn create_grievance(&self, new: NewGrievance) -> StoreResult<GrievanceId> {
        let id = self.next_grievance_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let record = Grievance {
            id,
            name: new.name,
            role: new.role,
            external_id: new.external_id,
            department: new.department,
            year: new.year,
            email: new.email,
            mobile: new.mobile,
            grievance_type: new.grievance_type,
            grievance: new.grievance,
            status: Status::Pending,
            email_verified: true,
            created_at: now,
            updated_at: now,
        };
        self.grievances.write().unwrap().insert(id, record);
        Ok(id)
    }

    fn get_grievance(&self, id: GrievanceId) -> StoreResult<Option<Grievance>> {
        Ok(self.grievances.read().unwrap().get(&id).cloned())
    }

    fn list_grievances(&self, filter: &GrievanceFilter) -> StoreResult<Vec<Grievance>> {
        let grievances = self.grievances.read().unwrap();
        let mut records: Vec<Grievance> = grievances
            .values()
            .filter(|g| matches_filter(g, filter))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    fn update_status(&self, id: GrievanceId, status: Status) -> StoreResult<()> {
        let mut grievances = self.grievances.write().unwrap();
        let record = grievances
            .get_mut(&id)
            .ok_or(PortalError::GrievanceNotFound)?;
        record.status = status;
        record.updated_at = Utc::now();
        Ok(())
    }

    fn statistics(&self, now: DateTime<Utc>) -> StoreResult<Statistics> {
        let grievances = self.grievances.read().unwrap();
        let mut stats = Statistics::default();
        let cutoff = now - Duration::days(7);
        for record in grievances.values() {
            stats.total += 1;
            *stats
                .by_status
                .entry(record.status.as_str().to_string())
                .or_insert(0) += 1;
            *stats
                .by_role
                .entry(record.role.as_str().to_string())
                .or_insert(0) += 1;
            if record.created_at >= cutoff {
                stats.recent_count += 1;
            }
        }
        Ok(stats)
    }
}

impl AdminStore for InMemoryStore {
    fn create_admin(&self, new: NewAdminUser) -> StoreResult<u64> {
        let id = self.next_admin_id.fetch_add(1, Ordering::SeqCst);
        let admin = AdminUser {
            id,
            username: new.username,
            password_hash: new.password_hash,
            email: new.email,
            full_name: new.full_name,
            role: new.role,
            is_first_login: true,
            last_login: None,
            created_at: Utc::now(),
        };
        self.admins.write().unwrap().insert(id, admin);
        Ok(id)
    }

    fn get_admin(&self, id: u64) -> StoreResult<Option<AdminUser>> {
        Ok(self.admins.read().unwrap().get(&id).cloned())
    }

    fn get_admin_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>> {
        let admins = self.admins.read().unwrap();
        Ok(admins.values().find(|a| a.username == username).cloned())
    }

    fn touch_last_login(&self, id: u64) -> StoreResult<()> {
        let mut admins = self.admins.write().unwrap();
        match admins.get_mut(&id) {
            Some(admin) => {
                admin.last_login = Some(Utc::now());
                Ok(())
            }
            None => Err(PortalError::AdminNotFound),
        }
    }

    fn update_admin_password(&self, id: u64, password_hash: &str) -> StoreResult<()> {
        let mut admins = self.admins.write().unwrap();
        match admins.get_mut(&id) {
            Some(admin) => {
                admin.password_hash = password_hash.to_string();
                admin.is_first_login = false;
                Ok(())
            }
            None => Err(PortalError::AdminNotFound),
        }
    }
}
