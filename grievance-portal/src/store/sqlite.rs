//! SQLite-based storage implementation

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use grievance_core::{OtpRecord, Role, Status};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{
    AdminStore, AdminUser, Grievance, GrievanceFilter, GrievanceId, GrievanceStore, NewAdminUser,
    NewGrievance, OtpStore, Statistics, StoreResult,
};
use crate::error::PortalError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQLite-based store implementing OtpStore, GrievanceStore and AdminStore
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, PortalError> {
        let conn = Connection::open(path).map_err(internal)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(internal)?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), PortalError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(internal)?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, PortalError> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(internal)?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })
        .map_err(internal)
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), PortalError> {
        conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- One live OTP per email; issuing replaces the prior row
            CREATE TABLE IF NOT EXISTS otps (
                email TEXT PRIMARY KEY,
                code TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                verified INTEGER NOT NULL DEFAULT 0
            );

            -- Grievances; id doubles as the public tracking identifier
            CREATE TABLE IF NOT EXISTS grievances (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                external_id TEXT NOT NULL,
                department TEXT NOT NULL,
                year TEXT,
                email TEXT NOT NULL,
                mobile TEXT NOT NULL,
                grievance_type TEXT NOT NULL,
                grievance TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                email_verified INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_grievances_status ON grievances(status);
            CREATE INDEX IF NOT EXISTS idx_grievances_email ON grievances(email);

            -- Administrator accounts
            CREATE TABLE IF NOT EXISTS admin_users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                email TEXT NOT NULL,
                full_name TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'admin',
                is_first_login INTEGER NOT NULL DEFAULT 1,
                last_login TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(internal)?;

        Ok(())
    }
}

fn internal(e: rusqlite::Error) -> PortalError {
    PortalError::Internal(e.to_string())
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn column_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn grievance_from_row(row: &Row<'_>) -> rusqlite::Result<Grievance> {
    let id: i64 = row.get(0)?;
    let role: String = row.get(2)?;
    let status: String = row.get(10)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;
    Ok(Grievance {
        id: id as GrievanceId,
        name: row.get(1)?,
        role: Role::parse(&role).map_err(|e| column_error(2, e))?,
        external_id: row.get(3)?,
        department: row.get(4)?,
        year: row.get(5)?,
        email: row.get(6)?,
        mobile: row.get(7)?,
        grievance_type: row.get(8)?,
        grievance: row.get(9)?,
        status: Status::parse(&status).map_err(|e| column_error(10, e))?,
        email_verified: row.get::<_, i32>(11)? != 0,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

const GRIEVANCE_COLUMNS: &str = "id, name, role, external_id, department, year, email, mobile, \
     grievance_type, grievance, status, email_verified, created_at, updated_at";

fn admin_from_row(row: &Row<'_>) -> rusqlite::Result<AdminUser> {
    let id: i64 = row.get(0)?;
    let last_login: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;
    Ok(AdminUser {
        id: id as u64,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        email: row.get(3)?,
        full_name: row.get(4)?,
        role: row.get(5)?,
        is_first_login: row.get::<_, i32>(6)? != 0,
        last_login: last_login.as_deref().map(parse_datetime),
        created_at: parse_datetime(&created_at),
    })
}

const ADMIN_COLUMNS: &str =
    "id, username, password_hash, email, full_name, role, is_first_login, last_login, created_at";

impl OtpStore for SqliteStore {
    fn put_otp(&self, record: OtpRecord) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO otps (email, code, created_at, expires_at, verified) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.email,
                record.code,
                record.created_at.to_rfc3339(),
                record.expires_at.to_rfc3339(),
                record.verified as i32,
            ],
        )
        .map_err(internal)?;
        Ok(())
    }

    fn latest_otp(&self, email: &str) -> StoreResult<Option<OtpRecord>> {
        let normalized = email.to_lowercase();
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT email, code, created_at, expires_at, verified FROM otps WHERE email = ?1",
            params![normalized],
            |row| {
                let created_at: String = row.get(2)?;
                let expires_at: String = row.get(3)?;
                Ok(OtpRecord {
                    email: row.get(0)?,
                    code: row.get(1)?,
                    created_at: parse_datetime(&created_at),
                    expires_at: parse_datetime(&expires_at),
                    verified: row.get::<_, i32>(4)? != 0,
                })
            },
        )
        .optional()
        .map_err(internal)
    }

    fn mark_otp_verified(&self, email: &str, code: &str) -> StoreResult<()> {
        let normalized = email.to_lowercase();
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE otps SET verified = 1 WHERE email = ?1 AND code = ?2",
                params![normalized, code],
            )
            .map_err(internal)?;
        if changed == 0 {
            return Err(PortalError::Otp(grievance_core::OtpError::NotFound));
        }
        Ok(())
    }
}

impl GrievanceStore for SqliteStore {
    fn create_grievance(&self, new: NewGrievance) -> StoreResult<GrievanceId> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO grievances \
             (name, role, external_id, department, year, email, mobile, grievance_type, \
              grievance, status, email_verified, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'pending', 1, ?10, ?10)",
            params![
                new.name,
                new.role.as_str(),
                new.external_id,
                new.department,
                new.year,
                new.email,
                new.mobile,
                new.grievance_type,
                new.grievance,
                now,
            ],
        )
        .map_err(internal)?;
        Ok(conn.last_insert_rowid() as GrievanceId)
    }

    fn get_grievance(&self, id: GrievanceId) -> StoreResult<Option<Grievance>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {GRIEVANCE_COLUMNS} FROM grievances WHERE id = ?1"),
            params![id as i64],
            grievance_from_row,
        )
        .optional()
        .map_err(internal)
    }

    fn list_grievances(&self, filter: &GrievanceFilter) -> StoreResult<Vec<Grievance>> {
        let mut sql = format!("SELECT {GRIEVANCE_COLUMNS} FROM grievances WHERE 1=1");
        let mut values: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            values.push(status.as_str().to_string());
            sql.push_str(&format!(" AND status = ?{}", values.len()));
        }
        if let Some(role) = filter.role {
            values.push(role.as_str().to_string());
            sql.push_str(&format!(" AND role = ?{}", values.len()));
        }
        if let Some(search) = &filter.search {
            values.push(format!("%{}%", search.to_lowercase()));
            let idx = values.len();
            sql.push_str(&format!(
                " AND (LOWER(name) LIKE ?{idx} OR LOWER(email) LIKE ?{idx})"
            ));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql).map_err(internal)?;
        let records = stmt
            .query_map(params_from_iter(values.iter()), grievance_from_row)
            .map_err(internal)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(internal)?;
        Ok(records)
    }

    fn update_status(&self, id: GrievanceId, status: Status) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE grievances SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), Utc::now().to_rfc3339(), id as i64],
            )
            .map_err(internal)?;
        if changed == 0 {
            return Err(PortalError::GrievanceNotFound);
        }
        Ok(())
    }

    fn statistics(&self, now: DateTime<Utc>) -> StoreResult<Statistics> {
        let conn = self.conn.lock().unwrap();
        let mut stats = Statistics::default();

        stats.total = conn
            .query_row("SELECT COUNT(*) FROM grievances", [], |row| {
                row.get::<_, i64>(0)
            })
            .map_err(internal)? as u64;

        let mut stmt = conn
            .prepare("SELECT status, COUNT(*) FROM grievances GROUP BY status")
            .map_err(internal)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(internal)?;
        for row in rows {
            let (status, count) = row.map_err(internal)?;
            stats.by_status.insert(status, count as u64);
        }

        let mut stmt = conn
            .prepare("SELECT role, COUNT(*) FROM grievances GROUP BY role")
            .map_err(internal)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(internal)?;
        for row in rows {
            let (role, count) = row.map_err(internal)?;
            stats.by_role.insert(role, count as u64);
        }

        // RFC 3339 UTC timestamps compare correctly as strings
        let cutoff = (now - Duration::days(7)).to_rfc3339();
        stats.recent_count = conn
            .query_row(
                "SELECT COUNT(*) FROM grievances WHERE created_at >= ?1",
                params![cutoff],
                |row| row.get::<_, i64>(0),
            )
            .map_err(internal)? as u64;

        Ok(stats)
    }
}

impl AdminStore for SqliteStore {
    fn create_admin(&self, new: NewAdminUser) -> StoreResult<u64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO admin_users (username, password_hash, email, full_name, role, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.username,
                new.password_hash,
                new.email,
                new.full_name,
                new.role,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(internal)?;
        Ok(conn.last_insert_rowid() as u64)
    }

    fn get_admin(&self, id: u64) -> StoreResult<Option<AdminUser>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {ADMIN_COLUMNS} FROM admin_users WHERE id = ?1"),
            params![id as i64],
            admin_from_row,
        )
        .optional()
        .map_err(internal)
    }

    fn get_admin_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {ADMIN_COLUMNS} FROM admin_users WHERE username = ?1"),
            params![username],
            admin_from_row,
        )
        .optional()
        .map_err(internal)
    }

    fn touch_last_login(&self, id: u64) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE admin_users SET last_login = ?1 WHERE id = ?2",
                params![Utc::now().to_rfc3339(), id as i64],
            )
            .map_err(internal)?;
        if changed == 0 {
            return Err(PortalError::AdminNotFound);
        }
        Ok(())
    }

    fn update_admin_password(&self, id: u64, password_hash: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE admin_users SET password_hash = ?1, is_first_login = 0 WHERE id = ?2",
                params![password_hash, id as i64],
            )
            .map_err(internal)?;
        if changed == 0 {
            return Err(PortalError::AdminNotFound);
        }
        Ok(())
    }
}
