//! Portal configuration

use grievance_core::otp::DEFAULT_TTL_MINUTES;

/// Default JWT lifetime for admin tokens, in hours.
pub const DEFAULT_JWT_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// SQLite database path; unset runs with the in-memory store
    pub database_path: Option<String>,

    /// OTP lifetime in minutes
    pub otp_ttl_minutes: i64,

    /// Passphrase for field encryption; unset falls back to the insecure
    /// development key (logged as a warning at startup)
    pub encryption_key: Option<String>,

    /// Secret for admin JWT signing; unset generates a per-process secret
    pub jwt_secret: Option<String>,

    /// Admin token lifetime in hours
    pub jwt_ttl_hours: i64,

    /// Initial admin account seeded at startup when no admin exists
    pub admin_bootstrap: Option<AdminBootstrap>,
}

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        fn get_env(key: &str) -> Option<String> {
            std::env::var(key).ok().filter(|s| !s.is_empty())
        }

        let port = get_env("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);

        let otp_ttl_minutes = get_env("OTP_EXPIRY_MINUTES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TTL_MINUTES);

        let jwt_ttl_hours = get_env("JWT_EXPIRY_HOURS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_JWT_TTL_HOURS);

        let admin_bootstrap = match (get_env("ADMIN_USERNAME"), get_env("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminBootstrap {
                email: get_env("ADMIN_EMAIL").unwrap_or_default(),
                full_name: get_env("ADMIN_FULL_NAME").unwrap_or_else(|| username.clone()),
                username,
                password,
            }),
            _ => None,
        };

        Self {
            port,
            database_path: get_env("DATABASE_PATH"),
            otp_ttl_minutes,
            encryption_key: get_env("ENCRYPTION_KEY"),
            jwt_secret: get_env("JWT_SECRET"),
            jwt_ttl_hours,
            admin_bootstrap,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            database_path: None,
            otp_ttl_minutes: DEFAULT_TTL_MINUTES,
            encryption_key: None,
            jwt_secret: None,
            jwt_ttl_hours: DEFAULT_JWT_TTL_HOURS,
            admin_bootstrap: None,
        }
    }
}
