//! Grievance Portal Service
//!
//! OTP-gated grievance submission and tracking for an educational institution,
//! with token-authenticated admin lifecycle management.

use std::sync::Arc;

use anyhow::{Context, Result};
use grievance_core::SecretStore;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grievance_portal::store::{AdminStore, NewAdminUser};
use grievance_portal::{
    crypto, routes, AppState, Config, ConsoleNotifier, InMemoryStore, Notifier, SmtpConfig,
    SmtpNotifier, SqliteStore, TokenAuthority,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grievance_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!(port = config.port, "Loaded configuration");

    // Field encryption key
    let secrets = match &config.encryption_key {
        Some(key) => SecretStore::new(key),
        None => {
            tracing::warn!(
                "ENCRYPTION_KEY not set; falling back to the insecure development key"
            );
            SecretStore::insecure_fallback()
        }
    };

    // Admin token secret
    let jwt_secret = match &config.jwt_secret {
        Some(secret) => secret.clone(),
        None => {
            tracing::warn!(
                "JWT_SECRET not set; generating a per-process secret (tokens will not \
                 survive a restart)"
            );
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(48)
                .map(char::from)
                .collect()
        }
    };
    let tokens = TokenAuthority::new(&jwt_secret, config.jwt_ttl_hours);

    // Notifier: SMTP when configured, console otherwise
    let notifier: Box<dyn Notifier> = match SmtpConfig::from_env() {
        Some(smtp) => Box::new(
            SmtpNotifier::new(smtp).map_err(|e| anyhow::anyhow!("SMTP setup failed: {e}"))?,
        ),
        None => {
            tracing::info!("SMTP not configured; emails will be logged to the console");
            Box::new(ConsoleNotifier::new())
        }
    };

    // Store: SQLite when a path is configured, in-memory otherwise
    match &config.database_path {
        Some(path) => {
            let store = SqliteStore::open(path)
                .map_err(|e| anyhow::anyhow!("Failed to open database at {path}: {e}"))?;
            tracing::info!(path = %path, "Using SQLite store");
            seed_admin(&store, &config)?;
            serve(AppState::new(
                store,
                notifier,
                secrets,
                tokens,
                config.otp_ttl_minutes,
            ), config.port)
            .await
        }
        None => {
            tracing::warn!("DATABASE_PATH not set; using the in-memory store");
            let store = InMemoryStore::new();
            seed_admin(&store, &config)?;
            serve(AppState::new(
                store,
                notifier,
                secrets,
                tokens,
                config.otp_ttl_minutes,
            ), config.port)
            .await
        }
    }
}

/// Seed the bootstrap admin account when configured and not already present.
fn seed_admin<S: AdminStore>(store: &S, config: &Config) -> Result<()> {
    let Some(bootstrap) = &config.admin_bootstrap else {
        return Ok(());
    };
    if store
        .get_admin_by_username(&bootstrap.username)
        .map_err(|e| anyhow::anyhow!("Admin lookup failed: {e}"))?
        .is_some()
    {
        return Ok(());
    }
    let password_hash =
        crypto::hash_password(&bootstrap.password).context("Failed to hash admin password")?;
    store
        .create_admin(NewAdminUser {
            username: bootstrap.username.clone(),
            password_hash,
            email: bootstrap.email.clone(),
            full_name: bootstrap.full_name.clone(),
            role: "admin".to_string(),
        })
        .map_err(|e| anyhow::anyhow!("Failed to create admin: {e}"))?;
    tracing::info!(username = %bootstrap.username, "Seeded bootstrap admin account");
    Ok(())
}

async fn serve<S, N>(state: AppState<S, N>, port: u16) -> Result<()>
where
    S: grievance_portal::PortalStore + 'static,
    N: Notifier + 'static,
{
    let app = routes::create_router(Arc::new(state));

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Grievance portal listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
