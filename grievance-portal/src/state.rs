//! Portal application state

use std::sync::Arc;

use chrono::Duration;
use grievance_core::SecretStore;

use crate::auth::TokenAuthority;
use crate::email::Notifier;
use crate::store::PortalStore;

/// Shared state handed to every handler. All dependencies are injected at
/// construction; there are no module-level singletons.
pub struct AppState<S, N> {
    pub store: Arc<S>,
    pub notifier: Arc<N>,
    pub secrets: SecretStore,
    pub tokens: TokenAuthority,
    pub otp_ttl: Duration,
}

impl<S, N> AppState<S, N>
where
    S: PortalStore,
    N: Notifier,
{
    pub fn new(
        store: S,
        notifier: N,
        secrets: SecretStore,
        tokens: TokenAuthority,
        otp_ttl_minutes: i64,
    ) -> Self {
        Self {
            store: Arc::new(store),
            notifier: Arc::new(notifier),
            secrets,
            tokens,
            otp_ttl: Duration::minutes(otp_ttl_minutes),
        }
    }
}
