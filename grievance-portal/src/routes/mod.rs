//! HTTP routes for the portal

mod admin;
mod grievance;
mod otp;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::email::Notifier;
use crate::state::AppState;
use crate::store::PortalStore;

/// Create the router with all routes
pub fn create_router<S, N>(state: Arc<AppState<S, N>>) -> Router
where
    S: PortalStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/health", get(health))
        // public grievance flow
        .route("/api/send-otp", post(otp::send_otp))
        .route("/api/verify-otp", post(otp::verify_otp))
        .route("/api/submit-grievance", post(grievance::submit_grievance))
        .route("/api/grievances/track/:id", get(grievance::track_grievance))
        // admin
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/change-password", post(admin::change_password))
        .route("/api/admin/profile", get(admin::profile))
        .route("/api/admin/verify-token", get(admin::verify_token))
        .route("/api/admin/statistics", get(admin::statistics))
        .route("/api/grievances", get(grievance::list_grievances))
        .route("/api/grievances/:id", get(grievance::get_grievance))
        .route("/api/grievances/:id/status", patch(grievance::update_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /api/health
async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": chrono::Utc::now(),
    }))
}
