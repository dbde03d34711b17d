//! Administrator endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::require_admin;
use crate::crypto::{hash_password, password_is_strong, verify_password};
use crate::email::Notifier;
use crate::error::PortalError;
use crate::state::AppState;
use crate::store::PortalStore;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct AdminInfo {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub role: String,
    #[serde(rename = "isFirstLogin")]
    pub is_first_login: bool,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub admin: AdminInfo,
}

/// POST /api/admin/login
pub async fn login<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    let username = req.username.as_deref().map(str::trim).unwrap_or("");
    let password = req.password.as_deref().unwrap_or("");
    let mut missing = Vec::new();
    if username.is_empty() {
        missing.push("username".to_string());
    }
    if password.is_empty() {
        missing.push("password".to_string());
    }
    if !missing.is_empty() {
        return Err(grievance_core::ValidationError::MissingFields(missing).into());
    }

    let admin = state
        .store
        .get_admin_by_username(username)?
        .ok_or(PortalError::InvalidCredentials)?;

    let valid = verify_password(password, &admin.password_hash)
        .map_err(|e| PortalError::Internal(e.to_string()))?;
    if !valid {
        return Err(PortalError::InvalidCredentials);
    }

    state.store.touch_last_login(admin.id)?;
    let token = state.tokens.issue(&admin)?;

    tracing::info!(username = %admin.username, "Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        admin: AdminInfo {
            id: admin.id,
            username: admin.username,
            email: admin.email,
            full_name: admin.full_name,
            role: admin.role,
            is_first_login: admin.is_first_login,
        },
    }))
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "currentPassword")]
    pub current_password: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

#[derive(Serialize)]
pub struct ChangePasswordResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/admin/change-password
pub async fn change_password<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    headers: HeaderMap,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ChangePasswordResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    let claims = require_admin(&state.tokens, &headers)?;

    let current = req.current_password.as_deref().unwrap_or("");
    let new = req.new_password.as_deref().unwrap_or("");
    if current.is_empty() || new.is_empty() {
        return Err(grievance_core::ValidationError::MissingFields(vec![
            "currentPassword".to_string(),
            "newPassword".to_string(),
        ])
        .into());
    }

    if new.len() < 8 {
        return Err(PortalError::PasswordTooShort);
    }
    if !password_is_strong(new) {
        return Err(PortalError::PasswordTooWeak);
    }

    let admin = state
        .store
        .get_admin(claims.sub)?
        .ok_or(PortalError::AdminNotFound)?;

    let valid = verify_password(current, &admin.password_hash)
        .map_err(|e| PortalError::Internal(e.to_string()))?;
    if !valid {
        return Err(PortalError::WrongCurrentPassword);
    }

    let new_hash = hash_password(new).map_err(|e| PortalError::Internal(e.to_string()))?;
    state.store.update_admin_password(admin.id, &new_hash)?;

    tracing::info!(username = %admin.username, "Admin password changed");

    Ok(Json(ChangePasswordResponse {
        success: true,
        message: "Password changed successfully".to_string(),
    }))
}

#[derive(Serialize)]
pub struct ProfileData {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_first_login: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub data: ProfileData,
}

/// GET /api/admin/profile
pub async fn profile<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    let claims = require_admin(&state.tokens, &headers)?;

    let admin = state
        .store
        .get_admin(claims.sub)?
        .ok_or(PortalError::AdminNotFound)?;

    Ok(Json(ProfileResponse {
        success: true,
        data: ProfileData {
            id: admin.id,
            username: admin.username,
            email: admin.email,
            full_name: admin.full_name,
            role: admin.role,
            is_first_login: admin.is_first_login,
            last_login: admin.last_login,
            created_at: admin.created_at,
        },
    }))
}

#[derive(Serialize)]
pub struct VerifyTokenResponse {
    pub success: bool,
    pub message: String,
    pub admin: VerifiedAdmin,
}

#[derive(Serialize)]
pub struct VerifiedAdmin {
    pub id: u64,
    pub username: String,
    pub role: String,
}

/// GET /api/admin/verify-token
pub async fn verify_token<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    headers: HeaderMap,
) -> Result<Json<VerifyTokenResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    let claims = require_admin(&state.tokens, &headers)?;

    Ok(Json(VerifyTokenResponse {
        success: true,
        message: "Token is valid".to_string(),
        admin: VerifiedAdmin {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        },
    }))
}

#[derive(Serialize)]
pub struct StatisticsData {
    pub total: u64,
    #[serde(rename = "byStatus")]
    pub by_status: std::collections::BTreeMap<String, u64>,
    #[serde(rename = "byRole")]
    pub by_role: std::collections::BTreeMap<String, u64>,
    #[serde(rename = "recentCount")]
    pub recent_count: u64,
}

#[derive(Serialize)]
pub struct StatisticsResponse {
    pub success: bool,
    pub data: StatisticsData,
}

/// GET /api/admin/statistics
pub async fn statistics<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    headers: HeaderMap,
) -> Result<Json<StatisticsResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    require_admin(&state.tokens, &headers)?;

    let stats = state.store.statistics(Utc::now())?;

    Ok(Json(StatisticsResponse {
        success: true,
        data: StatisticsData {
            total: stats.total,
            by_status: stats.by_status,
            by_role: stats.by_role,
            recent_count: stats.recent_count,
        },
    }))
}
