//! OTP issue and verify endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use grievance_core::validate::{is_institutional_email, is_plausible_email};
use grievance_core::{OtpError, OtpRecord, ValidationError};
use serde::{Deserialize, Serialize};

use crate::email::{templates, Notifier};
use crate::error::PortalError;
use crate::state::AppState;
use crate::store::PortalStore;

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/send-otp
///
/// Issues a fresh code for the address, superseding any outstanding one.
/// Delivery failure is fatal here: without the mail the caller cannot proceed.
pub async fn send_otp<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ValidationError::MissingFields(vec!["email".to_string()]))?;

    if !is_plausible_email(email) {
        return Err(ValidationError::InvalidEmailFormat.into());
    }

    // Role is unknown until submission; accept either institutional domain here
    if !is_institutional_email(email) {
        return Err(PortalError::NotInstitutionalEmail);
    }

    let record = OtpRecord::issue(email, state.otp_ttl, Utc::now());
    let code = record.code.clone();
    let normalized = record.email.clone();
    state.store.put_otp(record)?;

    let (subject, body) = templates::otp_email(&code, state.otp_ttl.num_minutes());
    state
        .notifier
        .send(&normalized, &subject, &body)
        .map_err(PortalError::OtpDelivery)?;

    tracing::info!(email = %normalized, "OTP issued");

    Ok(Json(SendOtpResponse {
        success: true,
        message: "OTP sent to your email".to_string(),
    }))
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/verify-otp
///
/// Checks the supplied code against the most recent record for the email and
/// consumes it on success. Older superseded codes are never checkable.
pub async fn verify_otp<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    let mut missing = Vec::new();
    let email = req.email.as_deref().map(str::trim).unwrap_or("");
    let otp = req.otp.as_deref().map(str::trim).unwrap_or("");
    if email.is_empty() {
        missing.push("email".to_string());
    }
    if otp.is_empty() {
        missing.push("otp".to_string());
    }
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing).into());
    }

    let record = state
        .store
        .latest_otp(email)?
        .ok_or(PortalError::Otp(OtpError::NotFound))?;

    record.check(otp, Utc::now())?;

    state.store.mark_otp_verified(email, otp)?;

    tracing::info!(email = %record.email, "OTP verified");

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
    }))
}
