//! Grievance submission, tracking, and lifecycle endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use grievance_core::status::{plan_transition, Transition};
use grievance_core::validate::{check_email_domain, check_external_id, require_fields};
use grievance_core::{Role, Status, StatusError};
use serde::{Deserialize, Serialize};

use crate::auth::require_admin;
use crate::email::{templates, Notifier};
use crate::error::PortalError;
use crate::state::AppState;
use crate::store::{Grievance, GrievanceFilter, NewGrievance, PortalStore};

#[derive(Deserialize)]
pub struct SubmitGrievanceRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    /// Roll number (students) or staff ID
    pub id: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    #[serde(rename = "grievanceType")]
    pub grievance_type: Option<String>,
    pub grievance: Option<String>,
}

#[derive(Serialize)]
pub struct SubmitGrievanceResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "trackingId")]
    pub tracking_id: u64,
}

/// POST /api/submit-grievance
///
/// The submission workflow: validate, authorize against the OTP ledger, encrypt,
/// persist, notify. Confirmation delivery is fire-and-forget; the record stands
/// whether or not the mail goes out.
pub async fn submit_grievance<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Json(req): Json<SubmitGrievanceRequest>,
) -> Result<Json<SubmitGrievanceResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    let name = req.name.as_deref().unwrap_or("").trim();
    let role_str = req.role.as_deref().unwrap_or("").trim();
    let external_id = req.id.as_deref().unwrap_or("").trim();
    let department = req.department.as_deref().unwrap_or("").trim();
    let email = req.email.as_deref().unwrap_or("").trim();
    let mobile = req.mobile.as_deref().unwrap_or("").trim();
    let grievance_type = req.grievance_type.as_deref().unwrap_or("").trim();
    let grievance = req.grievance.as_deref().unwrap_or("").trim();

    // 1. field presence
    require_fields(&[
        ("name", name),
        ("role", role_str),
        ("id", external_id),
        ("department", department),
        ("email", email),
        ("mobile", mobile),
        ("grievanceType", grievance_type),
        ("grievance", grievance),
    ])?;

    // 2. role and role-bound email domain
    let role = Role::parse(role_str)?;
    check_email_domain(email, role)?;

    // 3. role-bound external-ID format
    check_external_id(external_id, role)?;

    // 4. authorization: the email must carry a verified OTP. This is the sole
    //    gate; there are no end-user accounts.
    let verified = state
        .store
        .latest_otp(email)?
        .map(|record| record.verified)
        .unwrap_or(false);
    if !verified {
        return Err(PortalError::EmailNotVerified);
    }

    // 5. encrypt sensitive fields independently
    let encrypted_type = state
        .secrets
        .encrypt(grievance_type)
        .map_err(|e| PortalError::Internal(e.to_string()))?;
    let encrypted_body = state
        .secrets
        .encrypt(grievance)
        .map_err(|e| PortalError::Internal(e.to_string()))?;

    // 6. persist; the store assigns the tracking id
    let tracking_id = state.store.create_grievance(NewGrievance {
        name: name.to_string(),
        role,
        external_id: external_id.to_string(),
        department: department.to_string(),
        year: req
            .year
            .as_deref()
            .map(str::trim)
            .filter(|y| !y.is_empty())
            .map(String::from),
        email: email.to_string(),
        mobile: mobile.to_string(),
        grievance_type: encrypted_type,
        grievance: encrypted_body,
    })?;

    tracing::info!(id = tracking_id, role = %role, "Grievance submitted");

    // 7. confirmation mail; failure never unwinds the persisted record
    let (subject, body) = templates::tracking_email(tracking_id, name, grievance_type);
    if let Err(reason) = state.notifier.send(email, &subject, &body) {
        tracing::warn!(id = tracking_id, reason = %reason, "Failed to send tracking email");
    }

    Ok(Json(SubmitGrievanceResponse {
        success: true,
        message: "Grievance submitted successfully! Check your email for tracking ID."
            .to_string(),
        tracking_id,
    }))
}

/// Public tracking view: no grievance body, no contact fields.
#[derive(Serialize)]
pub struct TrackResponse {
    pub id: u64,
    pub name: String,
    pub department: String,
    pub grievance_type: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// GET /api/grievances/track/:id
pub async fn track_grievance<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Path(id): Path<u64>,
) -> Result<Json<TrackResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    let record = state
        .store
        .get_grievance(id)?
        .ok_or(PortalError::GrievanceNotFound)?;

    Ok(Json(TrackResponse {
        id: record.id,
        name: record.name,
        department: record.department,
        grievance_type: state.secrets.reveal(&record.grievance_type),
        status: record.status,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }))
}

/// Full decrypted record for administrators.
#[derive(Serialize)]
pub struct GrievanceView {
    pub id: u64,
    pub name: String,
    pub role: Role,
    pub external_id: String,
    pub department: String,
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

impl GrievanceView {
    fn from_record(record: Grievance, state_secrets: &grievance_core::SecretStore) -> Self {
        Self {
            id: record.id,
            name: record.name,
            role: record.role,
            external_id: record.external_id,
            department: record.department,
            year: record.year,
            email: record.email,
            mobile: record.mobile,
            grievance_type: state_secrets.reveal(&record.grievance_type),
            grievance: state_secrets.reveal(&record.grievance),
            status: record.status,
            email_verified: record.email_verified,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub role: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<GrievanceView>,
    pub count: usize,
}

/// GET /api/grievances (admin)
pub async fn list_grievances<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    require_admin(&state.tokens, &headers)?;

    let filter = GrievanceFilter {
        status: query
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(Status::parse)
            .transpose()?,
        role: query
            .role
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(Role::parse)
            .transpose()?,
        search: query.search.filter(|s| !s.is_empty()),
    };

    let records = state.store.list_grievances(&filter)?;
    let data: Vec<GrievanceView> = records
        .into_iter()
        .map(|r| GrievanceView::from_record(r, &state.secrets))
        .collect();

    Ok(Json(ListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

#[derive(Serialize)]
pub struct GetResponse {
    pub success: bool,
    pub data: GrievanceView,
}

/// GET /api/grievances/:id (admin)
pub async fn get_grievance<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<GetResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    require_admin(&state.tokens, &headers)?;

    let record = state
        .store
        .get_grievance(id)?
        .ok_or(PortalError::GrievanceNotFound)?;

    Ok(Json(GetResponse {
        success: true,
        data: GrievanceView::from_record(record, &state.secrets),
    }))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub message: String,
}

/// PATCH /api/grievances/:id/status (admin)
///
/// The single authoritative mutator for grievance status. Terminal states are
/// immutable; a same-value non-terminal request succeeds without touching the
/// record or its `updated_at`.
pub async fn update_status<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, PortalError>
where
    S: PortalStore,
    N: Notifier,
{
    require_admin(&state.tokens, &headers)?;

    let requested = req
        .status
        .as_deref()
        .map(Status::parse)
        .transpose()?
        .ok_or_else(|| StatusError::Unknown(String::new()))?;

    let record = state
        .store
        .get_grievance(id)?
        .ok_or(PortalError::GrievanceNotFound)?;

    match plan_transition(record.status, requested)? {
        Transition::Unchanged => Ok(Json(UpdateStatusResponse {
            success: true,
            message: "Status unchanged".to_string(),
        })),
        Transition::Updated(status) => {
            state.store.update_status(id, status)?;
            tracing::info!(id, from = %record.status, to = %status, "Grievance status updated");
            Ok(Json(UpdateStatusResponse {
                success: true,
                message: "Grievance status updated successfully".to_string(),
            }))
        }
    }
}
