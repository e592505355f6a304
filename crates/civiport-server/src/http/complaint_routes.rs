//! Complaint intake and review handlers.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Multipart, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::AppState;
use super::error::ApiError;
use super::extract::AdminSession;
use crate::storage::{Complaint, NewComplaint, is_valid_status};

/// `POST /complaints` — public intake, multipart form with optional photo.
#[instrument(skip_all, fields(route = "SubmitComplaint"))]
pub async fn submit_complaint(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut image_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        // "files[]" is what the deployed public form still posts
        if name == "file" || name == "files[]" {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidInput(format!("unreadable file part: {e}")))?;

            if bytes.is_empty() {
                continue;
            }

            let url = state
                .uploads
                .store(&filename, &bytes)
                .map_err(|e| ApiError::Internal(format!("Upload failed: {e}")))?;
            image_url = Some(url);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::InvalidInput(format!("unreadable field {name}: {e}")))?;
            fields.insert(name, value);
        }
    }

    let get = |key: &str| fields.get(key).map(String::as_str).filter(|v| !v.is_empty());

    let complaint = state
        .db
        .create_complaint(&NewComplaint {
            fullname: get("fullname"),
            phone: get("phone"),
            complaint_type: get("complaint_type"),
            description: get("description"),
            urgency: get("urgency"),
            latitude: get("latitude"),
            longitude: get("longitude"),
            image_url: image_url.as_deref(),
        })
        .await?;

    info!(id = complaint.id, has_image = complaint.image_url.is_some(), "Complaint submitted");

    Ok(Json(json!({
        "status": "success",
        "message": "Complaint saved",
        "image_url": complaint.image_url,
    })))
}

/// Public complaint view. Phone stays admin-only; status is included so a
/// citizen can track the case.
#[derive(Debug, Serialize)]
pub struct PublicComplaint {
    pub id: i64,
    pub fullname: Option<String>,
    pub complaint_type: Option<String>,
    pub description: Option<String>,
    pub urgency: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub created_at: i64,
    pub image_url: Option<String>,
    pub status: String,
}

impl From<Complaint> for PublicComplaint {
    fn from(c: Complaint) -> Self {
        Self {
            id: c.id,
            fullname: c.fullname,
            complaint_type: c.complaint_type,
            description: c.description,
            urgency: c.urgency,
            latitude: c.latitude,
            longitude: c.longitude,
            created_at: c.created_at,
            image_url: c.image_url,
            status: c.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ComplaintsResponse<T> {
    pub complaints: Vec<T>,
}

/// `GET /complaints` — public listing, newest first.
#[instrument(skip_all, fields(route = "ListComplaints"))]
pub async fn list_public(
    State(state): State<AppState>,
) -> Result<Json<ComplaintsResponse<PublicComplaint>>, ApiError> {
    let complaints = state.db.list_complaints().await?;

    Ok(Json(ComplaintsResponse {
        complaints: complaints.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /admin/complaints` — full listing including phone numbers.
#[instrument(skip_all, fields(route = "ListComplaintsAdmin"))]
pub async fn list_admin(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ComplaintsResponse<Complaint>>, ApiError> {
    let complaints = state.db.list_complaints().await?;

    Ok(Json(ComplaintsResponse { complaints }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: Option<i64>,
    #[serde(default)]
    pub status: String,
}

/// `PATCH /admin/update-status` — move a complaint through triage.
#[instrument(skip_all, fields(route = "UpdateStatus"))]
pub async fn update_status(
    session: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = req
        .id
        .ok_or_else(|| ApiError::InvalidInput("id is required".to_string()))?;

    if !is_valid_status(&req.status) {
        return Err(ApiError::InvalidInput(format!(
            "invalid status: {}",
            req.status
        )));
    }

    state.db.update_complaint_status(id, &req.status).await?;

    info!(id, status = %req.status, admin_id = %session.0.sub, "Complaint status updated");

    Ok(Json(json!({
        "message": "Status updated",
        "id": id,
        "new_status": req.status,
    })))
}
