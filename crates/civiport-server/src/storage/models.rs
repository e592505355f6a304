//! Data models for CiviPort storage.

use serde::{Deserialize, Serialize};

/// Complaint triage states. Any state may transition to any other.
pub const COMPLAINT_STATUSES: [&str; 3] = ["pending", "in-progress", "completed"];

/// True if `status` is one of the recognized triage states.
pub fn is_valid_status(status: &str) -> bool {
    COMPLAINT_STATUSES.contains(&status)
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Admin {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OtpCode {
    pub id: i64,
    pub email: String,
    pub code: String,
    pub issued_at: i64,
    pub consumed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Complaint {
    pub id: i64,
    pub fullname: Option<String>,
    pub phone: Option<String>,
    pub complaint_type: Option<String>,
    pub description: Option<String>,
    pub urgency: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub created_at: i64,
    pub image_url: Option<String>,
    pub status: String,
}
