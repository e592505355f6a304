//! Login and one-time-code handlers.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::AppState;
use super::error::ApiError;
use crate::auth::{otp, password};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /admin/login` — exchange credentials for an admin session token.
#[instrument(skip_all, fields(route = "AdminLogin"))]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Unknown user and wrong password collapse into the same error
    let admin = state
        .db
        .get_admin_by_username(&req.username)
        .await
        .map_err(|_| ApiError::InvalidCredentials)?;

    let valid = password::verify_password(&req.password, &admin.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {e}")))?;

    if !valid {
        warn!(username = %req.username, "Failed login attempt");
        return Err(ApiError::InvalidCredentials);
    }

    let (token, _ttl) = state
        .jwt
        .issue_admin_token(&admin.id)
        .map_err(|e| ApiError::Internal(format!("Token creation failed: {e}")))?;

    info!(admin_id = %admin.id, username = %admin.username, "Administrator logged in");

    Ok(Json(TokenResponse { token }))
}

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
}

/// `POST /auth/send-otp` — issue a one-time code and dispatch it by mail.
#[instrument(skip_all, fields(route = "SendOtp"))]
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(ApiError::InvalidInput("email is required".to_string()));
    }

    let code = otp::generate_code();
    state.db.create_otp(email, &code).await?;

    state
        .mailer
        .send_code(email, &code)
        .await
        .map_err(|e| ApiError::Internal(format!("Mail dispatch failed: {e}")))?;

    info!(email = %email, "One-time code issued");

    Ok(Json(MessageResponse {
        message: "OTP sent".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

/// `POST /auth/verify-otp` — exchange a valid code for an email session token.
#[instrument(skip_all, fields(route = "VerifyOtp"))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(ApiError::InvalidInput("email is required".to_string()));
    }

    let stored = state
        .db
        .latest_otp(email)
        .await?
        .ok_or(ApiError::InvalidCode)?;

    // Exact string comparison against the latest code only
    if stored.consumed != 0 || stored.code != req.otp {
        warn!(email = %email, "Failed one-time code attempt");
        return Err(ApiError::InvalidCode);
    }

    state.db.consume_otp(stored.id).await?;

    let (token, _ttl) = state
        .jwt
        .issue_email_token(email)
        .map_err(|e| ApiError::Internal(format!("Token creation failed: {e}")))?;

    info!(email = %email, "One-time code verified");

    Ok(Json(TokenResponse { token }))
}
