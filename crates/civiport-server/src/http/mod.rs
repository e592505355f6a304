//! HTTP surface for the CiviPort backend.
//!
//! Public intake routes, gated admin review routes, and upload serving.

pub mod auth_routes;
pub mod complaint_routes;
mod error;
mod extract;

pub use error::ApiError;
pub use extract::AdminSession;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::auth::JwtManager;
use crate::mailer::OtpMailer;
use crate::storage::PortalDatabase;
use crate::uploads::UploadStore;

/// Maximum accepted request body, in bytes. Sized for complaint photos.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: PortalDatabase,
    pub jwt: Arc<JwtManager>,
    pub mailer: Arc<OtpMailer>,
    pub uploads: Arc<UploadStore>,
}

/// Assemble the portal router.
///
/// The public form is served from a separate origin, so CORS stays
/// permissive for the methods and headers the portal actually uses.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(Any);

    let upload_dir = state.uploads.dir().to_path_buf();

    Router::new()
        .route("/admin/login", post(auth_routes::admin_login))
        .route("/auth/send-otp", post(auth_routes::send_otp))
        .route("/auth/verify-otp", post(auth_routes::verify_otp))
        .route(
            "/complaints",
            post(complaint_routes::submit_complaint).get(complaint_routes::list_public),
        )
        .route("/admin/complaints", get(complaint_routes::list_admin))
        .route("/admin/update-status", patch(complaint_routes::update_status))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}
