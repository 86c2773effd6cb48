pub mod dashboard;
pub mod documents;
pub mod health;
pub mod uploads;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use docket_files::{ObjectStore, UploadPolicy};
use docket_service::{LocalService, ServiceError};

pub struct InnerAppState {
    pub service: LocalService,
    pub store: Arc<dyn ObjectStore>,
    pub upload_policy: UploadPolicy,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(
    service: LocalService,
    store: Arc<dyn ObjectStore>,
    upload_policy: UploadPolicy,
) -> Router {
    // Body cap above the attachment limit so oversized files reach the
    // register's own validation message instead of a bare 413.
    let body_cap = upload_policy.max_bytes.saturating_mul(2);
    let state: AppState = Arc::new(InnerAppState {
        service,
        store,
        upload_policy,
    });

    // The register's front end is served from a different origin; keep the
    // API as open as the one it replaces.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(documents::routes())
        .merge(dashboard::routes())
        .merge(uploads::routes(body_cap))
        .merge(health::routes())
        .layer(cors)
        .with_state(state)
}

pub(crate) type ApiError = (StatusCode, Json<Value>);

pub(crate) fn to_error(e: ServiceError) -> ApiError {
    let (status, error, message) = match &e {
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", e.to_string()),
        ServiceError::InvalidInput(_) => {
            (StatusCode::BAD_REQUEST, "invalid_input", e.to_string())
        }
        ServiceError::Internal(detail) => {
            // Log the diagnostic, answer with a generic message.
            tracing::error!(error = %detail, "register operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error".to_string(),
            )
        }
    };
    (status, Json(json!({ "error": error, "message": message })))
}

pub(crate) fn invalid(message: String) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid_input", "message": message })),
    )
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn parse_date(
    value: &Option<String>,
    field: &str,
) -> Result<Option<NaiveDate>, ApiError> {
    match non_blank(value) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid(format!("{field} must be a YYYY-MM-DD date, got '{s}'"))),
    }
}
