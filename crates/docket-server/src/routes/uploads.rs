use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use chrono::Utc;
use serde_json::{json, Value};

use docket_core::DocumentKind;
use docket_files::{store_upload, StoreError, UploadError};

use super::AppState;

pub fn routes(body_cap: usize) -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(body_cap))
        .route("/api/files/{*key}", get(download_file))
}

async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut file: Option<(String, Option<String>, Bytes)> = None;
    let mut kind = DocumentKind::Incoming;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        failure(
            StatusCode::BAD_REQUEST,
            format!("malformed multipart request: {e}"),
        )
    })? {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("file") => {
                let Some(filename) = field.file_name().map(ToString::to_string) else {
                    return Err(failure(
                        StatusCode::BAD_REQUEST,
                        "file field is missing a filename".into(),
                    ));
                };
                let content_type = field.content_type().map(ToString::to_string);
                let data = field.bytes().await.map_err(|e| {
                    failure(StatusCode::BAD_REQUEST, format!("could not read upload: {e}"))
                })?;
                file = Some((filename, content_type, data));
            }
            Some("documentType") => {
                let text = field.text().await.map_err(|e| {
                    failure(
                        StatusCode::BAD_REQUEST,
                        format!("could not read documentType: {e}"),
                    )
                })?;
                kind = DocumentKind::parse_str(text.trim()).unwrap_or(DocumentKind::Incoming);
            }
            _ => {}
        }
    }

    let Some((filename, content_type, data)) = file else {
        return Err(failure(StatusCode::BAD_REQUEST, "no file uploaded".into()));
    };

    match store_upload(
        state.store.as_ref(),
        &state.upload_policy,
        kind,
        &filename,
        data,
        Utc::now(),
    )
    .await
    {
        Ok(stored) => Ok(Json(json!({
            "success": true,
            "message": "file uploaded",
            "data": {
                "name": stored.name,
                "path": stored.path,
                "size": stored.size,
                "type": content_type,
            },
        }))),
        Err(UploadError::Store(e)) => {
            tracing::error!(error = %e, "attachment store failed");
            Err(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "could not store file".into(),
            ))
        }
        Err(e) => Err(failure(StatusCode::BAD_REQUEST, e.to_string())),
    }
}

fn failure(status: StatusCode, message: String) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "message": message })))
}

async fn download_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    // Keys are relative store paths; refuse anything trying to climb out.
    if key.split('/').any(|part| part == "..") {
        return Err(not_found(&key));
    }
    match state.store.get(&key).await {
        Ok(data) => {
            let filename = key.rsplit('/').next().unwrap_or("attachment");
            Ok(Response::builder()
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .header(
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                )
                .body(Body::from(data))
                .unwrap())
        }
        Err(StoreError::NotFound(_)) => Err(not_found(&key)),
        Err(e) => {
            tracing::error!(error = %e, "attachment read failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "internal server error",
                })),
            ))
        }
    }
}

fn not_found(key: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": format!("not found: {key}"),
        })),
    )
}
