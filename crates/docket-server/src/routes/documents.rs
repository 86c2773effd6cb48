use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use docket_core::document::{DocumentInput, DocumentKind, SearchCriteria, Status};
use docket_service::DocumentService;

use super::{invalid, non_blank, parse_date, to_error, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/documents",
        get(list_documents)
            .post(create_document)
            .put(update_document)
            .delete(delete_document),
    )
}

#[derive(Debug, Deserialize)]
struct DocumentQuery {
    id: Option<i64>,
    search: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    status: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
    organization: Option<String>,
}

impl DocumentQuery {
    /// Any search key present — even with an empty value — selects search
    /// mode. Empty values are wildcards, so the result matches the plain
    /// listing; the dispatch itself keeps the historical behavior.
    fn wants_search(&self) -> bool {
        self.search.is_some()
            || self.kind.is_some()
            || self.status.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
            || self.organization.is_some()
    }

    fn criteria(&self) -> Result<SearchCriteria, ApiError> {
        let kind = match non_blank(&self.kind) {
            Some(s) => Some(
                DocumentKind::parse_str(s)
                    .ok_or_else(|| invalid(format!("unknown document type '{s}'")))?,
            ),
            None => None,
        };
        let status = match non_blank(&self.status) {
            Some(s) => {
                Some(Status::parse_str(s).ok_or_else(|| invalid(format!("unknown status '{s}'")))?)
            }
            None => None,
        };
        Ok(SearchCriteria {
            keyword: non_blank(&self.search).map(String::from),
            kind,
            status,
            date_from: parse_date(&self.date_from, "date_from")?,
            date_to: parse_date(&self.date_to, "date_to")?,
            organization: non_blank(&self.organization).map(String::from),
        })
    }
}

async fn list_documents(
    State(state): State<AppState>,
    Query(q): Query<DocumentQuery>,
) -> Result<Json<Value>, ApiError> {
    if let Some(id) = q.id {
        return state
            .service
            .get_document(id)
            .map(|d| Json(json!(d)))
            .map_err(to_error);
    }
    if q.wants_search() {
        let criteria = q.criteria()?;
        return state
            .service
            .search_documents(&criteria)
            .map(|d| Json(json!(d)))
            .map_err(to_error);
    }
    state
        .service
        .list_documents()
        .map(|d| Json(json!(d)))
        .map_err(to_error)
}

async fn create_document(
    State(state): State<AppState>,
    Json(input): Json<DocumentInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state
        .service
        .create_document(input)
        .map(|doc| {
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": format!("document {} registered", doc.id),
                })),
            )
        })
        .map_err(to_error)
}

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: Option<i64>,
}

async fn update_document(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
    Json(input): Json<DocumentInput>,
) -> Result<Json<Value>, ApiError> {
    let id = q.id.ok_or_else(|| invalid("missing id parameter".into()))?;
    state
        .service
        .update_document(id, input)
        .map(|_| Json(json!({ "success": true })))
        .map_err(to_error)
}

async fn delete_document(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = q.id.ok_or_else(|| invalid("missing id parameter".into()))?;
    state
        .service
        .delete_document(id)
        .map(|_| Json(json!({ "success": true })))
        .map_err(to_error)
}
