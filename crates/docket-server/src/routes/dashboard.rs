use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use docket_core::deadline::{self, UpcomingDeadline};
use docket_core::{stats, Document};
use docket_service::DocumentService;

use super::{parse_date, to_error, ApiError, AppState};

const RECENT_LIMIT: usize = 5;
const DEFAULT_UPCOMING_LIMIT: usize = 5;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard/summary", get(summary))
        .route("/api/dashboard/notifications", get(notifications))
        .route("/api/dashboard/upcoming", get(upcoming))
        .route("/api/reports", get(report))
}

async fn summary(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let docs = state.service.list_documents().map_err(to_error)?;
    let now = Utc::now();
    Ok(Json(json!({
        "summary": stats::summarize(&docs, now),
        "notifications": deadline::notification_count(&docs, now),
        "recent": stats::recent(&docs, RECENT_LIMIT),
    })))
}

fn annotate(docs: Vec<&Document>, now: DateTime<Utc>) -> Vec<UpcomingDeadline> {
    docs.into_iter()
        .filter_map(|doc| {
            doc.processing_deadline.map(|deadline| UpcomingDeadline {
                document: doc.clone(),
                days_until_deadline: deadline::days_until(deadline, now),
            })
        })
        .collect()
}

async fn notifications(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let docs = state.service.list_documents().map_err(to_error)?;
    let now = Utc::now();
    let overdue = annotate(deadline::overdue(&docs, now), now);
    let near_deadline = annotate(deadline::near_deadline(&docs, now), now);
    Ok(Json(json!({
        "total": overdue.len() + near_deadline.len(),
        "overdue": overdue,
        "near_deadline": near_deadline,
    })))
}

#[derive(Debug, Deserialize)]
struct UpcomingQuery {
    limit: Option<usize>,
}

async fn upcoming(
    State(state): State<AppState>,
    Query(q): Query<UpcomingQuery>,
) -> Result<Json<Value>, ApiError> {
    let docs = state.service.list_documents().map_err(to_error)?;
    let limit = q.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    Ok(Json(json!(deadline::upcoming(&docs, Utc::now(), limit))))
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    date_from: Option<String>,
    date_to: Option<String>,
}

async fn report(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<Value>, ApiError> {
    let date_from = parse_date(&q.date_from, "date_from")?;
    let date_to = parse_date(&q.date_to, "date_to")?;
    let docs = state.service.list_documents().map_err(to_error)?;
    Ok(Json(json!(stats::report(&docs, date_from, date_to))))
}
