//! Register aggregates for the dashboard and the report screen.
//!
//! Like the deadline bucketing, these are pure functions over a snapshot —
//! they can be re-run against any fetched collection and the same `now`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::deadline;
use crate::document::{Document, DocumentKind, Status};

pub fn count_by_kind(docs: &[Document], kind: DocumentKind) -> usize {
    docs.iter().filter(|doc| doc.kind == kind).count()
}

pub fn count_by_status(docs: &[Document], status: Status) -> usize {
    docs.iter().filter(|doc| doc.status == status).count()
}

/// Dashboard tile counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterSummary {
    pub incoming: usize,
    pub outgoing: usize,
    pub draft: usize,
    pub overdue: usize,
    pub near_deadline: usize,
}

pub fn summarize(docs: &[Document], now: DateTime<Utc>) -> RegisterSummary {
    RegisterSummary {
        incoming: count_by_kind(docs, DocumentKind::Incoming),
        outgoing: count_by_kind(docs, DocumentKind::Outgoing),
        draft: count_by_status(docs, Status::Draft),
        overdue: deadline::overdue(docs, now).len(),
        near_deadline: deadline::near_deadline(docs, now).len(),
    }
}

/// The `limit` most recently registered documents, newest first.
pub fn recent(docs: &[Document], limit: usize) -> Vec<Document> {
    let mut sorted: Vec<Document> = docs.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Aggregate over an inclusive date range (bounds on the document date, not
/// the registration timestamp). An absent bound leaves that side open.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterReport {
    pub total: usize,
    pub incoming: usize,
    pub outgoing: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
}

pub fn report(
    docs: &[Document],
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> RegisterReport {
    let in_range: Vec<&Document> = docs
        .iter()
        .filter(|doc| date_from.map_or(true, |from| doc.date >= from))
        .filter(|doc| date_to.map_or(true, |to| doc.date <= to))
        .collect();

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    for doc in &in_range {
        *by_type.entry(doc.document_type.clone()).or_default() += 1;
        *by_status.entry(doc.status.as_str().to_string()).or_default() += 1;
    }

    RegisterReport {
        total: in_range.len(),
        incoming: in_range
            .iter()
            .filter(|doc| doc.kind == DocumentKind::Incoming)
            .count(),
        outgoing: in_range
            .iter()
            .filter(|doc| doc.kind == DocumentKind::Outgoing)
            .count(),
        by_type,
        by_status,
    }
}
