//! Deadline bucketing over a snapshot of the register.
//!
//! Every function here is a pure function of the document collection and a
//! reference `now`; identical input always produces identical output. The
//! stored [`Status::Overdue`] value is never consulted — overdue is derived
//! from the deadline alone, and completed documents are exempt.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::document::{Document, DocumentKind, Status};

/// Documents within this many days of their deadline count as "near".
pub const NEAR_DEADLINE_WINDOW_DAYS: i64 = 3;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Days until `deadline`, as the ceiling of the real-valued difference
/// between the deadline's midnight and `now`. A deadline 2.1 days away is
/// "3 days"; today's deadline is 0; yesterday's is -1.
pub fn days_until(deadline: NaiveDate, now: DateTime<Utc>) -> i64 {
    let midnight = deadline.and_time(NaiveTime::MIN).and_utc();
    let secs = (midnight - now).num_seconds();
    // Ceiling division toward positive infinity (SECS_PER_DAY > 0); signed
    // `i64::div_ceil` is still unstable, so compute it directly.
    let q = secs / SECS_PER_DAY;
    if secs % SECS_PER_DAY > 0 {
        q + 1
    } else {
        q
    }
}

/// The deadline of an incoming, not-yet-completed document, if it has one.
/// Only these documents participate in overdue/near-deadline bucketing.
fn pending_deadline(doc: &Document) -> Option<NaiveDate> {
    if doc.kind != DocumentKind::Incoming || doc.status == Status::Completed {
        return None;
    }
    doc.processing_deadline
}

/// Documents whose deadline date has passed. Date comparison: the deadline
/// day itself still counts as on time; the document turns overdue the moment
/// `now`'s date exceeds it.
pub fn overdue(docs: &[Document], now: DateTime<Utc>) -> Vec<&Document> {
    docs.iter()
        .filter(|doc| pending_deadline(doc).is_some_and(|deadline| now.date_naive() > deadline))
        .collect()
}

/// Documents due today or within the next [`NEAR_DEADLINE_WINDOW_DAYS`] days.
/// Disjoint from [`overdue`]: a passed deadline yields a negative day count.
pub fn near_deadline(docs: &[Document], now: DateTime<Utc>) -> Vec<&Document> {
    docs.iter()
        .filter(|doc| {
            pending_deadline(doc).is_some_and(|deadline| {
                let days = days_until(deadline, now);
                (0..=NEAR_DEADLINE_WINDOW_DAYS).contains(&days)
            })
        })
        .collect()
}

/// Badge count for the notification bell: overdue plus near-deadline.
pub fn notification_count(docs: &[Document], now: DateTime<Utc>) -> usize {
    overdue(docs, now).len() + near_deadline(docs, now).len()
}

/// A document annotated with its distance to the deadline.
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingDeadline {
    #[serde(flatten)]
    pub document: Document,
    pub days_until_deadline: i64,
}

/// The most urgent open documents with a deadline, any kind, most urgent
/// first (overdue sorts before due-today, due-today before due-later),
/// truncated to `limit`.
pub fn upcoming(docs: &[Document], now: DateTime<Utc>, limit: usize) -> Vec<UpcomingDeadline> {
    let mut entries: Vec<UpcomingDeadline> = docs
        .iter()
        .filter(|doc| doc.status != Status::Completed)
        .filter_map(|doc| {
            doc.processing_deadline.map(|deadline| UpcomingDeadline {
                document: doc.clone(),
                days_until_deadline: days_until(deadline, now),
            })
        })
        .collect();
    entries.sort_by_key(|entry| entry.days_until_deadline);
    entries.truncate(limit);
    entries
}
