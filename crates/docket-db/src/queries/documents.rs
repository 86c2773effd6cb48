use chrono::Utc;
use rusqlite::{params, Row};

use docket_core::document::{
    AttachmentRef, Document, DocumentKind, NewDocument, Priority, SearchCriteria, Status,
};

use crate::{Db, DbError};

/// Tags live in a single text column, comma-joined. The join/split pair is
/// the only place that encoding exists; everywhere else tags are a sequence.
fn join_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Escape LIKE metacharacters in user input; queries pass ESCAPE '\'.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn row_to_document(row: &Row) -> rusqlite::Result<Document> {
    let kind_str: String = row.get("kind")?;
    let priority_str: String = row.get("priority")?;
    let status_str: String = row.get("status")?;
    let tags_str: String = row.get("tags")?;
    let attachment_name: Option<String> = row.get("attachment_name")?;
    let attachment_path: Option<String> = row.get("attachment_path")?;
    let attachment_size: Option<i64> = row.get("attachment_size")?;
    let attachment = match (attachment_name, attachment_path) {
        (Some(name), Some(path)) => Some(AttachmentRef {
            name,
            path,
            size: attachment_size.unwrap_or(0),
        }),
        _ => None,
    };
    Ok(Document {
        id: row.get("id")?,
        kind: DocumentKind::parse_str(&kind_str).unwrap_or(DocumentKind::Incoming),
        number: row.get("number")?,
        date: row.get("date")?,
        summary: row.get("summary")?,
        document_type: row.get("document_type")?,
        priority: Priority::parse_str(&priority_str).unwrap_or(Priority::Normal),
        status: Status::parse_str(&status_str).unwrap_or(Status::Draft),
        sender_department: row.get("sender_department")?,
        receiver_department: row.get("receiver_department")?,
        main_responsible: row.get("main_responsible")?,
        processing_deadline: row.get("processing_deadline")?,
        signer: row.get("signer")?,
        tags: split_tags(&tags_str),
        notes: row.get("notes")?,
        attachment,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl Db {
    pub fn create_document(&self, input: &NewDocument) -> Result<Document, DbError> {
        self.with_conn(|conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO documents (
                    kind, number, date, summary, document_type, priority, status,
                    sender_department, receiver_department, main_responsible,
                    processing_deadline, signer, tags, notes,
                    attachment_name, attachment_path, attachment_size,
                    created_at, updated_at
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
                params![
                    input.kind.as_str(),
                    input.number,
                    input.date,
                    input.summary,
                    input.document_type,
                    input.priority.as_str(),
                    input.status.as_str(),
                    input.sender_department,
                    input.receiver_department,
                    input.main_responsible,
                    input.processing_deadline,
                    input.signer,
                    join_tags(&input.tags),
                    input.notes,
                    input.attachment.as_ref().map(|a| a.name.clone()),
                    input.attachment.as_ref().map(|a| a.path.clone()),
                    input.attachment.as_ref().map(|a| a.size),
                    now,
                    now,
                ],
            )?;

            let id = conn.last_insert_rowid();
            let document = conn.query_row(
                "SELECT * FROM documents WHERE id = ?1",
                params![id],
                row_to_document,
            )?;
            Ok(document)
        })
    }

    pub fn get_document(&self, id: i64) -> Result<Document, DbError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM documents WHERE id = ?1",
                params![id],
                row_to_document,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    DbError::NotFound(format!("document {id}"))
                }
                other => DbError::Sqlite(other),
            })
        })
    }

    /// All documents, newest registration first. Ties on created_at come back
    /// in whatever order the scan produces them.
    pub fn list_documents(&self) -> Result<Vec<Document>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM documents ORDER BY created_at DESC")?;
            let documents = stmt
                .query_map([], row_to_document)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(documents)
        })
    }

    /// AND-composition of the supplied criteria over bound parameters.
    /// Each absent field contributes nothing; the predicate chain is built
    /// incrementally but every value travels as a bound parameter.
    pub fn search_documents(&self, criteria: &SearchCriteria) -> Result<Vec<Document>, DbError> {
        self.with_conn(|conn| {
            let mut sql = String::from("SELECT * FROM documents WHERE 1=1");
            let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

            if let Some(keyword) = non_blank(&criteria.keyword) {
                param_values.push(Box::new(format!("%{}%", escape_like(keyword))));
                let n = param_values.len();
                sql.push_str(&format!(
                    " AND (number LIKE ?{n} ESCAPE '\\'
                       OR summary LIKE ?{n} ESCAPE '\\'
                       OR sender_department LIKE ?{n} ESCAPE '\\'
                       OR receiver_department LIKE ?{n} ESCAPE '\\'
                       OR notes LIKE ?{n} ESCAPE '\\')"
                ));
            }
            if let Some(kind) = criteria.kind {
                param_values.push(Box::new(kind.as_str().to_string()));
                sql.push_str(&format!(" AND kind = ?{}", param_values.len()));
            }
            if let Some(status) = criteria.status {
                param_values.push(Box::new(status.as_str().to_string()));
                sql.push_str(&format!(" AND status = ?{}", param_values.len()));
            }
            if let Some(date_from) = criteria.date_from {
                param_values.push(Box::new(date_from));
                sql.push_str(&format!(" AND date >= ?{}", param_values.len()));
            }
            if let Some(date_to) = criteria.date_to {
                param_values.push(Box::new(date_to));
                sql.push_str(&format!(" AND date <= ?{}", param_values.len()));
            }
            if let Some(organization) = non_blank(&criteria.organization) {
                param_values.push(Box::new(format!("%{}%", escape_like(organization))));
                let n = param_values.len();
                sql.push_str(&format!(
                    " AND (sender_department LIKE ?{n} ESCAPE '\\'
                       OR receiver_department LIKE ?{n} ESCAPE '\\')"
                ));
            }

            sql.push_str(" ORDER BY created_at DESC");

            tracing::debug!(criteria = param_values.len(), %sql, "document search");

            let params_ref: Vec<&dyn rusqlite::types::ToSql> =
                param_values.iter().map(|p| p.as_ref()).collect();

            let mut stmt = conn.prepare(&sql)?;
            let documents = stmt
                .query_map(params_ref.as_slice(), row_to_document)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(documents)
        })
    }

    /// Full-record replace. `kind` and `created_at` are immutable and stay
    /// untouched; `updated_at` is refreshed.
    pub fn update_document(&self, id: i64, input: &NewDocument) -> Result<Document, DbError> {
        self.with_conn(|conn| {
            let now = Utc::now();
            let changed = conn.execute(
                "UPDATE documents SET
                    number = ?1,
                    date = ?2,
                    summary = ?3,
                    document_type = ?4,
                    priority = ?5,
                    status = ?6,
                    sender_department = ?7,
                    receiver_department = ?8,
                    main_responsible = ?9,
                    processing_deadline = ?10,
                    signer = ?11,
                    tags = ?12,
                    notes = ?13,
                    attachment_name = ?14,
                    attachment_path = ?15,
                    attachment_size = ?16,
                    updated_at = ?17
                 WHERE id = ?18",
                params![
                    input.number,
                    input.date,
                    input.summary,
                    input.document_type,
                    input.priority.as_str(),
                    input.status.as_str(),
                    input.sender_department,
                    input.receiver_department,
                    input.main_responsible,
                    input.processing_deadline,
                    input.signer,
                    join_tags(&input.tags),
                    input.notes,
                    input.attachment.as_ref().map(|a| a.name.clone()),
                    input.attachment.as_ref().map(|a| a.path.clone()),
                    input.attachment.as_ref().map(|a| a.size),
                    now,
                    id,
                ],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("document {id}")));
            }

            let document = conn.query_row(
                "SELECT * FROM documents WHERE id = ?1",
                params![id],
                row_to_document,
            )?;
            Ok(document)
        })
    }

    pub fn delete_document(&self, id: i64) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("document {id}")));
            }
            Ok(())
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
