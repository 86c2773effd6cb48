use docket_core::document::{Document, DocumentInput, SearchCriteria};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Abstraction over register operations.
///
/// The HTTP routes program against this trait; `LocalService` wraps a direct
/// SQLite connection. Callers never touch the document collection directly —
/// every read and write goes through here.
pub trait DocumentService: Send + Sync {
    /// All documents, newest registration first.
    fn list_documents(&self) -> Result<Vec<Document>, ServiceError>;

    fn get_document(&self, id: i64) -> Result<Document, ServiceError>;

    /// AND-composed filtering; absent criteria match everything.
    fn search_documents(&self, criteria: &SearchCriteria)
        -> Result<Vec<Document>, ServiceError>;

    /// Validate and persist a new record, returning it with its assigned id
    /// and timestamps.
    fn create_document(&self, input: DocumentInput) -> Result<Document, ServiceError>;

    /// Validate and replace the full record. The document's kind is fixed at
    /// creation; an input carrying a different kind is rejected.
    fn update_document(&self, id: i64, input: DocumentInput)
        -> Result<Document, ServiceError>;

    /// Hard delete. Deleting an id that does not exist reports `NotFound`.
    fn delete_document(&self, id: i64) -> Result<(), ServiceError>;
}
