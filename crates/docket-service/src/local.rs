use docket_core::document::{Document, DocumentInput, NewDocument, SearchCriteria};
use docket_db::{Db, DbError};

use crate::{DocumentService, ServiceError};

/// Local implementation backed by direct SQLite access.
pub struct LocalService {
    db: Db,
}

impl LocalService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

fn validate(input: DocumentInput) -> Result<NewDocument, ServiceError> {
    input.validate().map_err(|missing| {
        ServiceError::InvalidInput(format!(
            "missing required fields: {}",
            missing.join(", ")
        ))
    })
}

impl DocumentService for LocalService {
    fn list_documents(&self) -> Result<Vec<Document>, ServiceError> {
        Ok(self.db.list_documents()?)
    }

    fn get_document(&self, id: i64) -> Result<Document, ServiceError> {
        Ok(self.db.get_document(id)?)
    }

    fn search_documents(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<Document>, ServiceError> {
        Ok(self.db.search_documents(criteria)?)
    }

    fn create_document(&self, input: DocumentInput) -> Result<Document, ServiceError> {
        let record = validate(input)?;
        Ok(self.db.create_document(&record)?)
    }

    fn update_document(
        &self,
        id: i64,
        input: DocumentInput,
    ) -> Result<Document, ServiceError> {
        let record = validate(input)?;
        let existing = self.db.get_document(id)?;
        if record.kind != existing.kind {
            return Err(ServiceError::InvalidInput(format!(
                "document type is fixed at creation (stored '{}', got '{}')",
                existing.kind.as_str(),
                record.kind.as_str()
            )));
        }
        Ok(self.db.update_document(id, &record)?)
    }

    fn delete_document(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.db.delete_document(id)?)
    }
}
