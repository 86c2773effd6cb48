//! Upload validation and storage for document attachments.
//!
//! A stored file is never linked transactionally to a document row; if the
//! row write fails afterwards the file stays behind as an orphan.

use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use docket_core::DocumentKind;

use crate::{ObjectStore, StoreError};

/// Default cap on a single upload: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default accepted file extensions, matched case-insensitively.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "txt"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file exceeds the {limit} byte upload limit ({size} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("unsupported file type '{extension}' (allowed: {allowed})")]
    UnsupportedType { extension: String, allowed: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Size and extension limits for uploads. Both are deployment
/// configuration; the defaults match the register's historical limits.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl UploadPolicy {
    /// Check size and extension limits without touching storage.
    pub fn validate(&self, filename: &str, size: usize) -> Result<(), UploadError> {
        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        let extension = Path::new(filename)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !self
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
        {
            return Err(UploadError::UnsupportedType {
                extension,
                allowed: self.allowed_extensions.join(", "),
            });
        }
        Ok(())
    }
}

/// Reference to a stored upload, attached to at most one document record.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub name: String,
    pub path: String,
    pub size: i64,
}

/// Storage key for an upload: category directory plus a unix-timestamp
/// prefix so repeated uploads of the same filename never collide.
pub fn upload_key(kind: DocumentKind, uploaded_at: DateTime<Utc>, filename: &str) -> String {
    format!(
        "uploads/{}/{}_{}",
        kind.as_str(),
        uploaded_at.timestamp(),
        filename
    )
}

/// Validate and persist one upload, returning the reference triple to attach
/// to a document record.
pub async fn store_upload(
    store: &dyn ObjectStore,
    policy: &UploadPolicy,
    kind: DocumentKind,
    filename: &str,
    data: Bytes,
    uploaded_at: DateTime<Utc>,
) -> Result<StoredFile, UploadError> {
    // Multipart filenames can carry client path fragments; keep the last
    // component only.
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .to_string();

    let size = data.len();
    policy.validate(&name, size)?;

    let key = upload_key(kind, uploaded_at, &name);
    store.put(&key, data).await?;
    tracing::info!(%key, size, "stored attachment");

    Ok(StoredFile {
        name,
        path: key,
        size: size as i64,
    })
}
