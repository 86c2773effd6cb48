use rusqlite::Connection;

use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    // Base schema — idempotent CREATE TABLE IF NOT EXISTS
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            kind                TEXT NOT NULL CHECK(kind IN ('incoming', 'outgoing')),
            number              TEXT NOT NULL,
            date                TEXT NOT NULL,
            summary             TEXT NOT NULL,
            document_type       TEXT NOT NULL DEFAULT 'other',
            priority            TEXT NOT NULL DEFAULT 'normal'
                                    CHECK(priority IN (
                                        'normal', 'medium', 'high',
                                        'urgent', 'very-urgent', 'low'
                                    )),
            status              TEXT NOT NULL DEFAULT 'draft'
                                    CHECK(status IN (
                                        'draft', 'processing', 'completed',
                                        'overdue', 'sent'
                                    )),
            sender_department   TEXT,
            receiver_department TEXT,
            main_responsible    TEXT,
            processing_deadline TEXT,
            signer              TEXT,
            tags                TEXT NOT NULL DEFAULT '',
            notes               TEXT,
            attachment_name     TEXT,
            attachment_path     TEXT,
            attachment_size     INTEGER,
            created_at          TEXT NOT NULL,
            updated_at          TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_documents_kind    ON documents(kind);
        CREATE INDEX IF NOT EXISTS idx_documents_status  ON documents(status);
        CREATE INDEX IF NOT EXISTS idx_documents_date    ON documents(date);
        CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(created_at);
        ",
    )?;

    // Versioned migrations run on top of the base schema once they exist.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    Ok(())
}
