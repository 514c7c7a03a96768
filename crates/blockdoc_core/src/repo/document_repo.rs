//! Document persistence contracts and SQLite implementation.
//!
//! # Responsibility
//! - Load and save whole documents (`title` + ordered blocks) by id.
//! - Create documents for an owner and list that owner's documents.
//! - Keep SQL and JSON encoding details inside the persistence boundary.
//!
//! # Invariants
//! - Blocks are stored as one JSON array; order is preserved verbatim.
//! - Saves are upserts; there is no partial block write.
//! - Read paths reject records whose blocks fail `Block::validate()`.
//! - Saves never change a document's owner.
//! - Listings are newest first and hide documents without user data.

use crate::db::DbError;
use crate::model::block::{Block, BlockValidationError};
use crate::model::document::{DocumentRecord, DocumentSummary};
use crate::repo::ensure_schema;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for document and style persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Stored blocks could not be encoded or decoded.
    Serialization(serde_json::Error),
    Validation(String),
    NotFound(String),
    /// Connection is not migrated to the schema this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "block encoding failed: {err}"),
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<BlockValidationError> for RepoError {
    fn from(value: BlockValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Persistence collaborator for documents.
pub trait DocumentRepository {
    /// Loads one document; `None` when it has never been saved.
    fn load(&self, document_id: &str) -> RepoResult<Option<DocumentRecord>>;
    /// Inserts or replaces one document.
    fn save(&self, document_id: &str, record: &DocumentRecord) -> RepoResult<()>;
    /// Stores a blank document owned by `user_id` and returns its new id.
    fn create_document(&self, user_id: &str) -> RepoResult<String>;
    /// Documents owned by `user_id`, most recently updated first.
    fn list_documents(&self, user_id: &str) -> RepoResult<Vec<DocumentSummary>>;
}

impl<R: DocumentRepository + ?Sized> DocumentRepository for &R {
    fn load(&self, document_id: &str) -> RepoResult<Option<DocumentRecord>> {
        (**self).load(document_id)
    }

    fn save(&self, document_id: &str, record: &DocumentRecord) -> RepoResult<()> {
        (**self).save(document_id, record)
    }

    fn create_document(&self, user_id: &str) -> RepoResult<String> {
        (**self).create_document(user_id)
    }

    fn list_documents(&self, user_id: &str) -> RepoResult<Vec<DocumentSummary>> {
        (**self).list_documents(user_id)
    }
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            "documents",
            &["document_id", "user_id", "title", "blocks_json", "updated_at"],
        )?;
        Ok(Self { conn })
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn load(&self, document_id: &str) -> RepoResult<Option<DocumentRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT title, blocks_json, updated_at
                 FROM documents
                 WHERE document_id = ?1;",
                [document_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((title, blocks_json, updated_at)) = row else {
            return Ok(None);
        };

        Ok(Some(DocumentRecord {
            title,
            blocks: decode_blocks(&blocks_json)?,
            updated_at: Some(updated_at),
        }))
    }

    fn save(&self, document_id: &str, record: &DocumentRecord) -> RepoResult<()> {
        if document_id.trim().is_empty() {
            return Err(RepoError::Validation("document id must not be blank".to_string()));
        }
        let blocks_json = serde_json::to_string(&record.blocks)?;

        self.conn.execute(
            "INSERT INTO documents (document_id, title, blocks_json, updated_at)
             VALUES (?1, ?2, ?3, COALESCE(?4, strftime('%s', 'now') * 1000))
             ON CONFLICT(document_id) DO UPDATE SET
                title = excluded.title,
                blocks_json = excluded.blocks_json,
                updated_at = excluded.updated_at;",
            params![document_id, record.title, blocks_json, record.updated_at],
        )?;
        Ok(())
    }

    fn create_document(&self, user_id: &str) -> RepoResult<String> {
        if user_id.trim().is_empty() {
            return Err(RepoError::Validation("owner id must not be blank".to_string()));
        }
        let document_id = Uuid::new_v4().to_string();
        let record = DocumentRecord::default();
        let blocks_json = serde_json::to_string(&record.blocks)?;

        self.conn.execute(
            "INSERT INTO documents (document_id, user_id, title, blocks_json)
             VALUES (?1, ?2, ?3, ?4);",
            params![document_id, user_id, record.title, blocks_json],
        )?;
        Ok(document_id)
    }

    fn list_documents(&self, user_id: &str) -> RepoResult<Vec<DocumentSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT document_id, title, blocks_json, updated_at
             FROM documents
             WHERE user_id = ?1
             ORDER BY updated_at DESC, document_id ASC;",
        )?;
        let mut rows = stmt.query([user_id])?;

        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            let document_id: String = row.get(0)?;
            let title: String = row.get(1)?;
            let blocks_json: String = row.get(2)?;
            let updated_at: i64 = row.get(3)?;
            let record = DocumentRecord {
                title,
                blocks: decode_blocks(&blocks_json)?,
                updated_at: Some(updated_at),
            };
            if !record.has_user_data() {
                continue;
            }
            summaries.push(DocumentSummary {
                document_id,
                title: record.title,
                updated_at,
            });
        }
        Ok(summaries)
    }
}

fn decode_blocks(blocks_json: &str) -> RepoResult<Vec<Block>> {
    let blocks: Vec<Block> = serde_json::from_str(blocks_json)?;
    for block in &blocks {
        block.validate()?;
    }
    Ok(blocks)
}
