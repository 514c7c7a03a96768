//! Persisted document record.

use crate::model::block::Block;
use serde::{Deserialize, Serialize};

/// Title used until the user names the document.
pub const DEFAULT_DOCUMENT_TITLE: &str = "Untitled Document";

/// Document as exchanged with the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Unix epoch milliseconds of the last successful save.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl DocumentRecord {
    pub fn new(title: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            title: title.into(),
            blocks,
            updated_at: None,
        }
    }

    /// Whether saving this record would persist anything the user authored.
    ///
    /// A document with the default title and only blank blocks is skipped.
    pub fn has_user_data(&self) -> bool {
        self.title != DEFAULT_DOCUMENT_TITLE || self.blocks.iter().any(Block::has_user_data)
    }
}

impl Default for DocumentRecord {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT_TITLE, vec![Block::empty_text()])
    }
}

/// One row of a user's document list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub document_id: String,
    pub title: String,
    pub updated_at: i64,
}
