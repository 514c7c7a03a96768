//! Core engine for the block document editor.
//! Owns block ordering, hierarchy, selection, annotation sync and inline
//! completion; UI layers render what this crate decides.

pub mod completion;
pub mod config;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use completion::http::HttpCompletionProvider;
pub use completion::pipeline::{CompletionOutcome, CompletionPipeline, CompletionTicket};
pub use completion::provider::{ModelCompletionProvider, NoStyles, StyleLookup, TextModel};
pub use completion::{
    CancelToken, CompletionError, CompletionProvider, CompletionRequest, CompletionResponse,
};
pub use config::{EditorConfig, GenerationConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use editor::details::{DetailCommit, DetailSync, FlushTrigger};
pub use editor::hierarchy::{promote, PromoteOutcome};
pub use editor::outline::{extract_outline, OutlineEntry};
pub use editor::selection::{DeleteOutcome, DetailPanelState, SelectionController};
pub use editor::store::{BlockStore, RemoveOutcome};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::block::{Block, BlockId, BlockPatch, BlockType, BlockValidationError, StripColor};
pub use model::document::{DocumentRecord, DocumentSummary, DEFAULT_DOCUMENT_TITLE};
pub use model::style::{MarketAwareness, MarketSophistication, StyleProfile, StyleValidationError};
pub use repo::document_repo::{DocumentRepository, RepoError, RepoResult, SqliteDocumentRepository};
pub use repo::style_repo::{SqliteStyleRepository, StyleRepository};
pub use service::document_session::{DocumentSession, SaveOutcome};
pub use service::editor_session::{BlockKey, CommandEffect, EditorSession, PanelKey};
pub use service::style_service::StyleService;

/// Minimal health-check API for embedding hosts.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
