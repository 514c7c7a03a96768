//! Document lifecycle service: load, edit, debounced save, flush.
//!
//! # Responsibility
//! - Load a document through the persistence collaborator and hand its
//!   blocks to an [`EditorSession`].
//! - Schedule a save after title changes and save on navigate-away.
//!
//! # Invariants
//! - Saves never block local editing; a failed save is logged and the
//!   edit stays in memory. There is no retry.
//! - A document with the default title and no authored content is not
//!   written.

use crate::config::EditorConfig;
use crate::editor::details::FlushTrigger;
use crate::model::document::{DocumentRecord, DEFAULT_DOCUMENT_TITLE};
use crate::repo::document_repo::{DocumentRepository, RepoResult};
use crate::service::editor_session::EditorSession;
use log::{error, info};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Result of one save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Nothing authored yet.
    Skipped,
    /// Collaborator failed; the state is kept only in memory.
    Failed,
}

pub struct DocumentSession<R: DocumentRepository> {
    repo: R,
    document_id: String,
    title: String,
    editor: EditorSession,
    save_delay: Duration,
    save_due: Option<Instant>,
}

impl<R: DocumentRepository> DocumentSession<R> {
    /// Loads `document_id`; an unknown document starts blank.
    pub fn open(repo: R, document_id: impl Into<String>, config: EditorConfig) -> RepoResult<Self> {
        let document_id = document_id.into();
        let record = repo.load(&document_id)?;
        let found = record.is_some();
        let record = record.unwrap_or_default();
        info!(
            "event=document_open module=session status=ok document_id={} found={} blocks={}",
            document_id,
            found,
            record.blocks.len()
        );

        let save_delay = config.save_debounce();
        let title = if record.title.trim().is_empty() {
            DEFAULT_DOCUMENT_TITLE.to_string()
        } else {
            record.title
        };
        Ok(Self {
            repo,
            document_id,
            title,
            editor: EditorSession::with_blocks(config, record.blocks),
            save_delay,
            save_due: None,
        })
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn editor(&self) -> &EditorSession {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorSession {
        &mut self.editor
    }

    pub fn save_pending(&self) -> bool {
        self.save_due.is_some()
    }

    /// Renames the document and (re)schedules a save.
    pub fn set_title(&mut self, title: impl Into<String>, now: Instant) {
        self.title = title.into();
        self.save_due = Some(now + self.save_delay);
    }

    /// Advances detail and save timers.
    pub fn tick(&mut self, now: Instant) -> Option<SaveOutcome> {
        self.editor.tick(now);
        match self.save_due {
            Some(due) if now >= due => Some(self.save()),
            _ => None,
        }
    }

    /// Navigate-away/unmount: commit pending annotations and save now.
    pub fn flush(&mut self) -> SaveOutcome {
        self.editor.flush_details(FlushTrigger::Navigation);
        self.save()
    }

    /// Current state as a persistable record.
    pub fn snapshot(&self) -> DocumentRecord {
        DocumentRecord::new(self.title.clone(), self.editor.blocks().to_vec())
    }

    /// Saves immediately, cancelling any scheduled save.
    pub fn save(&mut self) -> SaveOutcome {
        self.save_due = None;
        let mut record = self.snapshot();
        if !record.has_user_data() {
            info!(
                "event=document_save module=session status=skip reason=empty document_id={}",
                self.document_id
            );
            return SaveOutcome::Skipped;
        }
        record.updated_at = Some(now_epoch_ms());

        let started_at = Instant::now();
        match self.repo.save(&self.document_id, &record) {
            Ok(()) => {
                info!(
                    "event=document_save module=session status=ok document_id={} blocks={} duration_ms={}",
                    self.document_id,
                    record.blocks.len(),
                    started_at.elapsed().as_millis()
                );
                SaveOutcome::Saved
            }
            Err(err) => {
                error!(
                    "event=document_save module=session status=error document_id={} duration_ms={} error={}",
                    self.document_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                SaveOutcome::Failed
            }
        }
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
