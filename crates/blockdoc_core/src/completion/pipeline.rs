//! Completion request lifecycle against live block content.
//!
//! # Responsibility
//! - Snapshot context, place the loading placeholder and build the request.
//! - Apply the suggestion or roll the placeholder back on failure.
//!
//! # Invariants
//! - Write-back only happens when the captured snapshot still matches: the
//!   text before the cursor is unchanged and the placeholder sits at the
//!   recorded offset. Otherwise the result is dropped and the placeholder
//!   is removed wherever it ended up.
//! - Every resolved or cancelled request leaves no placeholder behind.
//! - One request per block; a newer request cancels the older one and
//!   removes its placeholder, so the older result is ignored.

use crate::completion::{
    CancelToken, CompletionError, CompletionProvider, CompletionRequest, CompletionResponse,
};
use crate::editor::markup::{char_len, char_to_byte, insert_at, plain_text, replace_range};
use crate::editor::store::BlockStore;
use crate::model::block::{BlockId, BlockPatch};
use log::{info, warn};
use std::collections::HashMap;

/// Captured state for one pending request.
#[derive(Debug, Clone)]
pub struct CompletionTicket {
    pub request_id: u64,
    pub block_id: BlockId,
    /// Char offset of the cursor when the request started.
    pub cursor: usize,
    pub request: CompletionRequest,
    pub cancel: CancelToken,
    expected_prefix: String,
}

/// What happened to the block when a request resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Placeholder replaced by `inserted` plus a trailing space.
    Applied { inserted: String },
    /// Request failed and the placeholder was removed.
    RolledBack,
    /// A newer request or an explicit cancel took over; nothing written.
    Superseded,
    /// Content around the cursor changed meanwhile; nothing written.
    Stale,
    BlockMissing,
}

#[derive(Debug, Clone)]
struct InFlight {
    request_id: u64,
    cursor: usize,
    expected_prefix: String,
    cancel: CancelToken,
}

#[derive(Debug, Clone)]
pub struct CompletionPipeline {
    placeholder: String,
    style_id: Option<String>,
    next_request_id: u64,
    in_flight: HashMap<BlockId, InFlight>,
}

impl CompletionPipeline {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            style_id: None,
            next_request_id: 1,
            in_flight: HashMap::new(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Style profile forwarded with every request.
    pub fn set_style(&mut self, style_id: Option<String>) {
        self.style_id = style_id;
    }

    pub fn is_pending(&self, block_id: &BlockId) -> bool {
        self.in_flight.contains_key(block_id)
    }

    /// Snapshots context and inserts the placeholder at `cursor`.
    ///
    /// Returns `None` when the block does not exist.
    pub fn begin(
        &mut self,
        store: &mut BlockStore,
        block_id: &BlockId,
        cursor: usize,
    ) -> Option<CompletionTicket> {
        if self.in_flight.contains_key(block_id) {
            self.cancel(store, block_id);
        }

        let index = store.index_of(block_id)?;
        let content = store.find(block_id)?.content.clone();
        let cursor = cursor.min(char_len(&content));
        let expected_prefix = content[..char_to_byte(&content, cursor)].to_string();

        let previous_content = store.blocks()[..index]
            .iter()
            .map(|block| plain_text(&block.content))
            .filter(|text| !text.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let current_content = plain_text(&expected_prefix).trim().to_string();

        let updated = insert_at(&content, cursor, &self.placeholder);
        store.update(block_id, BlockPatch::content(updated));

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        let cancel = CancelToken::new();
        self.in_flight.insert(
            block_id.clone(),
            InFlight {
                request_id,
                cursor,
                expected_prefix: expected_prefix.clone(),
                cancel: cancel.clone(),
            },
        );

        info!(
            "event=completion_request module=completion status=start request_id={} id={} cursor={} context_chars={}",
            request_id,
            block_id,
            cursor,
            previous_content.chars().count()
        );

        Some(CompletionTicket {
            request_id,
            block_id: block_id.clone(),
            cursor,
            request: CompletionRequest {
                previous_content,
                current_content,
                style_id: self.style_id.clone(),
            },
            cancel,
            expected_prefix,
        })
    }

    /// Resolves `ticket` with the collaborator's result.
    pub fn finish(
        &mut self,
        store: &mut BlockStore,
        ticket: &CompletionTicket,
        result: Result<CompletionResponse, CompletionError>,
    ) -> CompletionOutcome {
        let current = self
            .in_flight
            .get(&ticket.block_id)
            .is_some_and(|entry| entry.request_id == ticket.request_id);
        if current && ticket.cancel.is_cancelled() {
            self.cancel(store, &ticket.block_id);
            return CompletionOutcome::Superseded;
        }
        if !current {
            info!(
                "event=completion_request module=completion status=skip reason=superseded request_id={}",
                ticket.request_id
            );
            return CompletionOutcome::Superseded;
        }
        self.in_flight.remove(&ticket.block_id);

        let Some(block) = store.find(&ticket.block_id) else {
            warn!(
                "event=completion_request module=completion status=skip reason=block_missing request_id={}",
                ticket.request_id
            );
            return CompletionOutcome::BlockMissing;
        };
        let content = block.content.clone();

        if !self.snapshot_matches(&content, ticket.cursor, &ticket.expected_prefix) {
            self.clear_placeholder(store, &ticket.block_id, ticket.cursor, &ticket.expected_prefix);
            warn!(
                "event=completion_request module=completion status=skip reason=stale request_id={}",
                ticket.request_id
            );
            return CompletionOutcome::Stale;
        }

        let placeholder_len = char_len(&self.placeholder);
        match result {
            Ok(response) => {
                let inserted =
                    strip_echo(response.completion.trim(), &ticket.request.current_content);
                let updated = replace_range(
                    &content,
                    ticket.cursor,
                    placeholder_len,
                    &format!("{inserted} "),
                );
                store.update(&ticket.block_id, BlockPatch::content(updated));
                info!(
                    "event=completion_request module=completion status=ok request_id={} inserted_chars={}",
                    ticket.request_id,
                    inserted.chars().count()
                );
                CompletionOutcome::Applied { inserted }
            }
            Err(err) => {
                let restored = replace_range(&content, ticket.cursor, placeholder_len, "");
                store.update(&ticket.block_id, BlockPatch::content(restored));
                warn!(
                    "event=completion_request module=completion status=error request_id={} error={}",
                    ticket.request_id, err
                );
                CompletionOutcome::RolledBack
            }
        }
    }

    /// Cancels the pending request on `block_id` and removes its placeholder.
    pub fn cancel(&mut self, store: &mut BlockStore, block_id: &BlockId) -> bool {
        let Some(entry) = self.in_flight.remove(block_id) else {
            return false;
        };
        entry.cancel.cancel();
        self.clear_placeholder(store, block_id, entry.cursor, &entry.expected_prefix);
        info!(
            "event=completion_request module=completion status=cancelled request_id={} id={}",
            entry.request_id, block_id
        );
        true
    }

    /// Runs a whole request synchronously against `provider`.
    pub fn run(
        &mut self,
        store: &mut BlockStore,
        provider: &dyn CompletionProvider,
        block_id: &BlockId,
        cursor: usize,
    ) -> CompletionOutcome {
        let Some(ticket) = self.begin(store, block_id, cursor) else {
            return CompletionOutcome::BlockMissing;
        };
        let result = provider.complete(&ticket.request, &ticket.cancel);
        self.finish(store, &ticket, result)
    }

    /// Removes the placeholder at the recorded offset, or else its first
    /// occurrence anywhere in the block.
    fn clear_placeholder(
        &self,
        store: &mut BlockStore,
        block_id: &BlockId,
        cursor: usize,
        expected_prefix: &str,
    ) {
        let Some(block) = store.find(block_id) else {
            return;
        };
        let content = &block.content;
        let restored = if self.snapshot_matches(content, cursor, expected_prefix) {
            replace_range(content, cursor, char_len(&self.placeholder), "")
        } else if self.placeholder.is_empty() || !content.contains(self.placeholder.as_str()) {
            return;
        } else {
            content.replacen(self.placeholder.as_str(), "", 1)
        };
        store.update(block_id, BlockPatch::content(restored));
    }

    fn snapshot_matches(&self, content: &str, cursor: usize, expected_prefix: &str) -> bool {
        let cursor_byte = char_to_byte(content, cursor);
        if &content[..cursor_byte] != expected_prefix {
            return false;
        }
        content[cursor_byte..].starts_with(self.placeholder.as_str())
    }
}

/// Drops an echoed copy of the user's own text from the suggestion.
fn strip_echo(completion: &str, current: &str) -> String {
    if !current.is_empty() {
        if let Some(rest) = completion.strip_prefix(current) {
            return rest.trim_start().to_string();
        }
    }
    completion.to_string()
}
