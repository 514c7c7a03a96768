//! Editor use-case service.
//!
//! # Responsibility
//! - Compose the block store, selection controller, detail sync and
//!   completion pipeline behind keyboard-level commands.
//! - Flush pending annotations before anything that moves focus away from
//!   the annotated block.
//!
//! # Invariants
//! - Structural edits run to completion before the next command.
//! - Selection never names a deleted block after a command returns.

use crate::completion::pipeline::{CompletionOutcome, CompletionPipeline, CompletionTicket};
use crate::completion::{CompletionError, CompletionProvider, CompletionResponse};
use crate::config::EditorConfig;
use crate::editor::details::{DetailCommit, DetailSync, FlushTrigger};
use crate::editor::hierarchy::{promote, PromoteOutcome};
use crate::editor::outline::{extract_outline, OutlineEntry};
use crate::editor::selection::{DeleteOutcome, DetailPanelState, SelectionController};
use crate::editor::store::BlockStore;
use crate::model::block::{Block, BlockId, BlockPatch, StripColor};
use std::time::Instant;

/// Keys handled while a block has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKey {
    Enter,
    /// Soft line break inside the block; no structural effect.
    ShiftEnter,
    /// Inline completion at the char offset `cursor`.
    Tab { cursor: usize },
    ShiftTab,
    ShiftBackspace,
    ShiftArrowRight,
}

/// Keys handled while the detail panel has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKey {
    ShiftArrowLeft,
    ShiftArrowRight,
    Escape,
    CloseButton,
}

/// Observable effect of one command.
#[derive(Debug, Clone)]
pub enum CommandEffect {
    BlockCreated(BlockId),
    Deleted(DeleteOutcome),
    Promoted(PromoteOutcome),
    /// Placeholder placed; resolve with [`EditorSession::finish_completion`].
    CompletionStarted(CompletionTicket),
    PanelOpened { mount: u64 },
    PanelClosed,
    /// Focus returns to this block.
    FocusBlock(BlockId),
    Ignored,
}

pub struct EditorSession {
    config: EditorConfig,
    store: BlockStore,
    selection: SelectionController,
    details: DetailSync,
    completion: CompletionPipeline,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_blocks(config, Vec::new())
    }

    /// Starts a session over loaded blocks; an empty list becomes one block.
    pub fn with_blocks(config: EditorConfig, blocks: Vec<Block>) -> Self {
        let details = DetailSync::new(config.detail_debounce());
        let completion = CompletionPipeline::new(config.completion_placeholder.clone());
        Self {
            store: BlockStore::from_blocks(blocks),
            selection: SelectionController::new(),
            details,
            completion,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn blocks(&self) -> &[Block] {
        self.store.blocks()
    }

    /// Replaces the whole document, e.g. after a late load.
    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.details.flush(&mut self.store, FlushTrigger::Navigation);
        self.store.replace_all(blocks);
        let dangling = self
            .selection
            .selected()
            .is_some_and(|selected| self.store.find(selected).is_none());
        if dangling {
            let first = self.store.first().id.clone();
            self.selection.select(first);
        }
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.selection.selected()
    }

    pub fn panel(&self) -> DetailPanelState {
        self.selection.panel()
    }

    pub fn details_commit_count(&self) -> u64 {
        self.details.commit_count()
    }

    pub fn set_completion_style(&mut self, style_id: Option<String>) {
        self.completion.set_style(style_id);
    }

    /// Focus/click on a block. Pending annotations of another block are
    /// committed first.
    pub fn select(&mut self, id: &BlockId) {
        if self.selection.selected() != Some(id) {
            self.details.flush(&mut self.store, FlushTrigger::Navigation);
        }
        self.selection.select(id.clone());
    }

    pub fn set_content(&mut self, id: &BlockId, content: impl Into<String>) -> bool {
        self.store.update(id, BlockPatch::content(content))
    }

    pub fn set_strip_color(&mut self, id: &BlockId, color: StripColor) -> bool {
        self.store.update(id, BlockPatch::strip_color(color))
    }

    /// Annotation of `id`; `""` when unknown.
    pub fn block_details(&self, id: &BlockId) -> &str {
        self.store.details_of(id)
    }

    pub fn new_block(&mut self) -> BlockId {
        self.details.flush(&mut self.store, FlushTrigger::Navigation);
        self.selection.request_new_block(&mut self.store)
    }

    pub fn delete_block(&mut self, id: &BlockId) -> DeleteOutcome {
        self.details.flush(&mut self.store, FlushTrigger::Navigation);
        self.completion.cancel(&mut self.store, id);
        self.selection.request_delete(&mut self.store, id)
    }

    pub fn promote(&mut self, id: &BlockId) -> PromoteOutcome {
        promote(&mut self.store, id, &self.config.default_variation_label)
    }

    pub fn open_detail_panel(&mut self) -> u64 {
        self.details.flush(&mut self.store, FlushTrigger::Navigation);
        self.selection.open_detail_panel();
        self.selection.panel().mount
    }

    pub fn close_detail_panel(&mut self) {
        self.details.flush(&mut self.store, FlushTrigger::Close);
        self.selection.close_detail_panel();
    }

    /// Records an annotation keystroke for the selected block.
    pub fn edit_details(&mut self, value: impl Into<String>, now: Instant) -> Option<DetailCommit> {
        let id = self.selection.selected()?.clone();
        self.details.edit(&mut self.store, id, value, now)
    }

    /// Advances timers; commits a due annotation draft.
    pub fn tick(&mut self, now: Instant) -> Option<DetailCommit> {
        self.details.poll(&mut self.store, now)
    }

    /// Commits any pending annotation immediately.
    pub fn flush_details(&mut self, trigger: FlushTrigger) -> Option<DetailCommit> {
        self.details.flush(&mut self.store, trigger)
    }

    /// Dispatches a key pressed while `id` has focus.
    pub fn handle_block_key(&mut self, id: &BlockId, key: BlockKey) -> CommandEffect {
        if key == BlockKey::ShiftEnter {
            return CommandEffect::Ignored;
        }
        // The key comes from a focused block, so that block is the selection.
        if self.store.find(id).is_some() {
            self.select(id);
        }
        match key {
            BlockKey::Enter => CommandEffect::BlockCreated(self.new_block()),
            BlockKey::ShiftEnter => CommandEffect::Ignored,
            BlockKey::Tab { cursor } => match self.begin_completion(id, cursor) {
                Some(ticket) => CommandEffect::CompletionStarted(ticket),
                None => CommandEffect::Ignored,
            },
            BlockKey::ShiftTab => CommandEffect::Promoted(self.promote(id)),
            BlockKey::ShiftBackspace => CommandEffect::Deleted(self.delete_block(id)),
            BlockKey::ShiftArrowRight => {
                if self.store.find(id).is_none() {
                    return CommandEffect::Ignored;
                }
                CommandEffect::PanelOpened {
                    mount: self.open_detail_panel(),
                }
            }
        }
    }

    /// Dispatches a key pressed inside the detail panel.
    pub fn handle_panel_key(&mut self, key: PanelKey) -> CommandEffect {
        match key {
            PanelKey::ShiftArrowLeft => {
                self.details.flush(&mut self.store, FlushTrigger::ReturnToBlock);
                match self.selection.selected() {
                    Some(id) => CommandEffect::FocusBlock(id.clone()),
                    None => CommandEffect::Ignored,
                }
            }
            PanelKey::ShiftArrowRight => {
                self.details.flush(&mut self.store, FlushTrigger::NewBlock);
                self.selection.close_detail_panel();
                let id = self.selection.request_new_block(&mut self.store);
                CommandEffect::FocusBlock(id)
            }
            PanelKey::Escape => {
                self.details.flush(&mut self.store, FlushTrigger::Escape);
                self.selection.close_detail_panel();
                CommandEffect::PanelClosed
            }
            PanelKey::CloseButton => {
                self.close_detail_panel();
                CommandEffect::PanelClosed
            }
        }
    }

    pub fn begin_completion(&mut self, id: &BlockId, cursor: usize) -> Option<CompletionTicket> {
        self.selection.select(id.clone());
        self.completion.begin(&mut self.store, id, cursor)
    }

    pub fn finish_completion(
        &mut self,
        ticket: &CompletionTicket,
        result: Result<CompletionResponse, CompletionError>,
    ) -> CompletionOutcome {
        self.completion.finish(&mut self.store, ticket, result)
    }

    /// Runs a completion synchronously against `provider`.
    pub fn complete(
        &mut self,
        id: &BlockId,
        cursor: usize,
        provider: &dyn CompletionProvider,
    ) -> CompletionOutcome {
        self.completion.run(&mut self.store, provider, id, cursor)
    }

    pub fn cancel_completion(&mut self, id: &BlockId) -> bool {
        self.completion.cancel(&mut self.store, id)
    }

    pub fn outline(&self) -> Vec<OutlineEntry> {
        extract_outline(self.store.blocks())
    }

    /// Selects the block behind an outline entry.
    pub fn navigate_outline(&mut self, id: &BlockId) -> bool {
        if self.store.find(id).is_none() {
            return false;
        }
        self.select(id);
        true
    }
}
