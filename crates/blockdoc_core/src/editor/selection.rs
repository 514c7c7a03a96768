//! Active block and detail panel state machine.
//!
//! # Responsibility
//! - Track at most one selected block and the detail panel visibility.
//! - Drive new-block placement and re-selection after deletion.
//!
//! # Invariants
//! - After any delete the selection names an existing block.
//! - Opening the panel while it is open is close-then-reopen: the mount
//!   generation advances so the panel reloads the selected block's details.

use crate::editor::store::{BlockStore, RemoveOutcome};
use crate::model::block::{Block, BlockId};
use log::debug;

/// Detail panel visibility plus a remount counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailPanelState {
    pub open: bool,
    /// Advances every time the panel is (re)mounted.
    pub mount: u64,
}

/// Result of [`SelectionController::request_delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Block removed; `selected` is the block now selected.
    Removed { selected: BlockId },
    /// The sole block was removed and replaced by `fresh_id`.
    Reset { fresh_id: BlockId },
    NotFound,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    selection: Option<BlockId>,
    panel: DetailPanelState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.selection.as_ref()
    }

    pub fn panel(&self) -> DetailPanelState {
        self.panel
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel.open
    }

    /// Selects `id`. Idempotent.
    pub fn select(&mut self, id: BlockId) {
        if self.selection.as_ref() != Some(&id) {
            debug!("event=select module=selection status=ok id={id}");
            self.selection = Some(id);
        }
    }

    /// Inserts an empty block after the selection (or at the end) and
    /// selects it. An open panel is remounted onto the new block.
    pub fn request_new_block(&mut self, store: &mut BlockStore) -> BlockId {
        let mut block = Block::empty_text();
        block.details = Some(String::new());
        let id = block.id.clone();
        store.insert_after(self.selection.as_ref(), block);
        self.select(id.clone());
        if self.panel.open {
            self.remount_panel();
        }
        id
    }

    /// Deletes `id` and moves the selection to the previous neighbour.
    pub fn request_delete(&mut self, store: &mut BlockStore, id: &BlockId) -> DeleteOutcome {
        match store.remove(id) {
            RemoveOutcome::Removed { index } => {
                let target = index.saturating_sub(1);
                let selected = store
                    .block_at(target)
                    .unwrap_or_else(|| store.first())
                    .id
                    .clone();
                self.selection = Some(selected.clone());
                DeleteOutcome::Removed { selected }
            }
            RemoveOutcome::Reset { fresh_id } => {
                self.selection = Some(fresh_id.clone());
                DeleteOutcome::Reset { fresh_id }
            }
            RemoveOutcome::NotFound => DeleteOutcome::NotFound,
        }
    }

    /// Opens the panel; when already open it is closed and reopened.
    pub fn open_detail_panel(&mut self) {
        if self.panel.open {
            self.remount_panel();
        } else {
            self.panel.open = true;
            self.panel.mount += 1;
        }
    }

    pub fn close_detail_panel(&mut self) {
        self.panel.open = false;
    }

    fn remount_panel(&mut self) {
        self.close_detail_panel();
        self.panel.open = true;
        self.panel.mount += 1;
        debug!(
            "event=panel_remount module=selection status=ok mount={}",
            self.panel.mount
        );
    }
}
