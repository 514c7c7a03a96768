//! Debounced detail annotation writes.
//!
//! # Responsibility
//! - Buffer annotation keystrokes and commit them to the store after a
//!   quiet period.
//! - Flush synchronously on navigation, close and escape.
//!
//! # Invariants
//! - At most one draft is pending; a flush consumes it, so no timer fires
//!   afterwards with stale data.
//! - Editing a different block first commits the previous block's draft.

use crate::editor::store::BlockStore;
use crate::model::block::{BlockId, BlockPatch};
use log::debug;
use std::time::{Duration, Instant};

/// Why a pending draft was committed ahead of its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// Focus returns from the panel to the block.
    ReturnToBlock,
    /// Panel hands off to a freshly created block.
    NewBlock,
    Escape,
    Close,
    /// Selection moved or the block is about to change structurally.
    Navigation,
}

/// Committed annotation write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailCommit {
    pub block_id: BlockId,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DetailDraft {
    block_id: BlockId,
    value: String,
    deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct DetailSync {
    quiet_period: Duration,
    pending: Option<DetailDraft>,
    commits: u64,
}

impl DetailSync {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            commits: 0,
        }
    }

    /// Total writes committed to the store.
    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records a keystroke and restarts the quiet period.
    pub fn edit(
        &mut self,
        store: &mut BlockStore,
        block_id: BlockId,
        value: impl Into<String>,
        now: Instant,
    ) -> Option<DetailCommit> {
        let previous = match &self.pending {
            Some(draft) if draft.block_id != block_id => self.commit_pending(store),
            _ => None,
        };
        self.pending = Some(DetailDraft {
            block_id,
            value: value.into(),
            deadline: now + self.quiet_period,
        });
        previous
    }

    /// Commits the draft once its quiet period has elapsed.
    ///
    /// A draft equal to the stored annotation is dropped without a write.
    pub fn poll(&mut self, store: &mut BlockStore, now: Instant) -> Option<DetailCommit> {
        let draft = self.pending.as_ref()?;
        if now < draft.deadline {
            return None;
        }
        if store.details_of(&draft.block_id) == draft.value {
            self.pending = None;
            return None;
        }
        self.commit_pending(store)
    }

    /// Commits the draft immediately regardless of its deadline.
    pub fn flush(&mut self, store: &mut BlockStore, trigger: FlushTrigger) -> Option<DetailCommit> {
        let commit = self.commit_pending(store);
        if let Some(commit) = &commit {
            debug!(
                "event=details_flush module=details status=ok trigger={:?} id={}",
                trigger, commit.block_id
            );
        }
        commit
    }

    fn commit_pending(&mut self, store: &mut BlockStore) -> Option<DetailCommit> {
        let draft = self.pending.take()?;
        if !store.update(&draft.block_id, BlockPatch::details(draft.value.clone())) {
            debug!(
                "event=details_commit module=details status=skip reason=block_missing id={}",
                draft.block_id
            );
            return None;
        }
        self.commits += 1;
        Some(DetailCommit {
            block_id: draft.block_id,
            details: draft.value,
        })
    }
}
