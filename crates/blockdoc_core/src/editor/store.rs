//! Ordered block sequence owner.
//!
//! # Responsibility
//! - Own the document's block list; every other component mutates blocks
//!   through these operations.
//! - Keep lookups by id tolerant: unknown ids are empty results, not errors.
//!
//! # Invariants
//! - The sequence is never observably empty. Removing the last block, or
//!   loading an empty list, yields one fresh empty `text` block.
//! - Missing anchors on insert fall back to append.

use crate::model::block::{Block, BlockId, BlockPatch};
use log::debug;

/// Result of [`BlockStore::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Block was removed from position `index` of the previous sequence.
    Removed { index: usize },
    /// Block was the only one; the sequence was reset to `fresh_id`.
    Reset { fresh_id: BlockId },
    NotFound,
}

/// Ordered, never-empty block sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStore {
    blocks: Vec<Block>,
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStore {
    /// Creates a store holding one empty `text` block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::empty_text()],
        }
    }

    /// Creates a store from loaded blocks, normalizing an empty list.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut store = Self { blocks: Vec::new() };
        store.replace_all(blocks);
        store
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.id == id)
    }

    pub fn find(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    pub fn block_at(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn first(&self) -> &Block {
        // Non-empty by construction.
        &self.blocks[0]
    }

    /// Annotation for `id`, or `""` when the block or annotation is absent.
    pub fn details_of(&self, id: &BlockId) -> &str {
        self.find(id).map(Block::details_or_empty).unwrap_or("")
    }

    /// Inserts `block` right after `after`, or at the end when `after` is
    /// `None` or unknown.
    pub fn insert_after(&mut self, after: Option<&BlockId>, block: Block) -> &[Block] {
        let at = after
            .and_then(|id| self.index_of(id))
            .map_or(self.blocks.len(), |index| index + 1);
        debug!(
            "event=block_insert module=store status=ok id={} index={}",
            block.id, at
        );
        self.blocks.insert(at, block);
        &self.blocks
    }

    /// Inserts `block` right before `before`, or at the end when unknown.
    pub fn insert_before(&mut self, before: &BlockId, block: Block) -> &[Block] {
        let at = self.index_of(before).unwrap_or(self.blocks.len());
        debug!(
            "event=block_insert module=store status=ok id={} index={}",
            block.id, at
        );
        self.blocks.insert(at, block);
        &self.blocks
    }

    /// Merges `patch` into block `id`. Returns `false` when `id` is unknown.
    pub fn update(&mut self, id: &BlockId, patch: BlockPatch) -> bool {
        match self.blocks.iter_mut().find(|block| &block.id == id) {
            Some(block) => {
                block.apply(patch);
                true
            }
            None => {
                debug!("event=block_update module=store status=skip reason=not_found id={id}");
                false
            }
        }
    }

    /// Removes block `id`, resetting to a fresh block if it was the last one.
    pub fn remove(&mut self, id: &BlockId) -> RemoveOutcome {
        let Some(index) = self.index_of(id) else {
            return RemoveOutcome::NotFound;
        };

        if self.blocks.len() == 1 {
            let fresh = Block::empty_text();
            let fresh_id = fresh.id.clone();
            self.blocks = vec![fresh];
            debug!("event=block_remove module=store status=ok id={id} reset=true");
            return RemoveOutcome::Reset { fresh_id };
        }

        self.blocks.remove(index);
        debug!("event=block_remove module=store status=ok id={id} index={index}");
        RemoveOutcome::Removed { index }
    }

    /// Replaces the whole sequence, normalizing an empty list.
    pub fn replace_all(&mut self, blocks: Vec<Block>) {
        if blocks.is_empty() {
            self.blocks = vec![Block::empty_text()];
        } else {
            self.blocks = blocks;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockStore, RemoveOutcome};
    use crate::model::block::{Block, BlockId, BlockPatch, BlockType};

    fn ids(store: &BlockStore) -> Vec<&str> {
        store.blocks().iter().map(|b| b.id.as_str()).collect()
    }

    fn store_abc() -> BlockStore {
        BlockStore::from_blocks(vec![
            Block::with_id("a".into(), BlockType::Text, "A"),
            Block::with_id("b".into(), BlockType::Text, "B"),
            Block::with_id("c".into(), BlockType::Text, "C"),
        ])
    }

    #[test]
    fn insert_after_unknown_or_none_appends() {
        let mut store = store_abc();
        store.insert_after(Some(&BlockId::from("zzz")), Block::with_id("d".into(), BlockType::Text, ""));
        store.insert_after(None, Block::with_id("e".into(), BlockType::Text, ""));
        store.insert_after(Some(&BlockId::from("a")), Block::with_id("f".into(), BlockType::Text, ""));
        assert_eq!(ids(&store), vec!["a", "f", "b", "c", "d", "e"]);
    }

    #[test]
    fn insert_before_places_block_ahead_of_anchor() {
        let mut store = store_abc();
        store.insert_before(&BlockId::from("b"), Block::with_id("v".into(), BlockType::Variation, ""));
        assert_eq!(ids(&store), vec!["a", "v", "b", "c"]);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut store = store_abc();
        let before = store.clone();
        assert!(!store.update(&BlockId::from("nope"), BlockPatch::content("x")));
        assert_eq!(store, before);
    }

    #[test]
    fn removing_last_block_resets_to_fresh_text_block() {
        let mut store = BlockStore::from_blocks(vec![Block::with_id("only".into(), BlockType::Text, "x")]);
        let outcome = store.remove(&BlockId::from("only"));
        let RemoveOutcome::Reset { fresh_id } = outcome else {
            panic!("expected reset, got {outcome:?}");
        };
        assert_eq!(store.len(), 1);
        let fresh = store.first();
        assert_eq!(fresh.id, fresh_id);
        assert_ne!(fresh.id.as_str(), "only");
        assert_eq!(fresh.kind, BlockType::Text);
        assert!(fresh.content.is_empty());
    }

    #[test]
    fn empty_load_is_normalized() {
        let store = BlockStore::from_blocks(Vec::new());
        assert_eq!(store.len(), 1);
        assert_eq!(store.first().kind, BlockType::Text);
    }

    #[test]
    fn details_of_unknown_is_empty() {
        let store = store_abc();
        assert_eq!(store.details_of(&BlockId::from("missing")), "");
    }
}
