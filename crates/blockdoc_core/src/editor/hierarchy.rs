//! Variation/subblock promotion.
//!
//! # Responsibility
//! - Turn a `text` block into a variation header followed by the original
//!   content demoted to a subblock.
//! - Append a new sibling subblock under an existing variation.
//!
//! # Invariants
//! - Labels prefer the first emphasized run; blank labels fall back to a
//!   deterministic placeholder so a header is never empty.
//! - A subblock without `parent_id` is left untouched.
//! - Variation blocks are never promoted.

use crate::editor::markup::extract_emphasis;
use crate::editor::store::BlockStore;
use crate::model::block::{Block, BlockId, BlockPatch, BlockType};
use log::{debug, info};

/// Result of [`promote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoteOutcome {
    /// A `text` block became a subblock under a new variation header.
    Promoted {
        variation_id: BlockId,
        subblock_id: BlockId,
    },
    /// A sibling subblock was inserted after the triggering subblock.
    SiblingAdded {
        sibling_id: BlockId,
        parent_id: BlockId,
        rank: usize,
    },
    /// Subblock has no parent reference; nothing changed.
    MissingParent,
    /// Variation blocks are not promotable; nothing changed.
    Unsupported,
    NotFound,
}

/// Applies the hierarchy transform to block `id`.
///
/// `default_label` is used for the variation header when the block has no
/// emphasized run, and as the parent label when a subblock's parent has
/// been deleted.
pub fn promote(store: &mut BlockStore, id: &BlockId, default_label: &str) -> PromoteOutcome {
    let Some(block) = store.find(id) else {
        debug!("event=promote module=hierarchy status=skip reason=not_found id={id}");
        return PromoteOutcome::NotFound;
    };

    let extracted = extract_emphasis(&block.content);
    match block.kind {
        BlockType::Text => promote_text(store, id, extracted, default_label),
        BlockType::Subblock => match block.parent_id.clone() {
            Some(parent_id) => add_sibling(store, id, parent_id, extracted, default_label),
            None => {
                debug!("event=promote module=hierarchy status=skip reason=missing_parent id={id}");
                PromoteOutcome::MissingParent
            }
        },
        BlockType::Variation => {
            debug!("event=promote module=hierarchy status=skip reason=variation id={id}");
            PromoteOutcome::Unsupported
        }
    }
}

fn promote_text(
    store: &mut BlockStore,
    id: &BlockId,
    extracted: String,
    default_label: &str,
) -> PromoteOutcome {
    let label = non_blank_or(extracted, || default_label.to_string());
    let mut variation = Block::new(BlockType::Variation, label);
    variation.details = Some(String::new());
    let variation_id = variation.id.clone();

    store.insert_before(id, variation);
    store.update(id, BlockPatch::demote_under(variation_id.clone()));

    info!("event=promote module=hierarchy status=ok mode=variation id={id} variation_id={variation_id}");
    PromoteOutcome::Promoted {
        variation_id,
        subblock_id: id.clone(),
    }
}

fn add_sibling(
    store: &mut BlockStore,
    id: &BlockId,
    parent_id: BlockId,
    extracted: String,
    default_label: &str,
) -> PromoteOutcome {
    let sibling_count = store
        .blocks()
        .iter()
        .filter(|b| b.kind == BlockType::Subblock && b.parent_id.as_ref() == Some(&parent_id))
        .count();
    let rank = sibling_count + 1;

    let label = non_blank_or(extracted, || {
        let parent_label = store
            .find(&parent_id)
            .map_or(default_label, |parent| parent.content.as_str());
        format!("{parent_label} {rank}")
    });

    let sibling = Block::subblock(parent_id.clone(), label);
    let sibling_id = sibling.id.clone();
    store.insert_after(Some(id), sibling);

    info!(
        "event=promote module=hierarchy status=ok mode=sibling id={id} parent_id={parent_id} rank={rank}"
    );
    PromoteOutcome::SiblingAdded {
        sibling_id,
        parent_id,
        rank,
    }
}

fn non_blank_or(value: String, fallback: impl FnOnce() -> String) -> String {
    if value.trim().is_empty() {
        fallback()
    } else {
        value
    }
}
