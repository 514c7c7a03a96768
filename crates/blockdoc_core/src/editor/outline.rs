//! Heading outline extracted from the block sequence.

use crate::editor::markup::{heading_level, plain_text};
use crate::model::block::{Block, BlockId};

/// One navigable heading in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub block_id: BlockId,
    /// 1 for `h1`, 2 for `h2`.
    pub level: u8,
    pub text: String,
}

/// Collects blocks whose content starts with an `h1`/`h2` element.
pub fn extract_outline(blocks: &[Block]) -> Vec<OutlineEntry> {
    blocks
        .iter()
        .filter_map(|block| {
            heading_level(&block.content).map(|level| OutlineEntry {
                block_id: block.id.clone(),
                level,
                text: plain_text(&block.content),
            })
        })
        .collect()
}
