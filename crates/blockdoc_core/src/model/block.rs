//! Block domain model.
//!
//! # Responsibility
//! - Define the atomic content unit of a document and its wire shape.
//! - Provide constructors that allocate fresh, collision-free ids.
//!
//! # Invariants
//! - `id` is stable for the lifetime of a block and never reused.
//! - `parent_id` is only meaningful when `kind == BlockType::Subblock`.
//! - `strip_color` is always one of the fixed palette entries.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque block identifier.
///
/// Kept as a string so ids written by older documents (`"1"`, timestamps)
/// still load. Fresh ids are UUID v4 strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Allocates a new unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of a block in the variation hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    /// Plain content block.
    Text,
    /// Content demoted under a variation header.
    Subblock,
    /// Promoted header grouping one or more subblocks.
    Variation,
}

/// Cosmetic strip palette shown next to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StripColor {
    #[serde(rename = "bg-gray-200")]
    Default,
    #[serde(rename = "bg-red-400")]
    Red,
    #[serde(rename = "bg-green-400")]
    Green,
    #[serde(rename = "bg-blue-400")]
    Blue,
    #[serde(rename = "bg-purple-400")]
    Purple,
    #[serde(rename = "bg-yellow-400")]
    Yellow,
}

impl StripColor {
    pub const ALL: [StripColor; 6] = [
        StripColor::Default,
        StripColor::Red,
        StripColor::Green,
        StripColor::Blue,
        StripColor::Purple,
        StripColor::Yellow,
    ];

    /// Palette token persisted for this color.
    pub fn token(self) -> &'static str {
        match self {
            Self::Default => "bg-gray-200",
            Self::Red => "bg-red-400",
            Self::Green => "bg-green-400",
            Self::Blue => "bg-blue-400",
            Self::Purple => "bg-purple-400",
            Self::Yellow => "bg-yellow-400",
        }
    }

    /// Human-facing palette name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Purple => "Purple",
            Self::Yellow => "Yellow",
        }
    }

    /// Parses a palette token; `None` for anything outside the palette.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.token() == token)
    }
}

/// The atomic unit of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    /// Serialized rich-text markup owned by this block.
    pub content: String,
    /// Serialized as `type` to match the persisted record shape.
    #[serde(rename = "type")]
    pub kind: BlockType,
    /// Free-text annotation, independent of `content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_color: Option<StripColor>,
    /// Weak reference to the owning variation; lookup only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<BlockId>,
}

impl Block {
    /// Creates a block of `kind` with a freshly generated id.
    pub fn new(kind: BlockType, content: impl Into<String>) -> Self {
        Self::with_id(BlockId::generate(), kind, content)
    }

    /// Creates a block with a caller-provided id.
    ///
    /// Used by load/import paths where identity already exists.
    pub fn with_id(id: BlockId, kind: BlockType, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            kind,
            details: None,
            strip_color: None,
            parent_id: None,
        }
    }

    /// Fresh empty `text` block used whenever a document would be empty.
    pub fn empty_text() -> Self {
        Self::new(BlockType::Text, "")
    }

    /// Subblock under `parent_id`.
    pub fn subblock(parent_id: BlockId, content: impl Into<String>) -> Self {
        let mut block = Self::new(BlockType::Subblock, content);
        block.parent_id = Some(parent_id);
        block
    }

    /// Returns the annotation or an empty string.
    pub fn details_or_empty(&self) -> &str {
        self.details.as_deref().unwrap_or("")
    }

    /// Whether the block carries any user-authored data.
    pub fn has_user_data(&self) -> bool {
        !self.content.is_empty() || !self.details_or_empty().is_empty()
    }

    /// Merges every field set in `patch` into this block.
    pub fn apply(&mut self, patch: BlockPatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(details) = patch.details {
            self.details = Some(details);
        }
        if let Some(color) = patch.strip_color {
            self.strip_color = Some(color);
        }
        if let Some(parent_id) = patch.parent_id {
            self.parent_id = Some(parent_id);
        }
    }
}

/// Partial update merged into an existing block by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPatch {
    pub content: Option<String>,
    pub kind: Option<BlockType>,
    pub details: Option<String>,
    pub strip_color: Option<StripColor>,
    pub parent_id: Option<BlockId>,
}

impl BlockPatch {
    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn details(value: impl Into<String>) -> Self {
        Self {
            details: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn strip_color(color: StripColor) -> Self {
        Self {
            strip_color: Some(color),
            ..Self::default()
        }
    }

    /// Demotes a block under `parent_id`.
    pub fn demote_under(parent_id: BlockId) -> Self {
        Self {
            kind: Some(BlockType::Subblock),
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.kind.is_none()
            && self.details.is_none()
            && self.strip_color.is_none()
            && self.parent_id.is_none()
    }
}

/// Validation failure for a single loaded block record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValidationError {
    EmptyId,
    /// Only subblocks may reference a parent.
    UnexpectedParent { id: BlockId, kind: BlockType },
}

impl Display for BlockValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "block id must not be empty"),
            Self::UnexpectedParent { id, kind } => {
                write!(f, "block {id} of type {kind:?} must not carry a parentId")
            }
        }
    }
}

impl Error for BlockValidationError {}

impl Block {
    /// Checks record-level invariants for blocks read from storage.
    pub fn validate(&self) -> Result<(), BlockValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(BlockValidationError::EmptyId);
        }
        if self.parent_id.is_some() && self.kind != BlockType::Subblock {
            return Err(BlockValidationError::UnexpectedParent {
                id: self.id.clone(),
                kind: self.kind,
            });
        }
        Ok(())
    }
}
