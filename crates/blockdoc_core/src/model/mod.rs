//! Domain model for block documents and completion styles.
//!
//! # Responsibility
//! - Define canonical data structures shared by the editor engine and the
//!   persistence collaborators.
//!
//! # Invariants
//! - Every block is identified by a stable `BlockId`.
//! - A document's block sequence is ordered; order is display order and
//!   hierarchy adjacency.

pub mod block;
pub mod document;
pub mod style;
