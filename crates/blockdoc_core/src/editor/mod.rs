//! Block editing engine.
//!
//! # Responsibility
//! - Own the ordered block sequence and its structural operations.
//! - Track selection/detail-panel state and debounced annotation writes.
//!
//! # Invariants
//! - The block sequence is the only shared mutable state; every component
//!   reaches it through `BlockStore` operations.
//! - All operations are synchronous and run to completion; the only
//!   suspension points live in the completion pipeline and persistence.

pub mod details;
pub mod hierarchy;
pub mod markup;
pub mod outline;
pub mod selection;
pub mod store;
