//! In-memory tree store.
//!
//! # Responsibility
//! - Own the live folder/note hierarchy and the selection pointers.
//! - Expose mutation primitives that keep model invariants intact.
//!
//! # Invariants
//! - Every operation runs to completion on one exclusively-owned tree.
//! - No operation leaves selection pointing at a node absent from the tree.

pub mod tree_store;
