//! Domain model for the folder/note workspace tree.
//!
//! # Responsibility
//! - Define the canonical tree node shapes used by core business logic.
//! - Keep the serialized shape identical to the persisted-state layout.
//!
//! # Invariants
//! - Every node is identified by a stable `NodeId`, unique per tree.
//! - The tree is a strict hierarchy: one root folder, exclusive ownership
//!   of children, no cycles.

pub mod node;
