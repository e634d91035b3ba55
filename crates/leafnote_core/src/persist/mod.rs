//! Persisted-state bootstrap and blob storage entry points.
//!
//! # Responsibility
//! - Define the durable key-value blob contract used by the core.
//! - Encode/decode the whole workspace as one persisted-state blob.
//!
//! # Invariants
//! - The core never reads application data except through `load_state`.
//! - An unparseable blob is treated as absence of prior state, never as a
//!   propagated error.

pub mod state;
