//! Import merge entry points.
//!
//! # Responsibility
//! - Combine an externally supplied tree into the live tree without id or
//!   name collisions and without data loss.
//! - Reject malformed import payloads before any mutation happens.

pub mod engine;
