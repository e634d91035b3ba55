//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, merge, and persistence calls into use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod autosave;
pub mod workspace_service;
