//! Core domain logic for the leafnote workspace.
//! This crate is the single source of truth for tree and merge invariants.

pub mod logging;
pub mod merge;
pub mod model;
pub mod persist;
pub mod search;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging};
pub use merge::engine::{merge_folder, merge_import, parse_import, ImportError, ImportResult};
pub use model::node::{fresh_node_id, Folder, Node, NodeId, Note, UNTITLED_NOTE};
pub use persist::state::{
    encode_state, load_state, save_state, FileBlobStore, MemoryBlobStore, PersistedState,
    StateBlobStore, STORAGE_KEY,
};
pub use search::filter::{filter_tree, search_notes, snippet_from_markup, SearchFilter, SearchHit};
pub use service::autosave::{SaveDebouncer, DEFAULT_SAVE_WINDOW};
pub use service::workspace_service::{ServiceError, WorkspaceService};
pub use store::tree_store::{StoreError, StoreResult, TreeStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
