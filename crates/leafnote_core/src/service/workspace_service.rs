//! Workspace use-case facade.
//!
//! # Responsibility
//! - Route every presentation-layer command through one object owning the
//!   tree, the blob store, and the autosave debouncer.
//! - Persist structural mutations immediately and coalesce note edits.
//!
//! # Invariants
//! - A pending debounced edit is flushed before selection moves away from
//!   the edited note and before any delete or import mutates the tree.
//! - The persisted blob always reflects a tree that satisfied the store
//!   invariants at save time.

use crate::merge::engine::{merge_import, parse_import, ImportError};
use crate::model::node::{Folder, NodeId};
use crate::persist::state::{encode_state, load_state, save_state, StateBlobStore};
use crate::search::filter::{filter_tree, search_notes, SearchHit};
use crate::service::autosave::{SaveDebouncer, DEFAULT_SAVE_WINDOW};
use crate::store::tree_store::{StoreError, TreeStore};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Errors surfaced by workspace use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Tree store validation failure; shown to the user as feedback.
    Store(StoreError),
    /// Import payload rejected before any mutation.
    Import(ImportError),
    /// Export serialization failure.
    Export(serde_json::Error),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "export failed: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ImportError> for ServiceError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

/// Facade wiring the tree store, blob persistence, and autosave.
pub struct WorkspaceService<B: StateBlobStore> {
    store: TreeStore,
    blob_store: B,
    debouncer: SaveDebouncer,
}

impl<B: StateBlobStore> WorkspaceService<B> {
    /// Opens the workspace from `blob_store` with the default autosave
    /// window, reinitializing when no valid prior state exists.
    pub fn open(blob_store: B) -> Self {
        Self::open_with_window(blob_store, DEFAULT_SAVE_WINDOW)
    }

    /// Opens the workspace with an explicit autosave window.
    pub fn open_with_window(blob_store: B, window: Duration) -> Self {
        let store = load_state(&blob_store);
        Self {
            store,
            blob_store,
            debouncer: SaveDebouncer::new(window),
        }
    }

    /// Read access to the live tree and selection.
    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    /// Creates a folder and persists immediately.
    pub fn create_folder(
        &mut self,
        parent_id: &str,
        name: impl Into<String>,
    ) -> Result<NodeId, ServiceError> {
        let id = self.store.create_folder(parent_id, name)?;
        self.persist_now();
        Ok(id)
    }

    /// Creates a note, which moves selection onto it, and persists.
    ///
    /// Any pending edit of the previously selected note is flushed first.
    pub fn create_note(&mut self, parent_id: &str) -> Result<NodeId, ServiceError> {
        self.flush_pending();
        let id = self.store.create_note(parent_id)?;
        self.persist_now();
        Ok(id)
    }

    /// Renames a folder and persists immediately.
    pub fn rename_folder(
        &mut self,
        id: &str,
        name: impl Into<String>,
    ) -> Result<(), ServiceError> {
        self.store.rename_folder(id, name)?;
        self.persist_now();
        Ok(())
    }

    /// Renames a note; the save is debounced with other note edits.
    pub fn rename_note(&mut self, id: &str, title: impl Into<String>) -> Result<(), ServiceError> {
        self.store.rename_note(id, title)?;
        self.debouncer.schedule(Instant::now());
        Ok(())
    }

    /// Replaces note content; the save is debounced.
    pub fn edit_note_content(
        &mut self,
        id: &str,
        content: impl Into<String>,
    ) -> Result<(), ServiceError> {
        self.store.edit_note_content(id, content)?;
        self.debouncer.schedule(Instant::now());
        Ok(())
    }

    /// Deletes a note. The last pending edit is flushed before the
    /// destructive step, then the post-delete tree is persisted.
    pub fn delete_note(&mut self, id: &str) {
        self.flush_pending();
        self.store.delete_note(id);
        self.persist_now();
    }

    /// Deletes a folder subtree, flushing pending edits first.
    pub fn delete_folder(&mut self, id: &str) -> Result<(), ServiceError> {
        self.flush_pending();
        self.store.delete_folder(id)?;
        self.persist_now();
        Ok(())
    }

    /// Moves a note to another folder and persists immediately.
    pub fn move_note(&mut self, note_id: &str, target_folder_id: &str) -> Result<(), ServiceError> {
        self.store.move_note(note_id, target_folder_id)?;
        self.persist_now();
        Ok(())
    }

    /// Selects a folder, flushing any pending note edit on the way out.
    pub fn select_folder(&mut self, id: &str) -> Result<(), ServiceError> {
        self.store.select_folder(id)?;
        self.persist_now();
        Ok(())
    }

    /// Selects a note (and its containing folder), flushing pending edits.
    pub fn select_note(&mut self, id: &str) -> Result<(), ServiceError> {
        self.store.select_note(id)?;
        self.persist_now();
        Ok(())
    }

    /// Toggles a folder's sidebar expansion flag and persists.
    pub fn set_folder_expanded(&mut self, id: &str, expanded: bool) -> Result<(), ServiceError> {
        self.store.set_folder_expanded(id, expanded)?;
        self.persist_now();
        Ok(())
    }

    /// Filtered copy of the tree for sidebar display.
    pub fn filter(&self, term: &str) -> Folder {
        filter_tree(&self.store, term)
    }

    /// Flat note hits with plain-text snippets.
    pub fn search(&self, term: &str) -> Vec<SearchHit> {
        search_notes(&self.store, term)
    }

    /// Serializes the full persisted-state shape for download.
    pub fn export(&self) -> Result<String, ServiceError> {
        encode_state(&self.store).map_err(ServiceError::Export)
    }

    /// Imports a raw payload: reject-before-mutate, merge, persist.
    ///
    /// Returns the number of nodes added to the tree.
    pub fn import(&mut self, raw: &str) -> Result<usize, ServiceError> {
        let payload = parse_import(raw)?;
        self.flush_pending();
        let added = merge_import(&mut self.store, &payload);
        self.persist_now();
        info!("event=import module=service status=ok nodes_added={added}");
        Ok(added)
    }

    /// Drives the autosave window; call from the host's idle loop.
    ///
    /// Returns whether a coalesced save was performed at `now`.
    pub fn poll_autosave(&mut self, now: Instant) -> bool {
        if self.debouncer.take_due(now) {
            save_state(&self.store, &self.blob_store);
            debug!("event=autosave module=service status=ok");
            return true;
        }
        false
    }

    /// Saves now if a debounced edit is outstanding.
    pub fn flush_pending(&mut self) -> bool {
        if self.debouncer.flush() {
            save_state(&self.store, &self.blob_store);
            return true;
        }
        false
    }

    fn persist_now(&mut self) {
        // An unconditional save supersedes any armed deadline.
        self.debouncer.flush();
        save_state(&self.store, &self.blob_store);
    }
}
