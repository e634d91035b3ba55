//! Whole-tree persistence as a single JSON blob.
//!
//! # Responsibility
//! - Serialize/deserialize the persisted-state shape (root + selection).
//! - Provide file-backed and in-memory blob stores behind one contract.
//! - Recover from blob corruption by reinitializing a fresh workspace.
//!
//! # Invariants
//! - The blob lives under one fixed storage key; the whole tree is always
//!   written in one piece.
//! - `load_state` never fails: corruption degrades to a fresh singleton
//!   root that is persisted immediately.
//! - Save failures are logged, never raised to callers.

use crate::model::node::{Folder, NodeId};
use crate::store::tree_store::TreeStore;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Fixed storage key the workspace blob is kept under.
pub const STORAGE_KEY: &str = "leafnote_state";

/// Persisted-state layout: the full tree plus the two selection pointers.
///
/// This is also the import/export wire shape. `root` and `root.children`
/// are mandatory; selection pointers default to absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub root: Folder,
    #[serde(rename = "selectedFolderId", default)]
    pub selected_folder_id: Option<NodeId>,
    #[serde(rename = "selectedNoteId", default)]
    pub selected_note_id: Option<NodeId>,
}

impl From<&TreeStore> for PersistedState {
    fn from(store: &TreeStore) -> Self {
        Self {
            root: store.root().clone(),
            selected_folder_id: store.selected_folder_id().cloned(),
            selected_note_id: store.selected_note_id().cloned(),
        }
    }
}

/// Durable key-value blob store for the persisted state.
///
/// Synchronous and infallible from the core's point of view: a store that
/// cannot load returns `None`, a store that cannot save logs and drops the
/// write.
pub trait StateBlobStore {
    /// Loads the blob under the fixed storage key, if present.
    fn load(&self) -> Option<String>;
    /// Replaces the blob under the fixed storage key.
    fn save(&self, blob: &str);
}

impl<B: StateBlobStore + ?Sized> StateBlobStore for &B {
    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn save(&self, blob: &str) {
        (**self).save(blob)
    }
}

/// Blob store backed by one JSON file in a data directory.
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    /// Creates a store writing `<data_dir>/<STORAGE_KEY>.json`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateBlobStore for FileBlobStore {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(
                    "event=blob_load module=persist status=error path={} error={err}",
                    self.path.display()
                );
                None
            }
        }
    }

    fn save(&self, blob: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                error!(
                    "event=blob_save module=persist status=error path={} error={err}",
                    self.path.display()
                );
                return;
            }
        }
        if let Err(err) = std::fs::write(&self.path, blob) {
            error!(
                "event=blob_save module=persist status=error path={} error={err}",
                self.path.display()
            );
        }
    }
}

/// In-memory blob store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blob: RefCell<Option<String>>,
    save_count: Cell<usize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a blob, as if previously saved.
    pub fn seeded(blob: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(blob.into())),
            save_count: Cell::new(0),
        }
    }

    /// Current blob contents, if any save has happened.
    pub fn snapshot(&self) -> Option<String> {
        self.blob.borrow().clone()
    }

    /// Number of saves performed since construction.
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }
}

impl StateBlobStore for MemoryBlobStore {
    fn load(&self) -> Option<String> {
        self.blob.borrow().clone()
    }

    fn save(&self, blob: &str) {
        *self.blob.borrow_mut() = Some(blob.to_string());
        self.save_count.set(self.save_count.get() + 1);
    }
}

/// Serializes the full persisted-state shape for saving or export.
pub fn encode_state(store: &TreeStore) -> serde_json::Result<String> {
    serde_json::to_string(&PersistedState::from(store))
}

/// Persists the whole workspace through `blob_store`.
///
/// Encoding this shape cannot realistically fail; if it ever does the
/// failure is logged and the write is dropped rather than surfaced.
pub fn save_state(store: &TreeStore, blob_store: &dyn StateBlobStore) {
    match encode_state(store) {
        Ok(payload) => blob_store.save(&payload),
        Err(err) => error!("event=state_save module=persist status=error error={err}"),
    }
}

/// Loads the workspace from `blob_store`, reinitializing when absent or
/// corrupt.
///
/// # Side effects
/// - Persists the fresh state immediately after a reset.
/// - Emits `state_load` logging events with duration and status.
pub fn load_state(blob_store: &dyn StateBlobStore) -> TreeStore {
    let started_at = Instant::now();
    info!("event=state_load module=persist status=start key={STORAGE_KEY}");

    let Some(raw) = blob_store.load() else {
        info!(
            "event=state_load module=persist status=ok outcome=fresh duration_ms={}",
            started_at.elapsed().as_millis()
        );
        return reset_state(blob_store);
    };

    match serde_json::from_str::<PersistedState>(&raw) {
        Ok(state) => {
            let store = TreeStore::from_parts(
                state.root,
                state.selected_folder_id,
                state.selected_note_id,
            );
            info!(
                "event=state_load module=persist status=ok outcome=restored nodes={} duration_ms={}",
                store.len(),
                started_at.elapsed().as_millis()
            );
            store
        }
        Err(err) => {
            error!(
                "event=state_load module=persist status=error outcome=reset duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            reset_state(blob_store)
        }
    }
}

fn reset_state(blob_store: &dyn StateBlobStore) -> TreeStore {
    let store = TreeStore::new();
    save_state(&store, blob_store);
    store
}
