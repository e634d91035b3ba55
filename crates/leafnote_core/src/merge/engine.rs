//! Deterministic merge of an imported tree into the live tree.
//!
//! # Responsibility
//! - Deep-copy imported nodes so the two trees never share structure.
//! - Re-identify colliding ids with fresh ones before recursing, so nested
//!   duplicates across separate imported branches resolve independently.
//! - De-duplicate display names per sibling list by appending `" (n)"`.
//!
//! # Invariants
//! - Ids are registered in the live-id set before descending into children.
//! - Folder names are compared only against sibling folders, note titles
//!   only against sibling notes.
//! - An imported folder is always appended as a new sibling; same-named
//!   folders are never unified.
//! - A malformed payload is rejected wholesale; the live tree is untouched.

use crate::model::node::{fresh_node_id, Folder, Node, NodeId};
use crate::persist::state::PersistedState;
use crate::store::tree_store::TreeStore;
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Import failures, surfaced to the user as-is.
#[derive(Debug)]
pub enum ImportError {
    /// Payload is not a well-formed persisted-state tree (missing root,
    /// missing children container, or invalid JSON).
    Malformed(String),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed import payload: {message}"),
        }
    }
}

impl Error for ImportError {}

/// Parses a raw import blob into the persisted-state shape.
///
/// Rejection happens here, before any mutation: there are no partial
/// merges on malformed input.
pub fn parse_import(raw: &str) -> ImportResult<PersistedState> {
    serde_json::from_str(raw).map_err(|err| ImportError::Malformed(err.to_string()))
}

/// Merges a parsed import payload into the live tree at its root.
///
/// Returns the number of nodes added to the tree.
pub fn merge_import(store: &mut TreeStore, payload: &PersistedState) -> usize {
    let mut existing_ids = store.ids();
    let merged = merge_folder(store.root_mut(), &payload.root, &mut existing_ids);
    info!("event=import_merge module=merge status=ok nodes_added={merged}");
    merged
}

/// Merges every child of `imported` into `target`.
///
/// `existing_ids` must be seeded with every id used anywhere in the live
/// tree before the merge begins; it grows as nodes are adopted. Returns
/// the number of nodes appended (descendants included).
pub fn merge_folder(
    target: &mut Folder,
    imported: &Folder,
    existing_ids: &mut HashSet<NodeId>,
) -> usize {
    let mut folder_names = sibling_folder_names(target);
    let mut note_titles = sibling_note_titles(target);

    let mut added = 0;
    for child in &imported.children {
        let mut copy = child.clone();
        adopt_ids(&mut copy, existing_ids);
        match &mut copy {
            Node::Folder(folder) => {
                folder.name = unique_sibling_name(&folder.name, &folder_names);
                folder_names.insert(folder.name.clone());
            }
            Node::Note(note) => {
                note.title = unique_sibling_name(&note.title, &note_titles);
                note_titles.insert(note.title.clone());
            }
        }
        added += copy.subtree_len();
        target.children.push(copy);
    }
    added
}

/// Re-identifies `node` when its id is already taken, then registers the
/// id and recurses. Collision is not a failure: the node is still
/// imported, just under a fresh identity.
fn adopt_ids(node: &mut Node, existing_ids: &mut HashSet<NodeId>) {
    match node {
        Node::Folder(folder) => {
            if existing_ids.contains(&folder.id) {
                folder.id = fresh_node_id();
            }
            existing_ids.insert(folder.id.clone());
            for child in &mut folder.children {
                adopt_ids(child, existing_ids);
            }
        }
        Node::Note(note) => {
            if existing_ids.contains(&note.id) {
                note.id = fresh_node_id();
            }
            existing_ids.insert(note.id.clone());
        }
    }
}

/// Picks `base` when free, otherwise `"base (n)"` with the smallest
/// positive `n` no sibling of the same kind already bears.
fn unique_sibling_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{base} ({n})");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn sibling_folder_names(folder: &Folder) -> HashSet<String> {
    folder
        .children
        .iter()
        .filter_map(|child| child.as_folder().map(|inner| inner.name.clone()))
        .collect()
}

fn sibling_note_titles(folder: &Folder) -> HashSet<String> {
    folder
        .children
        .iter()
        .filter_map(|child| child.as_note().map(|note| note.title.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::unique_sibling_name;
    use std::collections::HashSet;

    #[test]
    fn free_name_is_kept_as_is() {
        let taken = HashSet::from(["Other".to_string()]);
        assert_eq!(unique_sibling_name("Work", &taken), "Work");
    }

    #[test]
    fn suffix_counts_up_past_existing_suffixes() {
        let taken = HashSet::from([
            "Work".to_string(),
            "Work (1)".to_string(),
            "Work (2)".to_string(),
        ]);
        assert_eq!(unique_sibling_name("Work", &taken), "Work (3)");
    }
}
