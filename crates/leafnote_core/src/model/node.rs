//! Tree node domain model.
//!
//! # Responsibility
//! - Define the `Folder`/`Note` tagged union composing the workspace tree.
//! - Provide constructors and subtree traversal helpers.
//!
//! # Invariants
//! - `id` is stable and never reused while the owning tree is loaded.
//! - `Note::last_edited` is never earlier than `Note::created_at`.
//! - Child order is insertion order and doubles as display order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Stable identifier for every tree node.
///
/// Kept as an opaque string: imported trees carry externally generated ids
/// in arbitrary formats, and both variants share one identifier namespace.
pub type NodeId = String;

/// Title given to freshly created notes.
pub const UNTITLED_NOTE: &str = "Untitled Note";

/// Generates a fresh collision-resistant node id.
pub fn fresh_node_id() -> NodeId {
    Uuid::new_v4().to_string()
}

/// One node of the workspace tree.
///
/// Serialized with an internal `type` tag so the wire shape matches the
/// persisted-state layout (`"type": "folder" | "note"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// Grouping node owning an ordered child sequence.
    Folder(Folder),
    /// Leaf node carrying an opaque rich-text content blob.
    Note(Note),
}

impl Node {
    /// Returns the node id regardless of variant.
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Folder(folder) => &folder.id,
            Self::Note(note) => &note.id,
        }
    }

    /// Returns the user-facing label (folder name or note title).
    pub fn display_name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::Note(note) => &note.title,
        }
    }

    /// Returns the folder payload when this node is a folder.
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Note(_) => None,
        }
    }

    /// Returns the note payload when this node is a note.
    pub fn as_note(&self) -> Option<&Note> {
        match self {
            Self::Folder(_) => None,
            Self::Note(note) => Some(note),
        }
    }

    /// Counts this node plus every descendant.
    pub fn subtree_len(&self) -> usize {
        match self {
            Self::Note(_) => 1,
            Self::Folder(folder) => {
                1 + folder
                    .children
                    .iter()
                    .map(Node::subtree_len)
                    .sum::<usize>()
            }
        }
    }

    /// Collects every id in this subtree into `ids`.
    pub fn collect_ids(&self, ids: &mut HashSet<NodeId>) {
        ids.insert(self.id().clone());
        if let Self::Folder(folder) = self {
            for child in &folder.children {
                child.collect_ids(ids);
            }
        }
    }
}

/// Grouping node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Stable node id, shared namespace with notes.
    pub id: NodeId,
    /// Display name, non-empty after trim on every write path.
    pub name: String,
    /// Sidebar expansion flag. UI-only, but part of the persisted shape.
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    /// Ordered children; insertion order is display order.
    ///
    /// Deliberately not defaulted: an imported folder without a children
    /// container is malformed and must be rejected, not repaired.
    pub children: Vec<Node>,
}

impl Folder {
    /// Creates an empty folder with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: fresh_node_id(),
            name: name.into(),
            expanded: true,
            children: Vec::new(),
        }
    }

    /// Counts this folder plus every descendant node.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Collects every id in this subtree, the folder's own included.
    pub fn collect_ids(&self, ids: &mut HashSet<NodeId>) {
        ids.insert(self.id.clone());
        for child in &self.children {
            child.collect_ids(ids);
        }
    }

    /// Returns whether `id` names this folder or any descendant node.
    pub fn contains_id(&self, id: &str) -> bool {
        if self.id == id {
            return true;
        }
        self.children.iter().any(|child| match child {
            Node::Folder(folder) => folder.contains_id(id),
            Node::Note(note) => note.id == id,
        })
    }
}

fn default_expanded() -> bool {
    true
}

/// Leaf node of the tree.
///
/// `content` is an opaque rich-text markup blob supplied by the editing
/// surface; the core never parses or validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NodeId,
    pub title: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "lastEdited")]
    pub last_edited: DateTime<Utc>,
}

impl Note {
    /// Creates an untitled empty note with both timestamps set to now.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: fresh_node_id(),
            title: UNTITLED_NOTE.to_string(),
            content: String::new(),
            created_at: now,
            last_edited: now,
        }
    }

    /// Bumps `last_edited` to the current time.
    pub fn touch(&mut self) {
        self.last_edited = Utc::now();
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}
