//! Tree store: hierarchy plus selection state.
//!
//! # Responsibility
//! - Provide find/create/rename/delete/move/edit/select primitives.
//! - Keep selection valid across every mutation, deletes included.
//!
//! # Invariants
//! - Exactly one root folder; the root is never deleted or moved.
//! - Node ids are unique across the tree; folders and notes share one
//!   identifier namespace.
//! - Folder deletion is recursive and atomic: the subtree is detached in
//!   one step, then selection is repaired.

use crate::model::node::{Folder, Node, NodeId, Note};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by tree store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Validation failures raised by tree store operations.
///
/// None of these are fatal: callers surface them as user feedback and the
/// tree is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Name or title is blank after trimming.
    BlankName,
    /// Target id does not resolve to a folder in this tree.
    FolderNotFound(NodeId),
    /// Target id does not resolve to a note in this tree.
    NoteNotFound(NodeId),
    /// The root folder cannot be deleted.
    RootDeletion,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must not be blank"),
            Self::FolderNotFound(id) => write!(f, "folder not found: {id}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::RootDeletion => write!(f, "the root folder cannot be deleted"),
        }
    }
}

impl Error for StoreError {}

/// The live workspace tree plus the two selection pointers.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStore {
    root: Folder,
    selected_folder_id: Option<NodeId>,
    selected_note_id: Option<NodeId>,
}

impl TreeStore {
    /// Creates a fresh store with a single empty root folder selected.
    pub fn new() -> Self {
        Self::with_root(Folder::new("Root"))
    }

    /// Creates a store around an existing root, selecting the root.
    pub fn with_root(root: Folder) -> Self {
        let root_id = root.id.clone();
        Self {
            root,
            selected_folder_id: Some(root_id),
            selected_note_id: None,
        }
    }

    /// Rebuilds a store from persisted parts, repairing stale selection.
    ///
    /// Selection ids that no longer resolve (a hand-edited or partially
    /// imported blob) fall back to the root folder with no note selected.
    pub fn from_parts(
        root: Folder,
        selected_folder_id: Option<NodeId>,
        selected_note_id: Option<NodeId>,
    ) -> Self {
        let mut store = Self {
            root,
            selected_folder_id,
            selected_note_id,
        };
        store.repair_selection();
        store
    }

    /// Read access to the root folder.
    pub fn root(&self) -> &Folder {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Folder {
        &mut self.root
    }

    /// Id of the singleton root folder.
    pub fn root_id(&self) -> &NodeId {
        &self.root.id
    }

    /// Currently selected folder id, if any.
    pub fn selected_folder_id(&self) -> Option<&NodeId> {
        self.selected_folder_id.as_ref()
    }

    /// Currently selected note id, if any.
    pub fn selected_note_id(&self) -> Option<&NodeId> {
        self.selected_note_id.as_ref()
    }

    /// Currently selected note, if the selection points at one.
    pub fn selected_note(&self) -> Option<&Note> {
        self.selected_note_id
            .as_deref()
            .and_then(|id| self.find_note(id))
    }

    /// Total node count, root included.
    pub fn len(&self) -> usize {
        self.root.subtree_len()
    }

    /// Returns whether the tree holds only the bare root.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Number of notes anywhere in the tree.
    pub fn note_count(&self) -> usize {
        count_notes(&self.root)
    }

    /// Every id currently used anywhere in the tree.
    pub fn ids(&self) -> HashSet<NodeId> {
        let mut ids = HashSet::new();
        self.root.collect_ids(&mut ids);
        ids
    }

    /// Depth-first note lookup. Not finding the note is a normal outcome.
    pub fn find_note(&self, id: &str) -> Option<&Note> {
        find_note_in(&self.root, id)
    }

    /// Depth-first folder lookup; the root matches trivially.
    pub fn find_folder(&self, id: &str) -> Option<&Folder> {
        find_folder_in(&self.root, id)
    }

    /// Appends a new folder under `parent_id`.
    pub fn create_folder(
        &mut self,
        parent_id: &str,
        name: impl Into<String>,
    ) -> StoreResult<NodeId> {
        let name = normalize_name(name.into())?;
        let parent = find_folder_in_mut(&mut self.root, parent_id)
            .ok_or_else(|| StoreError::FolderNotFound(parent_id.to_string()))?;
        let folder = Folder::new(name);
        let id = folder.id.clone();
        parent.children.push(Node::Folder(folder));
        Ok(id)
    }

    /// Appends a fresh untitled note under `parent_id` and selects it.
    pub fn create_note(&mut self, parent_id: &str) -> StoreResult<NodeId> {
        let parent = find_folder_in_mut(&mut self.root, parent_id)
            .ok_or_else(|| StoreError::FolderNotFound(parent_id.to_string()))?;
        let note = Note::new();
        let id = note.id.clone();
        parent.children.push(Node::Note(note));
        self.selected_folder_id = Some(parent_id.to_string());
        self.selected_note_id = Some(id.clone());
        Ok(id)
    }

    /// Renames a folder. Blank names and unresolved ids are rejected.
    pub fn rename_folder(&mut self, id: &str, name: impl Into<String>) -> StoreResult<()> {
        let name = normalize_name(name.into())?;
        let folder = find_folder_in_mut(&mut self.root, id)
            .ok_or_else(|| StoreError::FolderNotFound(id.to_string()))?;
        folder.name = name;
        Ok(())
    }

    /// Renames a note and bumps its `last_edited` timestamp.
    pub fn rename_note(&mut self, id: &str, title: impl Into<String>) -> StoreResult<()> {
        let title = normalize_name(title.into())?;
        let note = find_note_in_mut(&mut self.root, id)
            .ok_or_else(|| StoreError::NoteNotFound(id.to_string()))?;
        note.title = title;
        note.touch();
        Ok(())
    }

    /// Replaces a note's content verbatim and bumps `last_edited`.
    ///
    /// Content is opaque markup: no transformation, no validation.
    pub fn edit_note_content(&mut self, id: &str, content: impl Into<String>) -> StoreResult<()> {
        let note = find_note_in_mut(&mut self.root, id)
            .ok_or_else(|| StoreError::NoteNotFound(id.to_string()))?;
        note.content = content.into();
        note.touch();
        Ok(())
    }

    /// Removes a note from its parent. Idempotent when already absent.
    pub fn delete_note(&mut self, id: &str) {
        detach_note(&mut self.root, id);
        if self.selected_note_id.as_deref() == Some(id) {
            self.selected_note_id = None;
        }
    }

    /// Removes a folder and its entire subtree in one step.
    ///
    /// Refuses the root. Selection falls back to (root, none) when the
    /// selected folder or note lived inside the deleted subtree.
    pub fn delete_folder(&mut self, id: &str) -> StoreResult<()> {
        if id == self.root.id {
            return Err(StoreError::RootDeletion);
        }
        let removed = detach_folder(&mut self.root, id)
            .ok_or_else(|| StoreError::FolderNotFound(id.to_string()))?;

        let selection_lost = self
            .selected_folder_id
            .as_deref()
            .is_some_and(|selected| removed.contains_id(selected))
            || self
                .selected_note_id
                .as_deref()
                .is_some_and(|selected| removed.contains_id(selected));
        if selection_lost {
            self.selected_folder_id = Some(self.root.id.clone());
            self.selected_note_id = None;
        }
        Ok(())
    }

    /// Detaches a note from its current parent and appends it to `target_folder_id`.
    ///
    /// The tree is untouched unless both ids resolve and `note_id` is in
    /// fact a note.
    pub fn move_note(&mut self, note_id: &str, target_folder_id: &str) -> StoreResult<()> {
        if find_folder_in(&self.root, target_folder_id).is_none() {
            return Err(StoreError::FolderNotFound(target_folder_id.to_string()));
        }
        let note = detach_note(&mut self.root, note_id)
            .ok_or_else(|| StoreError::NoteNotFound(note_id.to_string()))?;
        // Target existence was checked above on the intact tree, and
        // detaching a leaf cannot remove a folder.
        if let Some(target) = find_folder_in_mut(&mut self.root, target_folder_id) {
            target.children.push(Node::Note(note));
        }
        Ok(())
    }

    /// Selects a folder, clearing any note selection.
    pub fn select_folder(&mut self, id: &str) -> StoreResult<()> {
        if find_folder_in(&self.root, id).is_none() {
            return Err(StoreError::FolderNotFound(id.to_string()));
        }
        self.selected_folder_id = Some(id.to_string());
        self.selected_note_id = None;
        Ok(())
    }

    /// Selects a note, which also selects its containing folder.
    pub fn select_note(&mut self, id: &str) -> StoreResult<()> {
        let parent_id = parent_folder_of_note(&self.root, id)
            .ok_or_else(|| StoreError::NoteNotFound(id.to_string()))?;
        self.selected_folder_id = Some(parent_id);
        self.selected_note_id = Some(id.to_string());
        Ok(())
    }

    /// Sets the sidebar expansion flag on a folder.
    pub fn set_folder_expanded(&mut self, id: &str, expanded: bool) -> StoreResult<()> {
        let folder = find_folder_in_mut(&mut self.root, id)
            .ok_or_else(|| StoreError::FolderNotFound(id.to_string()))?;
        folder.expanded = expanded;
        Ok(())
    }

    fn repair_selection(&mut self) {
        let folder_ok = self
            .selected_folder_id
            .as_deref()
            .is_none_or(|id| find_folder_in(&self.root, id).is_some());
        let note_ok = self
            .selected_note_id
            .as_deref()
            .is_none_or(|id| find_note_in(&self.root, id).is_some());
        if !folder_ok || !note_ok {
            self.selected_folder_id = Some(self.root.id.clone());
            self.selected_note_id = None;
        }
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_name(value: String) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::BlankName);
    }
    Ok(trimmed.to_string())
}

fn count_notes(folder: &Folder) -> usize {
    folder
        .children
        .iter()
        .map(|child| match child {
            Node::Note(_) => 1,
            Node::Folder(inner) => count_notes(inner),
        })
        .sum()
}

fn find_note_in<'a>(folder: &'a Folder, id: &str) -> Option<&'a Note> {
    for child in &folder.children {
        match child {
            Node::Note(note) if note.id == id => return Some(note),
            Node::Folder(inner) => {
                if let Some(found) = find_note_in(inner, id) {
                    return Some(found);
                }
            }
            Node::Note(_) => {}
        }
    }
    None
}

fn find_note_in_mut<'a>(folder: &'a mut Folder, id: &str) -> Option<&'a mut Note> {
    for child in &mut folder.children {
        match child {
            Node::Note(note) if note.id == id => return Some(note),
            Node::Folder(inner) => {
                if let Some(found) = find_note_in_mut(inner, id) {
                    return Some(found);
                }
            }
            Node::Note(_) => {}
        }
    }
    None
}

fn find_folder_in<'a>(folder: &'a Folder, id: &str) -> Option<&'a Folder> {
    if folder.id == id {
        return Some(folder);
    }
    for child in &folder.children {
        if let Node::Folder(inner) = child {
            if let Some(found) = find_folder_in(inner, id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_folder_in_mut<'a>(folder: &'a mut Folder, id: &str) -> Option<&'a mut Folder> {
    if folder.id == id {
        return Some(folder);
    }
    for child in &mut folder.children {
        if let Node::Folder(inner) = child {
            if let Some(found) = find_folder_in_mut(inner, id) {
                return Some(found);
            }
        }
    }
    None
}

fn detach_note(folder: &mut Folder, id: &str) -> Option<Note> {
    let position = folder
        .children
        .iter()
        .position(|child| matches!(child, Node::Note(note) if note.id == id));
    if let Some(index) = position {
        if let Node::Note(note) = folder.children.remove(index) {
            return Some(note);
        }
        return None; // variant checked by position() above
    }
    for child in &mut folder.children {
        if let Node::Folder(inner) = child {
            if let Some(note) = detach_note(inner, id) {
                return Some(note);
            }
        }
    }
    None
}

fn detach_folder(folder: &mut Folder, id: &str) -> Option<Folder> {
    let position = folder
        .children
        .iter()
        .position(|child| matches!(child, Node::Folder(inner) if inner.id == id));
    if let Some(index) = position {
        if let Node::Folder(removed) = folder.children.remove(index) {
            return Some(removed);
        }
        return None; // variant checked by position() above
    }
    for child in &mut folder.children {
        if let Node::Folder(inner) = child {
            if let Some(removed) = detach_folder(inner, id) {
                return Some(removed);
            }
        }
    }
    None
}

fn parent_folder_of_note(folder: &Folder, note_id: &str) -> Option<NodeId> {
    for child in &folder.children {
        match child {
            Node::Note(note) if note.id == note_id => return Some(folder.id.clone()),
            Node::Folder(inner) => {
                if let Some(found) = parent_folder_of_note(inner, note_id) {
                    return Some(found);
                }
            }
            Node::Note(_) => {}
        }
    }
    None
}
