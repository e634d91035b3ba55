//! Case-insensitive containment search over the workspace tree.
//!
//! # Responsibility
//! - Decide which nodes a search term keeps visible.
//! - Produce a pruned display copy of the tree for the sidebar.
//! - Derive plain-text snippets from opaque rich-text note content.
//!
//! # Invariants
//! - Search never mutates the live tree; pruning works on copies.
//! - A blank term (after trim) matches everything.
//! - A folder is visible when its name matches or any descendant matches,
//!   so every ancestor of a match survives filtering.

use crate::model::node::{Folder, Node, NodeId, Note};
use crate::store::tree_store::TreeStore;
use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&[a-zA-Z#0-9]+;").expect("valid entity regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const SNIPPET_MAX_CHARS: usize = 100;

/// Case-insensitive substring matcher over tree nodes.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    term: String,
}

impl SearchFilter {
    /// Builds a filter from raw user input; the term is trimmed and
    /// lowercased once up front.
    pub fn new(term: impl AsRef<str>) -> Self {
        Self {
            term: term.as_ref().trim().to_lowercase(),
        }
    }

    /// Returns whether this filter matches everything.
    pub fn is_blank(&self) -> bool {
        self.term.is_empty()
    }

    /// Returns whether `node` should stay visible under this filter.
    pub fn matches(&self, node: &Node) -> bool {
        match node {
            Node::Folder(folder) => self.matches_folder(folder),
            Node::Note(note) => self.matches_note(note),
        }
    }

    /// A folder matches on its own name or through any descendant.
    pub fn matches_folder(&self, folder: &Folder) -> bool {
        if self.is_blank() || contains_term(&folder.name, &self.term) {
            return true;
        }
        folder.children.iter().any(|child| self.matches(child))
    }

    /// A note matches on title or content.
    pub fn matches_note(&self, note: &Note) -> bool {
        self.is_blank()
            || contains_term(&note.title, &self.term)
            || contains_term(&note.content, &self.term)
    }

    /// Produces a filtered copy of `folder` for display.
    ///
    /// A folder whose own name matches keeps its whole subtree; otherwise
    /// only matching children survive. Returns `None` when nothing under
    /// `folder` (itself included) matches.
    pub fn prune(&self, folder: &Folder) -> Option<Folder> {
        if self.is_blank() || contains_term(&folder.name, &self.term) {
            return Some(folder.clone());
        }
        let children: Vec<Node> = folder
            .children
            .iter()
            .filter_map(|child| match child {
                Node::Note(note) => self.matches_note(note).then(|| child.clone()),
                Node::Folder(inner) => self.prune(inner).map(Node::Folder),
            })
            .collect();
        if children.is_empty() {
            return None;
        }
        Some(Folder {
            id: folder.id.clone(),
            name: folder.name.clone(),
            expanded: folder.expanded,
            children,
        })
    }
}

/// Filters the whole tree for display. The root shell always survives,
/// with no children when nothing matched.
pub fn filter_tree(store: &TreeStore, term: impl AsRef<str>) -> Folder {
    let filter = SearchFilter::new(term);
    filter.prune(store.root()).unwrap_or_else(|| Folder {
        id: store.root().id.clone(),
        name: store.root().name.clone(),
        expanded: store.root().expanded,
        children: Vec::new(),
    })
}

/// Single note hit returned by [`search_notes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Matched note id.
    pub note_id: NodeId,
    /// Note title at match time.
    pub title: String,
    /// Markup-stripped content excerpt.
    pub snippet: String,
    /// Folder directly containing the note.
    pub folder_id: NodeId,
}

/// Flat list of matching notes with plain-text snippets, in tree order.
///
/// Returns an empty list for blank terms, mirroring the display filter's
/// "blank shows everything" rule: a hit list for everything is noise.
pub fn search_notes(store: &TreeStore, term: impl AsRef<str>) -> Vec<SearchHit> {
    let filter = SearchFilter::new(term);
    if filter.is_blank() {
        return Vec::new();
    }
    let mut hits = Vec::new();
    collect_hits(store.root(), &filter, &mut hits);
    hits
}

fn collect_hits(folder: &Folder, filter: &SearchFilter, hits: &mut Vec<SearchHit>) {
    for child in &folder.children {
        match child {
            Node::Note(note) => {
                if filter.matches_note(note) {
                    hits.push(SearchHit {
                        note_id: note.id.clone(),
                        title: note.title.clone(),
                        snippet: snippet_from_markup(&note.content),
                        folder_id: folder.id.clone(),
                    });
                }
            }
            Node::Folder(inner) => collect_hits(inner, filter, hits),
        }
    }
}

/// Derives a plain-text excerpt from an opaque rich-text blob.
///
/// Rules: tags and entities removed, whitespace collapsed, first
/// `SNIPPET_MAX_CHARS` characters retained.
pub fn snippet_from_markup(content: &str) -> String {
    let without_tags = MARKUP_TAG_RE.replace_all(content, " ");
    let without_entities = ENTITY_RE.replace_all(&without_tags, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_entities, " ");
    normalized.trim().chars().take(SNIPPET_MAX_CHARS).collect()
}

fn contains_term(haystack: &str, lowered_term: &str) -> bool {
    haystack.to_lowercase().contains(lowered_term)
}
