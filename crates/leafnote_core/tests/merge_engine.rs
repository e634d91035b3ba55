use leafnote_core::{
    merge_import, parse_import, Folder, ImportError, Node, Note, PersistedState, TreeStore,
};

fn note_with(id: &str, title: &str) -> Note {
    let mut note = Note::new();
    note.id = id.to_string();
    note.title = title.to_string();
    note
}

fn folder_with(id: &str, name: &str, children: Vec<Node>) -> Folder {
    let mut folder = Folder::new(name);
    folder.id = id.to_string();
    folder.children = children;
    folder
}

fn payload_with_root(root: Folder) -> PersistedState {
    PersistedState {
        root,
        selected_folder_id: None,
        selected_note_id: None,
    }
}

#[test]
fn merge_of_disjoint_trees_is_loss_less() {
    let mut store = TreeStore::new();
    let root_id = store.root_id().clone();
    store.create_folder(&root_id, "Existing").unwrap();

    let imported_root = folder_with(
        "imp-root",
        "Root",
        vec![
            Node::Folder(folder_with(
                "imp-a",
                "Imported",
                vec![Node::Note(note_with("imp-a-1", "Inside"))],
            )),
            Node::Note(note_with("imp-n", "Loose")),
        ],
    );
    let payload = payload_with_root(imported_root);

    let before = store.len();
    let added = merge_import(&mut store, &payload);

    assert_eq!(added, 3);
    assert_eq!(store.len(), before + added);
    assert_eq!(store.ids().len(), store.len());
    assert!(store.find_note("imp-n").is_some());
    assert!(store.find_folder("imp-a").is_some());
}

#[test]
fn colliding_ids_are_reassigned_not_dropped() {
    let mut store = TreeStore::new();
    let root_id = store.root_id().clone();
    let live_note = store.create_note(&root_id).unwrap();
    store.rename_note(&live_note, "Original").unwrap();

    // The imported note reuses the live note's id.
    let payload = payload_with_root(folder_with(
        "imp-root",
        "Root",
        vec![Node::Note(note_with(&live_note, "Imported twin"))],
    ));

    let before = store.note_count();
    merge_import(&mut store, &payload);

    assert_eq!(store.note_count(), before + 1);
    assert_eq!(store.ids().len(), store.len());
    assert_eq!(store.find_note(&live_note).unwrap().title, "Original");
}

#[test]
fn duplicate_ids_across_imported_branches_resolve_independently() {
    let mut store = TreeStore::new();

    // Two separate imported branches both carry the id `dup`.
    let payload = payload_with_root(folder_with(
        "imp-root",
        "Root",
        vec![
            Node::Folder(folder_with(
                "branch-1",
                "One",
                vec![Node::Note(note_with("dup", "First"))],
            )),
            Node::Folder(folder_with(
                "branch-2",
                "Two",
                vec![Node::Note(note_with("dup", "Second"))],
            )),
        ],
    ));

    merge_import(&mut store, &payload);

    assert_eq!(store.ids().len(), store.len());
    assert_eq!(store.note_count(), 2);
}

#[test]
fn sibling_folder_names_get_numbered_suffixes() {
    let mut store = TreeStore::new();
    let root_id = store.root_id().clone();
    store.create_folder(&root_id, "Work").unwrap();

    let payload = payload_with_root(folder_with(
        "imp-root",
        "Root",
        vec![
            Node::Folder(folder_with("w1", "Work", Vec::new())),
            Node::Folder(folder_with("w2", "Work", Vec::new())),
        ],
    ));
    merge_import(&mut store, &payload);

    let names: Vec<&str> = store
        .root()
        .children
        .iter()
        .filter_map(|child| child.as_folder().map(|folder| folder.name.as_str()))
        .collect();
    assert_eq!(names, vec!["Work", "Work (1)", "Work (2)"]);
}

#[test]
fn note_titles_dedupe_only_against_sibling_notes() {
    let mut store = TreeStore::new();
    let root_id = store.root_id().clone();
    // A folder named "Plan" must not force a suffix on a note titled "Plan".
    store.create_folder(&root_id, "Plan").unwrap();
    let note_id = store.create_note(&root_id).unwrap();
    store.rename_note(&note_id, "Plan").unwrap();

    let payload = payload_with_root(folder_with(
        "imp-root",
        "Root",
        vec![
            Node::Note(note_with("p1", "Plan")),
            Node::Folder(folder_with("p2", "Plan", Vec::new())),
        ],
    ));
    merge_import(&mut store, &payload);

    let titles: Vec<&str> = store
        .root()
        .children
        .iter()
        .filter_map(|child| child.as_note().map(|note| note.title.as_str()))
        .collect();
    assert_eq!(titles, vec!["Plan", "Plan (1)"]);

    let folder_names: Vec<&str> = store
        .root()
        .children
        .iter()
        .filter_map(|child| child.as_folder().map(|folder| folder.name.as_str()))
        .collect();
    assert_eq!(folder_names, vec!["Plan", "Plan (1)"]);
}

#[test]
fn imported_folders_become_new_siblings_never_unified() {
    let mut store = TreeStore::new();
    let root_id = store.root_id().clone();
    let work = store.create_folder(&root_id, "Work").unwrap();

    let payload = payload_with_root(folder_with(
        "imp-root",
        "Root",
        vec![Node::Folder(folder_with(
            "imp-work",
            "Work",
            vec![Node::Note(note_with("imp-note", "Imported"))],
        ))],
    ));
    merge_import(&mut store, &payload);

    // The live "Work" folder is untouched; the import landed next to it.
    assert!(store.find_folder(&work).unwrap().children.is_empty());
    let imported = store.find_folder("imp-work").unwrap();
    assert_eq!(imported.name, "Work (1)");
    assert_eq!(imported.children.len(), 1);
}

#[test]
fn parse_import_rejects_payload_without_root() {
    let err = parse_import(r#"{"selectedFolderId": null}"#).unwrap_err();
    assert!(matches!(err, ImportError::Malformed(_)));
}

#[test]
fn parse_import_rejects_root_without_children_container() {
    let raw = r#"{"root": {"id": "r", "name": "Root", "type": "folder"}}"#;
    let err = parse_import(raw).unwrap_err();
    assert!(matches!(err, ImportError::Malformed(_)));
}

#[test]
fn parse_import_rejects_invalid_json() {
    assert!(parse_import("not json at all").is_err());
}

#[test]
fn parse_import_accepts_minimal_wire_shape() {
    let raw = r#"{
        "root": {
            "id": "r",
            "name": "Root",
            "type": "folder",
            "expanded": false,
            "children": [
                {
                    "id": "n",
                    "title": "Hello",
                    "content": "<p>hi</p>",
                    "type": "note",
                    "createdAt": "2024-01-05T10:00:00.000Z",
                    "lastEdited": "2024-01-06T10:00:00.000Z"
                }
            ]
        }
    }"#;
    let payload = parse_import(raw).unwrap();
    assert_eq!(payload.root.children.len(), 1);
    let note = payload.root.children[0].as_note().unwrap();
    assert_eq!(note.title, "Hello");
    assert!(note.last_edited >= note.created_at);
}

#[test]
fn importing_an_export_of_the_same_tree_duplicates_it_collision_free() {
    let mut store = TreeStore::new();
    let root_id = store.root_id().clone();
    let work = store.create_folder(&root_id, "Work").unwrap();
    let note_id = store.create_note(&work).unwrap();
    store.rename_note(&note_id, "Plan").unwrap();

    let payload = payload_with_root(store.root().clone());
    let before = store.len();
    let added = merge_import(&mut store, &payload);

    // Every id collided, so the whole subtree was re-identified.
    assert_eq!(added, before - 1);
    assert_eq!(store.len(), before + added);
    assert_eq!(store.ids().len(), store.len());

    let twin = store
        .root()
        .children
        .iter()
        .filter_map(Node::as_folder)
        .find(|folder| folder.name == "Work (1)")
        .expect("imported twin folder");
    // The nested note keeps its title: uniqueness is per sibling list.
    assert_eq!(twin.children[0].as_note().unwrap().title, "Plan");
    assert_ne!(twin.id, work);
}
