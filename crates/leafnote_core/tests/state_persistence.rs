use leafnote_core::{
    encode_state, load_state, save_state, FileBlobStore, MemoryBlobStore, StateBlobStore,
    TreeStore,
};
use serde_json::Value;

#[test]
fn encoded_state_uses_the_persisted_wire_shape() {
    let mut store = TreeStore::new();
    let root_id = store.root_id().clone();
    let work = store.create_folder(&root_id, "Work").unwrap();
    let note_id = store.create_note(&work).unwrap();

    let raw = encode_state(&store).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["root"]["type"], "folder");
    assert_eq!(value["root"]["name"], "Root");
    assert_eq!(value["root"]["expanded"], true);
    assert_eq!(value["selectedFolderId"], work.as_str());
    assert_eq!(value["selectedNoteId"], note_id.as_str());

    let note = &value["root"]["children"][0]["children"][0];
    assert_eq!(note["type"], "note");
    assert_eq!(note["title"], "Untitled Note");
    // ISO-8601 timestamps on the wire.
    let created_at = note["createdAt"].as_str().unwrap();
    assert!(created_at.contains('T'));
    assert!(note["lastEdited"].as_str().is_some());
}

#[test]
fn save_then_load_round_trips_tree_and_selection() {
    let blob_store = MemoryBlobStore::new();
    let mut store = TreeStore::new();
    let root_id = store.root_id().clone();
    let work = store.create_folder(&root_id, "Work").unwrap();
    let note_id = store.create_note(&work).unwrap();
    store.edit_note_content(&note_id, "<p>draft</p>").unwrap();
    save_state(&store, &blob_store);

    let restored = load_state(&blob_store);
    assert_eq!(restored, store);
    assert_eq!(restored.selected_note_id(), Some(&note_id));
}

#[test]
fn missing_blob_initializes_and_persists_a_fresh_root() {
    let blob_store = MemoryBlobStore::new();
    assert!(blob_store.snapshot().is_none());

    let store = load_state(&blob_store);

    assert!(store.is_empty());
    assert_eq!(store.root().name, "Root");
    assert_eq!(store.selected_folder_id(), Some(store.root_id()));
    // The fresh state was persisted immediately.
    assert_eq!(blob_store.save_count(), 1);
    assert!(blob_store.snapshot().unwrap().contains("\"root\""));
}

#[test]
fn corrupt_blob_resets_to_a_fresh_root() {
    let blob_store = MemoryBlobStore::seeded("{ not valid json ");

    let store = load_state(&blob_store);

    assert!(store.is_empty());
    assert_eq!(blob_store.save_count(), 1);
    // The corrupt blob was replaced by the fresh state.
    let replacement = blob_store.snapshot().unwrap();
    assert!(serde_json::from_str::<Value>(&replacement).is_ok());
}

#[test]
fn blob_with_wrong_shape_also_resets() {
    let blob_store = MemoryBlobStore::seeded(r#"{"root": {"id": "r", "type": "folder"}}"#);
    let store = load_state(&blob_store);
    assert!(store.is_empty());
}

#[test]
fn stale_selection_is_repaired_on_load() {
    let blob_store = MemoryBlobStore::new();
    let mut store = TreeStore::new();
    let root_id = store.root_id().clone();
    store.create_folder(&root_id, "Work").unwrap();
    save_state(&store, &blob_store);

    // Point the persisted selection at ids that no longer exist.
    let tampered = blob_store
        .snapshot()
        .unwrap()
        .replace(&format!("\"selectedFolderId\":\"{root_id}\""), "\"selectedFolderId\":\"gone\"");
    let blob_store = MemoryBlobStore::seeded(tampered);

    let restored = load_state(&blob_store);
    assert_eq!(restored.selected_folder_id(), Some(&root_id));
    assert_eq!(restored.selected_note_id(), None);
}

#[test]
fn file_blob_store_round_trips_under_its_storage_key() {
    let dir = tempfile::tempdir().unwrap();
    let blob_store = FileBlobStore::new(dir.path());
    assert!(blob_store.load().is_none());

    blob_store.save("{\"probe\": true}");
    assert_eq!(
        blob_store.path().file_name().unwrap().to_str().unwrap(),
        "leafnote_state.json"
    );
    assert_eq!(blob_store.load().unwrap(), "{\"probe\": true}");
}

#[test]
fn file_blob_store_creates_missing_directories_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("data").join("workspace");
    let blob_store = FileBlobStore::new(&nested);

    let store = TreeStore::new();
    save_state(&store, &blob_store);

    let reloaded = load_state(&blob_store);
    assert_eq!(reloaded, store);
}
