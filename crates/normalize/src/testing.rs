//! Catalog builders shared by unit tests.

use catalog_store::{CatalogStore, Document, MemoryStore, NodePath};
use serde_json::Value;

pub(crate) fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// A memory catalog holding the given nodes (ancestors included).
pub(crate) fn catalog(paths: &[&str]) -> MemoryStore {
    let mut store = MemoryStore::new();
    for path in paths {
        store.create_node(&NodePath::parse(path)).unwrap();
    }
    store
}

pub(crate) fn put(store: &mut MemoryStore, node: &str, name: &str, value: Value) {
    store
        .write_document(&NodePath::parse(node), name, &doc(value))
        .unwrap();
}

pub(crate) fn read(store: &MemoryStore, node: &str, name: &str) -> Option<Document> {
    store.read_document(&NodePath::parse(node), name).unwrap()
}

pub(crate) fn children(store: &MemoryStore, node: &str) -> Vec<String> {
    store.list_children(&NodePath::parse(node)).unwrap()
}
