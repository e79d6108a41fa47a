use crate::fs::is_hidden;
use crate::{decode_document, encode_document, CatalogStore, Document, NodePath, Result, StoreError};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use walkdir::WalkDir;

/// In-memory [`CatalogStore`].
///
/// Documents are kept as raw bytes so a snapshot of a real tree behaves
/// exactly like the tree itself, including documents that fail to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    nodes: BTreeSet<NodePath>,
    files: BTreeMap<NodePath, BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a byte-exact copy of the tree under `root`.
    ///
    /// Files that cannot be read are left out of the snapshot; their paths
    /// and errors are returned alongside so the caller can report them.
    pub fn snapshot(root: impl AsRef<Path>) -> Result<(Self, Vec<String>)> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(StoreError::MissingRoot(root.to_path_buf()));
        }

        let mut store = Self::new();
        let mut unreadable = Vec::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !entry.file_name().to_str().is_some_and(is_hidden)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Failed to read entry: {err}");
                    unreadable.push(err.to_string());
                    continue;
                }
            };
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let Some(relative) = relative.to_str() else {
                log::warn!("Skipping non UTF-8 path {}", entry.path().display());
                continue;
            };

            if entry.file_type().is_dir() {
                store.nodes.insert(NodePath::parse(relative));
            } else if entry.file_type().is_file() {
                let path = NodePath::parse(relative);
                let (Some(node), Some(name)) = (path.parent(), path.name()) else {
                    continue;
                };
                match std::fs::read(entry.path()) {
                    Ok(bytes) => {
                        store.files.entry(node).or_default().insert(name.to_string(), bytes);
                    }
                    Err(err) => {
                        log::warn!("Failed to read {}: {err}", entry.path().display());
                        unreadable.push(format!("{path}: {err}"));
                    }
                }
            }
        }

        log::debug!(
            "Snapshot of {} holds {} nodes",
            root.display(),
            store.nodes.len()
        );
        Ok((store, unreadable))
    }

    /// Place raw bytes at `node/name`, creating the node. Handy for seeding
    /// malformed documents in tests.
    pub fn insert_raw(&mut self, node: &NodePath, name: &str, bytes: impl Into<Vec<u8>>) {
        self.add_node(node);
        self.files
            .entry(node.clone())
            .or_default()
            .insert(name.to_string(), bytes.into());
    }

    pub fn raw(&self, node: &NodePath, name: &str) -> Option<&[u8]> {
        self.files.get(node)?.get(name).map(Vec::as_slice)
    }

    /// All node paths, sorted.
    pub fn nodes(&self) -> impl Iterator<Item = &NodePath> {
        self.nodes.iter()
    }

    fn add_node(&mut self, node: &NodePath) {
        let mut current = Some(node.clone());
        while let Some(path) = current {
            if path.is_root() || !self.nodes.insert(path.clone()) {
                break;
            }
            current = path.parent();
        }
    }

    fn subtree(&self, node: &NodePath) -> Vec<NodePath> {
        self.nodes
            .range(node.clone()..)
            .take_while(|path| node.contains(path))
            .cloned()
            .collect()
    }
}

impl CatalogStore for MemoryStore {
    fn exists(&self, node: &NodePath) -> bool {
        node.is_root() || self.nodes.contains(node)
    }

    fn list_children(&self, node: &NodePath) -> Result<Vec<String>> {
        if !self.exists(node) {
            return Err(StoreError::not_found(node));
        }
        let depth = node.depth() + 1;
        Ok(self
            .subtree(node)
            .into_iter()
            .filter(|path| path.depth() == depth)
            .filter_map(|path| path.name().map(str::to_string))
            .filter(|name| !is_hidden(name))
            .collect())
    }

    fn list_documents(&self, node: &NodePath) -> Result<Vec<String>> {
        if !self.exists(node) {
            return Err(StoreError::not_found(node));
        }
        Ok(self
            .files
            .get(node)
            .map(|files| files.keys().filter(|name| !is_hidden(name)).cloned().collect())
            .unwrap_or_default())
    }

    fn has_document(&self, node: &NodePath, name: &str) -> bool {
        self.raw(node, name).is_some()
    }

    fn read_document(&self, node: &NodePath, name: &str) -> Result<Option<Document>> {
        match self.raw(node, name) {
            Some(bytes) => decode_document(bytes, &format!("{node}/{name}")).map(Some),
            None => Ok(None),
        }
    }

    fn write_document(&mut self, node: &NodePath, name: &str, doc: &Document) -> Result<()> {
        let bytes = encode_document(doc)?;
        self.insert_raw(node, name, bytes);
        Ok(())
    }

    fn create_node(&mut self, node: &NodePath) -> Result<()> {
        self.add_node(node);
        Ok(())
    }

    fn move_subtree(&mut self, from: &NodePath, to: &NodePath) -> Result<()> {
        if from.is_root() || !self.nodes.contains(from) {
            return Err(StoreError::not_found(from));
        }
        if self.exists(to) {
            return Err(StoreError::already_exists(to));
        }
        if let Some(parent) = to.parent() {
            self.add_node(&parent);
        }

        for path in self.subtree(from) {
            self.nodes.remove(&path);
            let Some(rebased) = path.rebase(from, to) else {
                continue;
            };
            if let Some(files) = self.files.remove(&path) {
                self.files.insert(rebased.clone(), files);
            }
            self.nodes.insert(rebased);
        }
        Ok(())
    }

    fn move_document(&mut self, from: &NodePath, to: &NodePath, name: &str) -> Result<()> {
        if self.has_document(to, name) {
            return Err(StoreError::already_exists(format!("{to}/{name}")));
        }
        let bytes = self
            .files
            .get_mut(from)
            .and_then(|files| files.remove(name))
            .ok_or_else(|| StoreError::not_found(format!("{from}/{name}")))?;
        if self.files.get(from).is_some_and(BTreeMap::is_empty) {
            self.files.remove(from);
        }
        self.insert_raw(to, name, bytes);
        Ok(())
    }

    fn delete_subtree(&mut self, node: &NodePath) -> Result<()> {
        if node.is_root() {
            return Err(StoreError::Other("refusing to delete the catalog root".into()));
        }
        if !self.nodes.contains(node) {
            return Err(StoreError::not_found(node));
        }
        for path in self.subtree(node) {
            self.nodes.remove(&path);
            self.files.remove(&path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn snapshot_matches_disk_listing() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("acme/PLA/pla/red")).unwrap();
        fs::create_dir_all(temp.path().join(".git/objects")).unwrap();
        fs::write(temp.path().join("acme/PLA/pla/filament.json"), b"{\"id\":\"pla\"}").unwrap();
        fs::write(temp.path().join("acme/PLA/pla/red/variant.json"), b"not json").unwrap();

        let (store, unreadable) = MemoryStore::snapshot(temp.path()).unwrap();
        assert!(unreadable.is_empty());
        assert_eq!(store.list_children(&NodePath::root()).unwrap(), vec!["acme"]);

        let pla = NodePath::parse("acme/PLA/pla");
        assert_eq!(store.list_children(&pla).unwrap(), vec!["red"]);
        assert_eq!(store.read_document(&pla, "filament.json").unwrap().unwrap()["id"], "pla");
        assert!(store.read_document(&pla.join("red"), "variant.json").is_err());
    }

    #[test]
    fn subtree_ops_do_not_touch_name_prefixed_siblings() {
        let mut store = MemoryStore::new();
        store.insert_raw(&NodePath::parse("a/M/t/red"), "variant.json", "{}");
        store.insert_raw(&NodePath::parse("a/M/t/red_matte"), "variant.json", "{}");

        store
            .move_subtree(&NodePath::parse("a/M/t/red"), &NodePath::parse("a/M/u/red"))
            .unwrap();
        assert_eq!(
            store.list_children(&NodePath::parse("a/M/t")).unwrap(),
            vec!["red_matte"]
        );
        assert!(store.has_document(&NodePath::parse("a/M/u/red"), "variant.json"));

        store.delete_subtree(&NodePath::parse("a/M/t")).unwrap();
        assert_eq!(store.list_children(&NodePath::parse("a/M")).unwrap(), vec!["u"]);
    }

    #[test]
    fn move_document_refuses_existing_target() {
        let mut store = MemoryStore::new();
        let t = NodePath::parse("a/M/t");
        let red = t.join("red");
        store.insert_raw(&t, "sizes.json", "[]");
        store.insert_raw(&red, "sizes.json", "[1]");
        assert!(store.move_document(&t, &red, "sizes.json").is_err());
        assert_eq!(store.raw(&t, "sizes.json"), Some(&b"[]"[..]));
    }
}
