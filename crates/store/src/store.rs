use crate::{Document, NodePath, Result};

/// Storage capability the normalizer works through.
///
/// Nodes are directories, documents are the JSON files inside them. Child
/// and document listings are sorted by name and never include hidden
/// (`.`-prefixed) entries.
pub trait CatalogStore {
    fn exists(&self, node: &NodePath) -> bool;

    /// Names of the child nodes of `node`. Fails with `NotFound` when `node`
    /// does not exist.
    fn list_children(&self, node: &NodePath) -> Result<Vec<String>>;

    /// File names of the documents directly inside `node`.
    fn list_documents(&self, node: &NodePath) -> Result<Vec<String>>;

    fn has_document(&self, node: &NodePath, name: &str) -> bool;

    /// `Ok(None)` when the document is absent; an error when it exists but
    /// cannot be read or parsed.
    fn read_document(&self, node: &NodePath, name: &str) -> Result<Option<Document>>;

    /// Create or replace a document. The node is created if missing.
    fn write_document(&mut self, node: &NodePath, name: &str, doc: &Document) -> Result<()>;

    /// Create `node` and any missing ancestors. Existing nodes are left alone.
    fn create_node(&mut self, node: &NodePath) -> Result<()>;

    /// Move a node with everything below it. `to` must not exist; its
    /// parent is created when missing.
    fn move_subtree(&mut self, from: &NodePath, to: &NodePath) -> Result<()>;

    /// Move one document file between nodes, unchanged. The target must not
    /// already hold a document with that name.
    fn move_document(&mut self, from: &NodePath, to: &NodePath, name: &str) -> Result<()>;

    fn delete_subtree(&mut self, node: &NodePath) -> Result<()>;
}
