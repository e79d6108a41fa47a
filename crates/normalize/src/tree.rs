use crate::plan::Scan;
use catalog_store::{CatalogStore, Document, NodePath};

/// Read-only walk over the catalog levels. Missing nodes read as empty and
/// other failures are recorded on the scan instead of raised.
pub(crate) struct Tree<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> Tree<'a> {
    pub fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    pub fn children(&self, node: &NodePath, scan: &mut Scan) -> Vec<String> {
        match self.store.list_children(node) {
            Ok(children) => children,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => {
                log::warn!("Cannot list {node}: {err}");
                scan.errors.push(format!("{node}: {err}"));
                Vec::new()
            }
        }
    }

    /// Material class nodes of a brand.
    pub fn materials(&self, brand: &str, scan: &mut Scan) -> Vec<NodePath> {
        let brand = NodePath::new([brand]);
        self.child_paths(&brand, scan)
    }

    pub fn child_paths(&self, node: &NodePath, scan: &mut Scan) -> Vec<NodePath> {
        self.children(node, scan)
            .into_iter()
            .map(|name| node.join(name))
            .collect()
    }

    /// Every filament type node of a brand.
    pub fn types(&self, brand: &str, scan: &mut Scan) -> Vec<NodePath> {
        self.materials(brand, scan)
            .iter()
            .flat_map(|material| self.child_paths(material, scan))
            .collect()
    }

    /// Every variant node of a brand.
    pub fn variants(&self, brand: &str, scan: &mut Scan) -> Vec<NodePath> {
        self.types(brand, scan)
            .iter()
            .flat_map(|ty| self.child_paths(ty, scan))
            .collect()
    }

    /// A document, or `None` when it is absent or unreadable.
    pub fn document(&self, node: &NodePath, name: &str, scan: &mut Scan) -> Option<Document> {
        match self.store.read_document(node, name) {
            Ok(doc) => doc,
            Err(err) => {
                log::warn!("Cannot read {node}/{name}: {err}");
                scan.errors.push(format!("{node}/{name}: {err}"));
                None
            }
        }
    }
}
