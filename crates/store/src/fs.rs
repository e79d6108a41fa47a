use crate::{decode_document, encode_document, CatalogStore, Document, NodePath, Result, StoreError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// [`CatalogStore`] backed by a directory tree on disk.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open an existing catalog root.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(StoreError::MissingRoot(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn node_dir(&self, node: &NodePath) -> PathBuf {
        self.root.join(node.to_relative())
    }

    fn entries(&self, node: &NodePath, want_dirs: bool) -> Result<Vec<String>> {
        let dir = self.node_dir(node);
        let read = match fs::read_dir(&dir) {
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::not_found(node));
            }
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        for entry in read {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                log::warn!("Skipping non UTF-8 entry under {}", dir.display());
                continue;
            };
            if is_hidden(&name) {
                continue;
            }
            let file_type = entry.file_type()?;
            if file_type.is_dir() == want_dirs && (want_dirs || file_type.is_file()) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

impl CatalogStore for FsStore {
    fn exists(&self, node: &NodePath) -> bool {
        self.node_dir(node).is_dir()
    }

    fn list_children(&self, node: &NodePath) -> Result<Vec<String>> {
        self.entries(node, true)
    }

    fn list_documents(&self, node: &NodePath) -> Result<Vec<String>> {
        self.entries(node, false)
    }

    fn has_document(&self, node: &NodePath, name: &str) -> bool {
        self.node_dir(node).join(name).is_file()
    }

    fn read_document(&self, node: &NodePath, name: &str) -> Result<Option<Document>> {
        let path = self.node_dir(node).join(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        decode_document(&bytes, &format!("{node}/{name}")).map(Some)
    }

    fn write_document(&mut self, node: &NodePath, name: &str, doc: &Document) -> Result<()> {
        let dir = self.node_dir(node);
        fs::create_dir_all(&dir)?;

        let bytes = encode_document(doc)?;
        let tmp = dir.join(format!(".{name}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, dir.join(name))?;
        Ok(())
    }

    fn create_node(&mut self, node: &NodePath) -> Result<()> {
        fs::create_dir_all(self.node_dir(node))?;
        Ok(())
    }

    fn move_subtree(&mut self, from: &NodePath, to: &NodePath) -> Result<()> {
        let source = self.node_dir(from);
        let target = self.node_dir(to);
        if !source.is_dir() {
            return Err(StoreError::not_found(from));
        }
        if target.exists() {
            return Err(StoreError::already_exists(to));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&source, &target)?;
        log::debug!("Moved {from} -> {to}");
        Ok(())
    }

    fn move_document(&mut self, from: &NodePath, to: &NodePath, name: &str) -> Result<()> {
        let source = self.node_dir(from).join(name);
        let target_dir = self.node_dir(to);
        let target = target_dir.join(name);
        if !source.is_file() {
            return Err(StoreError::not_found(format!("{from}/{name}")));
        }
        if target.exists() {
            return Err(StoreError::already_exists(format!("{to}/{name}")));
        }
        fs::create_dir_all(&target_dir)?;
        fs::rename(&source, &target)?;
        Ok(())
    }

    fn delete_subtree(&mut self, node: &NodePath) -> Result<()> {
        if node.is_root() {
            return Err(StoreError::Other("refusing to delete the catalog root".into()));
        }
        match fs::remove_dir_all(self.node_dir(node)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StoreError::not_found(node)),
            Err(err) => Err(err.into()),
        }
    }
}

pub(crate) fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
