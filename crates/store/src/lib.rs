//! # Catalog Store
//!
//! Filesystem-shaped access to the product catalog.
//!
//! ## Layout
//!
//! ```text
//! data/
//!     │
//!     └──> brand/                      (depth 1)
//!            └──> MaterialClass/       (depth 2)
//!                   └──> filament_type/    (depth 3, filament.json)
//!                          └──> variant/   (depth 4, variant.json, sizes.json, ...)
//! ```
//!
//! Every node is a directory holding zero or more JSON attribute documents.
//! The store assumes nothing about a document beyond it being a JSON object;
//! callers only ever touch `id` and `name`.
//!
//! Two implementations share the [`CatalogStore`] trait:
//!
//! - [`FsStore`] reads and mutates the real tree on disk.
//! - [`MemoryStore`] holds a byte-exact copy in memory, used as a dry-run
//!   overlay and in tests.
//!
//! ## Example
//!
//! ```no_run
//! use catalog_store::{CatalogStore, FsStore, NodePath};
//!
//! fn main() -> catalog_store::Result<()> {
//!     let store = FsStore::open("data")?;
//!     for brand in store.list_children(&NodePath::root())? {
//!         println!("{brand}");
//!     }
//!     Ok(())
//! }
//! ```

mod document;
mod error;
mod fs;
mod memory;
mod path;
mod store;

pub use document::{decode_document, encode_document, Document, TYPE_DOCUMENT, VARIANT_DOCUMENT};
pub use error::{Result, StoreError};
pub use fs::FsStore;
pub use memory::MemoryStore;
pub use path::{Level, NodePath};
pub use store::CatalogStore;
