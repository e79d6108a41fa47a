use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NormalizeError>;

/// Failures that abort a cleanup run. Everything else ends up in the report.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Catalog root not found: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("Store error: {0}")]
    StoreError(#[from] catalog_store::StoreError),

    #[error("Rules error: {0}")]
    RulesError(#[from] catalog_rules::RulesError),

    #[error("Unknown category: {0}")]
    UnknownCategory(u8),
}
