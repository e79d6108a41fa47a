use std::path::PathBuf;
use thiserror::Error;

/// Result type for rule loading
pub type Result<T> = std::result::Result<T, RulesError>;

/// Errors raised while loading or compiling rule tables
#[derive(Error, Debug)]
pub enum RulesError {
    /// Rule file could not be read
    #[error("Cannot read rules from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rule file is not valid TOML or does not match the schema
    #[error("Invalid rules file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configured regex does not compile
    #[error("Invalid pattern {pattern:?} for brand {brand}: {source}")]
    Pattern {
        brand: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A rule is well-formed TOML but semantically unusable
    #[error("Invalid rule for brand {brand}: {reason}")]
    InvalidRule { brand: String, reason: String },
}

impl RulesError {
    pub fn invalid_rule(brand: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            brand: brand.into(),
            reason: reason.into(),
        }
    }
}
