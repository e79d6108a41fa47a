//! # Catalog Rules
//!
//! Read-only lookup data for the naming cleanup:
//!
//! - **Vocabulary** - colors, color modifiers, material keywords, casing
//!   word lists, technical-code patterns.
//! - **Rule book** - per-brand affix rules (strip / product-line move / flag),
//!   SKU patterns and display-name overrides, loaded from TOML and compiled
//!   once.
//! - **Naming** - display-name generation and cleanup helpers.
//!
//! ```rust
//! use catalog_rules::{display_name, RuleBook};
//!
//! let rules = RuleBook::builtin().unwrap();
//! assert!(!rules.brand("sakata_3d").is_empty());
//! assert_eq!(display_name("silk_pla"), "Silk PLA");
//! ```

mod error;
mod naming;
mod rulebook;
pub mod vocabulary;

pub use error::{Result, RulesError};
pub use naming::{
    affix_name_pattern, display_name, slug_title, strip_name_pattern, tidy_name, title_case,
    trim_leading_dash, Anchor,
};
pub use rulebook::{AffixPosition, AffixRule, BrandRules, RuleBehavior, RuleBook, DEFAULT_RULES};
