//! # Catalog Normalize
//!
//! Finds and repairs naming defects in a filament catalog tree
//! (`brand/material/filament_type/variant`).
//!
//! A run works in two phases per detector pass:
//!
//! 1. **Detection** - a pure scan of the store returns [`Proposal`]s.
//! 2. **Execution** - the [`Executor`] checks each proposal against the
//!    [`CollisionGuard`], records an [`Action`], then rewrites the store.
//!
//! Passes run per brand in a fixed order (swap, prefix strip, product line
//! prefix and suffix, suffix strip, color split, common prefix, display
//! names); technical-code and long-id audits run once at the end.
//!
//! Dry runs execute the same pipeline against an in-memory snapshot, so the
//! report matches what `--apply` would do.
//!
//! ```rust,no_run
//! use catalog_normalize::{render_report, run_cleanup, CleanupOptions};
//! use catalog_rules::RuleBook;
//! use std::path::Path;
//!
//! let rules = RuleBook::builtin().unwrap();
//! let report = run_cleanup(Path::new("data"), &rules, &CleanupOptions::default()).unwrap();
//! println!("{}", render_report(&report, false));
//! ```

mod action;
pub mod detect;
mod engine;
mod error;
mod execute;
mod guard;
mod plan;
mod report;
#[cfg(test)]
mod testing;
mod tree;

pub use action::{Action, Category, Confidence};
pub use engine::{run_cleanup, CleanupOptions, Normalizer};
pub use error::{NormalizeError, Result};
pub use execute::{resolve_variant_name, type_display_name, variant_display_name, Executor};
pub use guard::CollisionGuard;
pub use plan::{Fix, NameFix, Proposal, Scan, Skip, TypeName};
pub use report::{render_report, CleanupReport, ReportSummary};
