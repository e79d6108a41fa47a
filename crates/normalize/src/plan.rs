//! Proposals produced by the detection phase and consumed by the executor.

use crate::action::{Category, Confidence};
use catalog_rules::Anchor;
use catalog_store::NodePath;
use regex::Regex;

/// How to rebuild a variant's display name after its id lost a fragment.
#[derive(Debug, Clone)]
pub struct NameFix {
    /// The slug text removed from the id, such as `850_` or `digilab_bla_01_`.
    pub fragment: String,
    pub anchor: Anchor,
    /// Configured cleanup pattern; when absent one is derived from `fragment`.
    pub pattern: Option<Regex>,
}

/// Display name for a filament type the executor may have to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    /// Override table, else generated from the new id.
    Generated,
    /// Product line joined onto the source type's name.
    ProductLine { line: String, anchor: Anchor },
}

#[derive(Debug, Clone)]
pub enum Fix {
    /// Rename a variant inside its own type.
    Rename { target: NodePath, name: NameFix },
    /// Move a variant into another, possibly new, filament type.
    Move {
        target: NodePath,
        type_name: TypeName,
        name: NameFix,
    },
    /// Split a filament type into `head` type plus `tail` variant.
    /// `target` is the new variant node.
    Split { target: NodePath },
    /// Turn a color type with a product child inside out.
    /// `target` is `material/product/color`.
    Swap { target: NodePath },
    /// Replace a variant's display name in place.
    SetName { name: String },
    /// Report for manual review, never applied.
    Review,
}

impl Fix {
    pub fn target(&self) -> Option<&NodePath> {
        match self {
            Fix::Rename { target, .. }
            | Fix::Move { target, .. }
            | Fix::Split { target }
            | Fix::Swap { target } => Some(target),
            Fix::SetName { .. } | Fix::Review => None,
        }
    }

    pub fn confidence(&self) -> Confidence {
        match self {
            Fix::Review => Confidence::ManualReview,
            _ => Confidence::Auto,
        }
    }
}

/// A candidate action found by a detector.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub category: Category,
    pub brand: String,
    /// Node the fix starts from: a variant, or a filament type for splits.
    pub source: NodePath,
    pub fix: Fix,
    pub description: String,
}

impl Proposal {
    pub fn new(
        category: Category,
        source: NodePath,
        fix: Fix,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            brand: source.segment(0).unwrap_or_default().to_string(),
            source,
            fix,
            description: description.into(),
        }
    }
}

/// A proposal the detector had to drop, with the report line explaining why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub category: Category,
    pub message: String,
}

/// Result of one detector pass. Detectors never mutate the store.
#[derive(Debug, Default)]
pub struct Scan {
    pub proposals: Vec<Proposal>,
    pub skipped: Vec<Skip>,
    pub errors: Vec<String>,
}

impl Scan {
    pub fn propose(&mut self, proposal: Proposal) {
        self.proposals.push(proposal);
    }

    pub fn skip(&mut self, category: Category, message: impl Into<String>) {
        self.skipped.push(Skip {
            category,
            message: message.into(),
        });
    }

    /// Keep only what belongs to `category`, when a filter is set.
    pub fn retain_category(&mut self, category: Option<Category>) {
        if let Some(category) = category {
            self.proposals.retain(|p| p.category == category);
            self.skipped.retain(|s| s.category == category);
        }
    }
}
