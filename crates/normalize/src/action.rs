use crate::error::NormalizeError;
use serde::{Serialize, Serializer};
use std::fmt;

/// The nine naming-defect categories, numbered as they appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Color promoted to filament type, product demoted to variant.
    Swap = 1,
    /// Brand series prefix or suffix on a variant id.
    SeriesAffix = 2,
    /// Reseller import prefix on a variant id.
    ImportPrefix = 3,
    /// Technical code used as a variant id.
    TechSpec = 4,
    /// Color merged into a filament type id.
    ColorSplit = 5,
    /// Variant id over the length threshold.
    LongName = 6,
    /// Product line embedded in variant ids.
    ProductLine = 7,
    /// Prefix shared by every variant of a type.
    CommonPrefix = 8,
    /// Noisy variant display name.
    DisplayName = 9,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Swap,
        Category::SeriesAffix,
        Category::ImportPrefix,
        Category::TechSpec,
        Category::ColorSplit,
        Category::LongName,
        Category::ProductLine,
        Category::CommonPrefix,
        Category::DisplayName,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.number() == number)
    }

    /// Section label in the auto-fixable part of the report.
    pub fn fixed_label(self) -> &'static str {
        match self {
            Category::Swap => "Swapped filament/variant layers",
            Category::SeriesAffix => "Prefix/suffix stripped",
            Category::ImportPrefix => "Import prefix stripped",
            Category::ColorSplit => "Color split from filament name",
            Category::ProductLine => "Product line moved to filament type",
            Category::CommonPrefix => "Common prefix stripped/moved",
            Category::DisplayName => "Display name fixed",
            Category::TechSpec | Category::LongName => self.review_label(),
        }
    }

    /// Section label in the manual-review part of the report.
    pub fn review_label(self) -> &'static str {
        match self {
            Category::SeriesAffix => "Series prefix (potential product line)",
            Category::ImportPrefix => "Import prefix (potential product line)",
            Category::TechSpec => "Technical specs in variant names",
            Category::ColorSplit => "Colors merged into filament names",
            Category::LongName => "Overly long variant names",
            Category::ProductLine => "Product line prefix at variant level",
            Category::Swap | Category::CommonPrefix | Category::DisplayName => {
                self.fixed_label()
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u8> for Category {
    type Error = NormalizeError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::from_number(number).ok_or(NormalizeError::UnknownCategory(number))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Auto,
    ManualReview,
}

/// One recorded decision. Created once by the run that found it and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub category: Category,
    pub brand: String,
    pub old_path: String,
    /// Destination path; empty for in-place name edits and report-only items.
    pub new_path: String,
    pub description: String,
    pub confidence: Confidence,
}

impl Action {
    pub fn is_auto(&self) -> bool {
        self.confidence == Confidence::Auto
    }
}
