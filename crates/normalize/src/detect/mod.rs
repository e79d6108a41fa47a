//! Detection phase: pure scans that read the store and return proposals.

mod affix;
mod audit;
mod common_prefix;
mod display;
mod split;
mod swap;

pub use affix::{detect_affix_strips, detect_product_lines, product_line_type};
pub use audit::audit_variants;
pub use common_prefix::{common_word_prefix, detect_common_prefixes, prefix_is_implied};
pub use display::{cleaned_display_name, detect_display_names};
pub use split::{detect_color_splits, split_color_tail};
pub use swap::detect_swapped_layers;
