use crate::action::Category;
use crate::plan::{Fix, Proposal, Scan};
use crate::tree::Tree;
use catalog_rules::{slug_title, tidy_name};
use catalog_store::{CatalogStore, VARIANT_DOCUMENT};

/// Cleaned display name for a variant, or `None` when `name` is fine.
///
/// Drops empty parentheses and doubled whitespace; a name that merely adds
/// a few words in front of the id-derived name (`PLA 850 Black` for
/// `black`) collapses to the id-derived name.
pub fn cleaned_display_name(variant_id: &str, name: &str) -> Option<String> {
    let expected = slug_title(variant_id);
    let mut cleaned = tidy_name(name);
    if cleaned.is_empty() {
        cleaned = expected.clone();
    }
    if cleaned != expected
        && cleaned.to_lowercase().ends_with(&expected.to_lowercase())
        && cleaned.chars().count() > expected.chars().count() + 2
    {
        cleaned = expected;
    }
    (cleaned != name).then_some(cleaned)
}

/// Category 9: noisy variant display names.
pub fn detect_display_names(store: &dyn CatalogStore, brand: &str) -> Scan {
    let tree = Tree::new(store);
    let mut scan = Scan::default();

    for variant in tree.variants(brand, &mut scan) {
        let Some(id) = variant.name() else { continue };
        let Some(doc) = tree.document(&variant, VARIANT_DOCUMENT, &mut scan) else {
            continue;
        };
        let Some(name) = doc.get("name").and_then(|v| v.as_str()) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if let Some(cleaned) = cleaned_display_name(id, name) {
            let description = format!("Fix display name: '{name}' -> '{cleaned}'");
            scan.propose(Proposal::new(
                Category::DisplayName,
                variant.clone(),
                Fix::SetName { name: cleaned },
                description,
            ));
        }
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, put};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn cleans_noise_and_leftover_prefixes() {
        assert_eq!(cleaned_display_name("black", "Black ()"), Some("Black".into()));
        assert_eq!(cleaned_display_name("black", "Matte  Black"), Some("Black".into()));
        assert_eq!(cleaned_display_name("black", "PLA 850 Black"), Some("Black".into()));
        assert_eq!(cleaned_display_name("dark_blue", "Dark Blue"), None);
        assert_eq!(cleaned_display_name("95a_black", "95A Black"), None);
        assert_eq!(cleaned_display_name("gold", "Gold  "), Some("Gold".into()));
    }

    #[test]
    fn close_superstrings_are_kept() {
        assert_eq!(cleaned_display_name("red", "A Red"), None);
    }

    #[test]
    fn proposes_in_place_edits() {
        let mut store = catalog(&[]);
        put(
            &mut store,
            "acme/PLA/pla/black",
            VARIANT_DOCUMENT,
            json!({"id": "black", "name": "PLA 850 Black"}),
        );
        put(
            &mut store,
            "acme/PLA/pla/red",
            VARIANT_DOCUMENT,
            json!({"id": "red", "name": "Red"}),
        );
        let scan = detect_display_names(&store, "acme");
        assert_eq!(scan.proposals.len(), 1);
        assert_eq!(scan.proposals[0].fix.target(), None);
        assert_eq!(
            scan.proposals[0].description,
            "Fix display name: 'PLA 850 Black' -> 'Black'"
        );
    }
}
