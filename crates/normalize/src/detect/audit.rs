use crate::action::Category;
use crate::plan::{Fix, Proposal, Scan};
use crate::tree::Tree;
use catalog_rules::vocabulary::MAX_VARIANT_ID_LEN;
use catalog_rules::RuleBook;
use catalog_store::CatalogStore;
use std::collections::HashSet;

/// Categories 4 and 6, run once after every structural fix. Paths already in
/// `surfaced` are not reported again.
pub fn audit_variants(
    store: &dyn CatalogStore,
    rules: &RuleBook,
    brands: &[String],
    surfaced: &HashSet<String>,
    category: Option<Category>,
) -> Scan {
    let tree = Tree::new(store);
    let mut scan = Scan::default();
    let wants = |c: Category| category.map_or(true, |only| only == c);
    let mut reported: HashSet<String> = HashSet::new();

    if wants(Category::TechSpec) {
        for brand in brands {
            for variant in tree.variants(brand, &mut scan) {
                let path = variant.to_string();
                if surfaced.contains(&path) {
                    continue;
                }
                let Some(id) = variant.name() else { continue };
                if let Some(pattern) = rules.tech_spec_match(id) {
                    scan.propose(Proposal::new(
                        Category::TechSpec,
                        variant.clone(),
                        Fix::Review,
                        format!("Technical spec in variant name (matched: {})", pattern.as_str()),
                    ));
                    reported.insert(path);
                }
            }
        }
    }

    if wants(Category::LongName) {
        for brand in brands {
            for variant in tree.variants(brand, &mut scan) {
                let path = variant.to_string();
                if surfaced.contains(&path) || reported.contains(&path) {
                    continue;
                }
                let Some(id) = variant.name() else { continue };
                let len = id.chars().count();
                if len > MAX_VARIANT_ID_LEN {
                    scan.propose(Proposal::new(
                        Category::LongName,
                        variant.clone(),
                        Fix::Review,
                        format!(
                            "Variant name is {len} chars (max recommended: {MAX_VARIANT_ID_LEN})"
                        ),
                    ));
                }
            }
        }
    }
    scan
}
