use crate::action::Category;
use crate::plan::{Fix, Proposal, Scan};
use crate::tree::Tree;
use catalog_rules::vocabulary::{has_material_keyword, is_color_like};
use catalog_store::CatalogStore;

/// Category 1: a filament type named after a color whose variants are named
/// after products. Each such variant becomes `material/<variant>/<color>`.
pub fn detect_swapped_layers(store: &dyn CatalogStore, brand: &str) -> Scan {
    let tree = Tree::new(store);
    let mut scan = Scan::default();

    for ty in tree.types(brand, &mut scan) {
        let Some(color) = ty.name().map(str::to_string) else {
            continue;
        };
        if !is_color_like(&color) {
            continue;
        }
        let Some(material) = ty.parent() else {
            continue;
        };
        for variant in tree.child_paths(&ty, &mut scan) {
            let Some(product) = variant.name() else {
                continue;
            };
            if !has_material_keyword(product) {
                continue;
            }
            let target = material.join(product).join(color.as_str());
            let description =
                format!("Swap: filament '{color}' is a color, variant '{product}' is a product");
            scan.propose(Proposal::new(
                Category::Swap,
                variant.clone(),
                Fix::Swap { target },
                description,
            ));
        }
    }
    scan
}
