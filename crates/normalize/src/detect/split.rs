use crate::action::Category;
use crate::plan::{Fix, Proposal, Scan};
use crate::tree::Tree;
use catalog_rules::vocabulary::{has_material_keyword, is_color_like, is_known_color};
use catalog_store::CatalogStore;

/// Split `silk_pla_red` into `("silk_pla", "red")`. A two-word tail must be
/// color-like, a one-word tail a known color, and the head must name a
/// material. The longer tail wins.
pub fn split_color_tail(type_id: &str) -> Option<(String, String)> {
    let words: Vec<&str> = type_id.split('_').collect();
    for tail_len in [2usize, 1] {
        if words.len() <= tail_len {
            continue;
        }
        let (head, tail) = words.split_at(words.len() - tail_len);
        let tail = tail.join("_");
        let tail_ok = if tail_len == 1 {
            is_known_color(&tail)
        } else {
            is_color_like(&tail)
        };
        let head = head.join("_");
        if tail_ok && !head.is_empty() && has_material_keyword(&head) {
            return Some((head, tail));
        }
    }
    None
}

/// Category 5: colors merged into filament type ids.
pub fn detect_color_splits(store: &dyn CatalogStore, brand: &str) -> Scan {
    let tree = Tree::new(store);
    let mut scan = Scan::default();

    for ty in tree.types(brand, &mut scan) {
        let Some(id) = ty.name() else { continue };
        let Some((head, tail)) = split_color_tail(id) else {
            continue;
        };
        let Some(material) = ty.parent() else { continue };
        let target = material.join(head.as_str()).join(tail.as_str());
        let description = format!("Split filament '{id}' into '{head}' + variant '{tail}'");
        scan.propose(Proposal::new(
            Category::ColorSplit,
            ty.clone(),
            Fix::Split { target },
            description,
        ));
    }
    scan
}
