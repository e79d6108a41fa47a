use crate::action::Category;
use crate::plan::{Fix, NameFix, Proposal, Scan, TypeName};
use crate::tree::Tree;
use catalog_rules::vocabulary::PREFIX_ALIASES;
use catalog_rules::Anchor;
use catalog_store::CatalogStore;

const MIN_PREFIX_LEN: usize = 3;

/// Longest prefix shared by every name, cut back to the last whole
/// `_`-delimited word (`a95_black`, `a95_white` → `a95_`).
pub fn common_word_prefix<S: AsRef<str>>(names: &[S]) -> String {
    let Some((first, rest)) = names.split_first() else {
        return String::new();
    };
    let mut prefix = first.as_ref();
    for name in rest {
        while !name.as_ref().starts_with(prefix) {
            match prefix.char_indices().last() {
                Some((idx, _)) => prefix = &prefix[..idx],
                None => return String::new(),
            }
        }
    }
    match prefix.rfind('_') {
        Some(idx) if idx > 0 => prefix[..=idx].to_string(),
        _ => String::new(),
    }
}

fn contains_words(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

/// Whether the type or brand name already says what `prefix` says, so the
/// prefix is redundant rather than a product line.
pub fn prefix_is_implied(prefix: &str, type_id: &str, brand: &str) -> bool {
    let bare = prefix.trim_matches('_');
    if bare.is_empty() {
        return false;
    }
    if type_id.contains(bare) {
        return true;
    }
    if type_id.replace('_', "").contains(&bare.replace('_', "")) {
        return true;
    }

    let prefix_words: Vec<&str> = bare.split('_').collect();
    for (alias, fragment) in PREFIX_ALIASES {
        let alias_words: Vec<&str> = alias.split('_').collect();
        if contains_words(&prefix_words, &alias_words) && type_id.contains(fragment) {
            return true;
        }
    }

    brand
        .split('_')
        .filter(|word| !word.is_empty())
        .any(|word| prefix_words.contains(&word))
}

/// Category 8: a prefix carried by every variant of a filament type. Implied
/// prefixes are stripped in place, anything else becomes a new filament
/// type `{prefix}_{type}`.
pub fn detect_common_prefixes(store: &dyn CatalogStore, brand: &str) -> Scan {
    let tree = Tree::new(store);
    let mut scan = Scan::default();

    for ty in tree.types(brand, &mut scan) {
        let Some(type_id) = ty.name() else { continue };
        let variants = tree.children(&ty, &mut scan);
        if variants.len() < 2 {
            continue;
        }
        let prefix = common_word_prefix(&variants);
        if prefix.len() < MIN_PREFIX_LEN {
            continue;
        }
        let Some(material) = ty.parent() else { continue };
        let implied = prefix_is_implied(&prefix, type_id, brand);
        let new_type = format!("{}_{type_id}", prefix.trim_end_matches('_'));

        for variant_id in &variants {
            let source = ty.join(variant_id.as_str());
            let rest = &variant_id[prefix.len()..];
            if rest.is_empty() {
                scan.skip(
                    Category::CommonPrefix,
                    format!("Cat 8: {source} -> empty after stripping '{prefix}'"),
                );
                continue;
            }
            let name = NameFix {
                fragment: prefix.clone(),
                anchor: Anchor::Start,
                pattern: None,
            };
            let proposal = if implied {
                Proposal::new(
                    Category::CommonPrefix,
                    source.clone(),
                    Fix::Rename {
                        target: ty.join(rest),
                        name,
                    },
                    format!("Strip common prefix '{prefix}'"),
                )
            } else {
                Proposal::new(
                    Category::CommonPrefix,
                    source.clone(),
                    Fix::Move {
                        target: material.join(new_type.as_str()).join(rest),
                        type_name: TypeName::Generated,
                        name,
                    },
                    format!("Move to new filament '{new_type}', strip prefix '{prefix}'"),
                )
            };
            scan.propose(proposal);
        }
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::catalog;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefix_ends_on_whole_word() {
        assert_eq!(common_word_prefix(&["a95_black", "a95_white", "a95_red"]), "a95_");
        assert_eq!(common_word_prefix(&["silk_gold", "silver"]), "");
        assert_eq!(common_word_prefix(&["hs_matte_black", "hs_matte_blue"]), "hs_matte_");
        assert_eq!(common_word_prefix::<&str>(&[]), "");
    }

    #[test]
    fn implied_prefix_checks() {
        assert!(prefix_is_implied("silk_", "silk_pla", "acme"));
        assert!(prefix_is_implied("highspeed_", "high_speed_pla", "acme"));
        assert!(prefix_is_implied("hs_", "high_speed_petg", "acme"));
        assert!(prefix_is_implied("sunlu_", "pla", "sunlu"));
        assert!(!prefix_is_implied("a95_", "tpu", "acme"));
    }

    #[test]
    fn unimplied_prefix_moves_to_new_type() {
        let store = catalog(&[
            "acme/TPU/tpu/a95_black",
            "acme/TPU/tpu/a95_red",
            "acme/TPU/tpu/a95_white",
        ]);
        let scan = detect_common_prefixes(&store, "acme");
        let targets: Vec<String> = scan
            .proposals
            .iter()
            .filter_map(|p| p.fix.target().map(ToString::to_string))
            .collect();
        assert_eq!(
            targets,
            vec!["acme/TPU/a95_tpu/black", "acme/TPU/a95_tpu/red", "acme/TPU/a95_tpu/white"]
        );
    }

    #[test]
    fn implied_prefix_is_stripped_in_place() {
        let store = catalog(&["acme/PLA/silk_pla/silk_gold", "acme/PLA/silk_pla/silk_copper"]);
        let scan = detect_common_prefixes(&store, "acme");
        let targets: Vec<String> = scan
            .proposals
            .iter()
            .filter_map(|p| p.fix.target().map(ToString::to_string))
            .collect();
        assert_eq!(targets, vec!["acme/PLA/silk_pla/copper", "acme/PLA/silk_pla/gold"]);
    }

    #[test]
    fn single_variant_types_are_ignored() {
        let store = catalog(&["acme/TPU/tpu/a95_black"]);
        assert!(detect_common_prefixes(&store, "acme").proposals.is_empty());
    }
}
