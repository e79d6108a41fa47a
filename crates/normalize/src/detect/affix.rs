use crate::action::Category;
use crate::plan::{Fix, NameFix, Proposal, Scan, TypeName};
use crate::tree::Tree;
use catalog_rules::{AffixPosition, Anchor, RuleBehavior, RuleBook};
use catalog_store::{CatalogStore, NodePath};

fn anchor(position: AffixPosition) -> Anchor {
    match position {
        AffixPosition::Prefix => Anchor::Start,
        AffixPosition::Suffix => Anchor::End,
    }
}

fn trim_separator(rest: &str, position: AffixPosition) -> &str {
    match position {
        AffixPosition::Prefix => rest.trim_start_matches('_'),
        AffixPosition::Suffix => rest.trim_end_matches('_'),
    }
}

fn position_word(position: AffixPosition) -> &'static str {
    match position {
        AffixPosition::Prefix => "prefix",
        AffixPosition::Suffix => "suffix",
    }
}

/// Categories 2 and 3: brand series or import affixes that are stripped in
/// place, or flagged for review, according to the brand's rules.
pub fn detect_affix_strips(
    store: &dyn CatalogStore,
    rules: &RuleBook,
    brand: &str,
    position: AffixPosition,
) -> Scan {
    let tree = Tree::new(store);
    let mut scan = Scan::default();
    let brand_rules = rules.brand(brand);
    if brand_rules.in_place(position).next().is_none() {
        return scan;
    }

    for variant in tree.variants(brand, &mut scan) {
        let Some(id) = variant.name() else { continue };
        for rule in brand_rules.in_place(position) {
            let Some(rest) = rule.strip(id) else { continue };
            let rest = trim_separator(rest, position);
            if rest.is_empty() {
                continue;
            }
            let category = if rule.is_import() {
                Category::ImportPrefix
            } else {
                Category::SeriesAffix
            };
            let word = position_word(position);
            let proposal = match rule.behavior() {
                RuleBehavior::Flag => Proposal::new(
                    category,
                    variant.clone(),
                    Fix::Review,
                    format!("Series {word} '{}' may be a product line", rule.affix()),
                ),
                _ => Proposal::new(
                    category,
                    variant.clone(),
                    Fix::Rename {
                        target: variant.with_name(rest),
                        name: NameFix {
                            fragment: rule.affix().to_string(),
                            anchor: anchor(position),
                            pattern: rule.name_pattern().cloned(),
                        },
                    },
                    format!("Strip {word} '{}'", rule.affix()),
                ),
            };
            scan.propose(proposal);
            break;
        }
    }
    scan
}

/// Name of the filament type a product line moves into. A type that merely
/// repeats its material class (`pla` under `PLA`) is replaced by the line.
pub fn product_line_type(line: &str, ty: &str, material: &str, position: AffixPosition) -> String {
    if ty.eq_ignore_ascii_case(material) {
        return line.to_string();
    }
    match position {
        AffixPosition::Prefix => format!("{line}_{ty}"),
        AffixPosition::Suffix => format!("{ty}_{line}"),
    }
}

/// Category 7: product lines embedded in variant ids. Matching variants move
/// into a filament type named after the line, longest affix first.
pub fn detect_product_lines(
    store: &dyn CatalogStore,
    rules: &RuleBook,
    brand: &str,
    position: AffixPosition,
) -> Scan {
    let tree = Tree::new(store);
    let mut scan = Scan::default();
    let brand_rules = rules.brand(brand);
    let lines = brand_rules.product_lines(position);
    if lines.is_empty() {
        return scan;
    }
    let sku = match position {
        AffixPosition::Prefix => brand_rules.sku_pattern(),
        AffixPosition::Suffix => None,
    };

    for variant in tree.variants(brand, &mut scan) {
        let Some(id) = variant.name() else { continue };
        let Some((rule, rest)) = lines
            .iter()
            .find_map(|rule| rule.strip(id).map(|rest| (rule, rest)))
        else {
            continue;
        };
        let mut fragment = rule.affix().to_string();
        let mut rest = trim_separator(rest, position);
        if let Some(found) = sku.and_then(|re| re.find(rest)).filter(|m| m.start() == 0) {
            fragment.push_str(found.as_str());
            rest = trim_separator(&rest[found.end()..], position);
        }
        if rest.is_empty() {
            scan.skip(
                Category::ProductLine,
                format!(
                    "Cat 7: {variant} -> empty after stripping {} '{}'",
                    position_word(position),
                    rule.affix()
                ),
            );
            continue;
        }

        let Some(ty) = variant.parent() else { continue };
        let Some(material) = ty.parent() else { continue };
        let ty_id = ty.name().unwrap_or_default();
        let material_id = material.name().unwrap_or_default();
        let new_type = product_line_type(rule.line(), ty_id, material_id, position);
        if new_type == ty_id {
            continue;
        }
        let type_name = if new_type == rule.line() {
            TypeName::Generated
        } else {
            TypeName::ProductLine {
                line: rule.line().to_string(),
                anchor: anchor(position),
            }
        };
        let target: NodePath = material.join(new_type.as_str()).join(rest);
        scan.propose(Proposal::new(
            Category::ProductLine,
            variant.clone(),
            Fix::Move {
                target,
                type_name,
                name: NameFix {
                    fragment,
                    anchor: anchor(position),
                    pattern: None,
                },
            },
            match position {
                AffixPosition::Prefix => format!("Move to product line filament '{new_type}'"),
                AffixPosition::Suffix => {
                    format!("Move to product line filament '{new_type}' (suffix)")
                }
            },
        ));
    }
    scan
}
