use crate::vocabulary::TECH_SPEC_PATTERNS;
use crate::{Result, RulesError};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Rule tables shipped with the binary.
pub const DEFAULT_RULES: &str = include_str!("../assets/default_rules.toml");

/// End of a variant id an affix rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffixPosition {
    Prefix,
    Suffix,
}

/// What to do with a variant whose id carries the affix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleBehavior {
    /// Rename in place with the affix removed.
    Strip,
    /// Move into a product-line filament type named after the affix.
    StructuralMove,
    /// Report for manual review only.
    Flag,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRuleFile {
    #[serde(default)]
    brands: BTreeMap<String, RawBrand>,
    #[serde(default)]
    type_names: BTreeMap<String, String>,
    #[serde(default)]
    variant_names: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBrand {
    #[serde(default)]
    sku_pattern: Option<String>,
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    affix: String,
    position: AffixPosition,
    behavior: RuleBehavior,
    #[serde(default)]
    name_pattern: Option<String>,
    #[serde(default)]
    import: bool,
}

/// One compiled per-brand affix rule.
#[derive(Debug, Clone)]
pub struct AffixRule {
    affix: String,
    position: AffixPosition,
    behavior: RuleBehavior,
    name_pattern: Option<Regex>,
    import: bool,
}

impl AffixRule {
    pub fn affix(&self) -> &str {
        &self.affix
    }

    pub fn position(&self) -> AffixPosition {
        self.position
    }

    pub fn behavior(&self) -> RuleBehavior {
        self.behavior
    }

    /// Configured display-name cleanup, if any.
    pub fn name_pattern(&self) -> Option<&Regex> {
        self.name_pattern.as_ref()
    }

    /// Marks a prefix left behind by a reseller import rather than a series.
    pub fn is_import(&self) -> bool {
        self.import
    }

    /// What is left of `id` once the affix is removed, or `None` when the
    /// affix does not apply. The remainder may be empty.
    pub fn strip<'a>(&self, id: &'a str) -> Option<&'a str> {
        match self.position {
            AffixPosition::Prefix => id.strip_prefix(self.affix.as_str()),
            AffixPosition::Suffix => id.strip_suffix(self.affix.as_str()),
        }
    }

    /// Product-line id carried by the affix: `850_` → `850`.
    pub fn line(&self) -> &str {
        self.affix.trim_matches('_')
    }
}

/// Compiled rules for a single brand.
#[derive(Debug, Clone, Default)]
pub struct BrandRules {
    rules: Vec<AffixRule>,
    sku_pattern: Option<Regex>,
}

impl BrandRules {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[AffixRule] {
        &self.rules
    }

    /// In-place rules (`strip` or `flag`) for one end, in file order.
    pub fn in_place(&self, position: AffixPosition) -> impl Iterator<Item = &AffixRule> {
        self.rules.iter().filter(move |rule| {
            rule.position == position && rule.behavior != RuleBehavior::StructuralMove
        })
    }

    /// Product-line rules for one end, longest affix first.
    pub fn product_lines(&self, position: AffixPosition) -> Vec<&AffixRule> {
        let mut lines: Vec<&AffixRule> = self
            .rules
            .iter()
            .filter(|rule| {
                rule.position == position && rule.behavior == RuleBehavior::StructuralMove
            })
            .collect();
        lines.sort_by(|a, b| b.affix.len().cmp(&a.affix.len()));
        lines
    }

    /// SKU code stripped after a product-line prefix (`bla_01_`).
    pub fn sku_pattern(&self) -> Option<&Regex> {
        self.sku_pattern.as_ref()
    }
}

/// Immutable rule tables for a run: per-brand affix rules, display-name
/// overrides and the technical-code patterns.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    brands: BTreeMap<String, BrandRules>,
    type_names: BTreeMap<String, String>,
    variant_names: BTreeMap<String, String>,
    tech_specs: Vec<Regex>,
    no_rules: BrandRules,
}

impl RuleBook {
    /// The embedded default tables.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(DEFAULT_RULES)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RulesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let book = Self::from_toml_str(&text)?;
        log::info!(
            "Loaded rules for {} brands from {}",
            book.brands.len(),
            path.display()
        );
        Ok(book)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawRuleFile = toml::from_str(text)?;

        let mut brands = BTreeMap::new();
        for (brand, raw_brand) in raw.brands {
            let compiled = compile_brand(&brand, raw_brand)?;
            brands.insert(brand, compiled);
        }

        let tech_specs = TECH_SPEC_PATTERNS
            .iter()
            .map(|pattern| compile("<vocabulary>", pattern))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            brands,
            type_names: raw.type_names,
            variant_names: raw.variant_names,
            tech_specs,
            no_rules: BrandRules::default(),
        })
    }

    /// Rules for `brand`; empty when none are configured.
    pub fn brand(&self, brand: &str) -> &BrandRules {
        self.brands.get(brand).unwrap_or(&self.no_rules)
    }

    pub fn configured_brands(&self) -> impl Iterator<Item = &str> {
        self.brands.keys().map(String::as_str)
    }

    /// Explicit display name for a filament type id.
    pub fn type_name(&self, id: &str) -> Option<&str> {
        self.type_names.get(id).map(String::as_str)
    }

    /// Explicit display name for a variant id.
    pub fn variant_name(&self, id: &str) -> Option<&str> {
        self.variant_names.get(id).map(String::as_str)
    }

    /// First technical-code pattern that matches `variant_id`.
    pub fn tech_spec_match(&self, variant_id: &str) -> Option<&Regex> {
        self.tech_specs.iter().find(|re| re.is_match(variant_id))
    }
}

fn compile(brand: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| RulesError::Pattern {
        brand: brand.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_brand(brand: &str, raw: RawBrand) -> Result<BrandRules> {
    let mut rules = Vec::with_capacity(raw.rules.len());
    for rule in raw.rules {
        if rule.affix.trim_matches('_').is_empty() {
            return Err(RulesError::invalid_rule(brand, "affix must contain a word"));
        }
        if rules
            .iter()
            .any(|seen: &AffixRule| seen.affix == rule.affix && seen.position == rule.position)
        {
            return Err(RulesError::invalid_rule(
                brand,
                format!("duplicate affix {:?}", rule.affix),
            ));
        }
        let name_pattern = rule
            .name_pattern
            .as_deref()
            .map(|pattern| compile(brand, pattern))
            .transpose()?;
        rules.push(AffixRule {
            affix: rule.affix,
            position: rule.position,
            behavior: rule.behavior,
            name_pattern,
            import: rule.import,
        });
    }

    let sku_pattern = raw
        .sku_pattern
        .as_deref()
        .map(|pattern| compile(brand, pattern))
        .transpose()?;

    Ok(BrandRules { rules, sku_pattern })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_rules_compile() {
        let book = RuleBook::builtin().unwrap();
        assert!(book.configured_brands().count() > 10);
        assert!(book.brand("no_such_brand").is_empty());
        assert_eq!(book.type_name("850"), Some("850"));
    }

    #[test]
    fn product_lines_are_longest_first() {
        let book = RuleBook::from_toml_str(
            r#"
            [brands.dremel]
            rules = [
              { affix = "digilab_", position = "prefix", behavior = "structural_move" },
              { affix = "digilab_eco_", position = "prefix", behavior = "structural_move" },
              { affix = "nav_01_", position = "prefix", behavior = "strip" },
            ]
            "#,
        )
        .unwrap();
        let lines: Vec<&str> = book
            .brand("dremel")
            .product_lines(AffixPosition::Prefix)
            .iter()
            .map(|rule| rule.affix())
            .collect();
        assert_eq!(lines, vec!["digilab_eco_", "digilab_"]);
        assert_eq!(book.brand("dremel").in_place(AffixPosition::Prefix).count(), 1);
    }

    #[test]
    fn strip_and_line_follow_position() {
        let book = RuleBook::from_toml_str(
            r#"
            [brands.sainsmart]
            rules = [{ affix = "_92a_flexible", position = "suffix", behavior = "structural_move" }]
            "#,
        )
        .unwrap();
        let rule = &book.brand("sainsmart").rules()[0];
        assert_eq!(rule.strip("black_92a_flexible"), Some("black"));
        assert_eq!(rule.strip("92a_flexible_black"), None);
        assert_eq!(rule.line(), "92a_flexible");
    }

    #[test]
    fn rejects_bad_patterns_and_unknown_fields() {
        let err = RuleBook::from_toml_str(
            r#"
            [[brands.acme.rules]]
            affix = "hf_"
            position = "prefix"
            behavior = "strip"
            name_pattern = "^(HF"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RulesError::Pattern { .. }));

        let err = RuleBook::from_toml_str(
            r#"
            [brands.acme]
            rules = [{ affix = "hf_", position = "middle", behavior = "strip" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RulesError::Parse(_)));

        let err = RuleBook::from_toml_str(
            r#"
            [brands.acme]
            rules = [{ affix = "__", position = "prefix", behavior = "strip" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RulesError::InvalidRule { .. }));
    }

    #[test]
    fn load_reads_rule_file_from_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("rules.toml");
        std::fs::write(
            &path,
            r#"
            [brands.sakata_3d]
            rules = [{ affix = "850_", position = "prefix", behavior = "flag" }]

            [type_names]
            "850" = "850 Series"
            "#,
        )
        .unwrap();

        let book = RuleBook::load(&path).unwrap();
        assert_eq!(book.configured_brands().collect::<Vec<_>>(), vec!["sakata_3d"]);
        assert_eq!(book.brand("sakata_3d").rules()[0].behavior(), RuleBehavior::Flag);
        assert_eq!(book.type_name("850"), Some("850 Series"));

        std::fs::write(
            &path,
            r#"
            [brands.acme]
            rules = [{ affix = "_", position = "suffix", behavior = "strip" }]
            "#,
        )
        .unwrap();
        assert!(matches!(
            RuleBook::load(&path).unwrap_err(),
            RulesError::InvalidRule { .. }
        ));

        let err = RuleBook::load(&temp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, RulesError::Read { .. }));
    }

    #[test]
    fn tech_spec_patterns_match_codes() {
        let book = RuleBook::default();
        assert!(book.tech_spec_match("7016").is_none());

        let book = RuleBook::from_toml_str("").unwrap();
        assert_eq!(book.tech_spec_match("7016").map(Regex::as_str), Some(r"^\d+$"));
        assert!(book.tech_spec_match("87a_flexible_black").is_some());
        assert!(book.tech_spec_match("black").is_none());
    }
}
