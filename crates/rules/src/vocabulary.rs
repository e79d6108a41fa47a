//! Static word lists the detectors classify names against.

/// Base color words. A filament type named after one of these is a color,
/// not a product.
pub const KNOWN_COLORS: &[&str] = &[
    "amber", "beige", "black", "blue", "bronze", "brown", "charcoal", "clear", "copper", "coral",
    "cream", "cyan", "gold", "gray", "green", "grey", "indigo", "ivory", "lime", "magenta",
    "maroon", "natural", "navy", "olive", "orange", "pink", "purple", "red", "salmon", "scarlet",
    "silver", "teal", "turquoise", "violet", "white", "yellow",
];

/// Words that only ever qualify a color (`neon_cyan`, `galaxy_blue`).
pub const COLOR_MODIFIERS: &[&str] = &[
    "bright", "cherry", "dark", "deep", "galaxy", "hot", "kaoss", "light", "liquid", "luminous",
    "mango", "matte", "midnight", "mojito", "neon", "pale", "pastel",
];

/// Tokens that mark a name as a product rather than a color.
pub const MATERIAL_KEYWORDS: &[&str] = &[
    "abs", "asa", "flexible", "hips", "pa", "pc", "pctg", "peek", "pei", "petg", "pla", "pom",
    "pva", "pvdf", "speed", "tpu",
];

/// Words rendered fully upper-case in generated display names.
pub const UPPERCASE_WORDS: &[&str] = &[
    "3d4000fl", "abs", "asa", "cc", "cf", "emi", "esd", "fme", "fr", "fst1", "gf", "hips", "hs",
    "ht", "mc", "pa", "pa11", "pa12", "pa6", "pbt", "pc", "pctg", "peek", "pei", "pekk", "pet",
    "petg", "pla", "pmuc", "pom", "ppa", "ppe", "pps", "ppsu", "pva", "pvb", "pvdf", "ral", "sc",
    "tpe", "tpi", "tpu", "uv", "v0",
];

/// Connecting words kept lower-case unless they open the name.
pub const LOWERCASE_WORDS: &[&str] = &["a", "and", "in", "of", "or", "the", "to"];

/// Prefix word-sequences that a filament type id can imply without spelling
/// them out: `(prefix words, fragment of the type id)`.
pub const PREFIX_ALIASES: &[(&str, &str)] = &[
    ("hs", "high_speed"),
    ("high_speed", "high_speed"),
    ("glow_in_the_dark", "glow"),
];

/// Variant ids matching any of these are product or grade codes rather than
/// colors.
pub const TECH_SPEC_PATTERNS: &[&str] = &[
    r"^\d+$",
    r"hytrel_",
    r"coexflex_",
    r"ingeo_\d+",
    r"\d+a_flexible",
    r"flexible_\d+a_",
    r"gt_\d+_high_speed_\d+a_",
];

/// Variant ids longer than this are reported for review.
pub const MAX_VARIANT_ID_LEN: usize = 40;

/// Attributes that describe one colorway and never belong on a type document.
pub const VARIANT_SCOPED_FIELDS: &[&str] = &["color_hex"];

/// Documents that describe one colorway and never belong on a type node.
pub const VARIANT_SCOPED_DOCUMENTS: &[&str] = &["sizes.json"];

pub fn is_known_color(word: &str) -> bool {
    KNOWN_COLORS.contains(&word)
}

fn is_color_modifier(word: &str) -> bool {
    COLOR_MODIFIERS.contains(&word)
}

/// True for `blue`, `dark_red`, `mango_mojito_orange` and similar: a known
/// color, optionally preceded only by modifiers or other colors.
pub fn is_color_like(id: &str) -> bool {
    if is_known_color(id) {
        return true;
    }
    let parts: Vec<&str> = id.split('_').collect();
    let Some((last, head)) = parts.split_last() else {
        return false;
    };
    !head.is_empty()
        && is_known_color(last)
        && head
            .iter()
            .all(|part| is_color_modifier(part) || is_known_color(part))
}

pub fn has_material_keyword(id: &str) -> bool {
    id.split('_').any(|part| MATERIAL_KEYWORDS.contains(&part))
}
