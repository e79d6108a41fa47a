//! Display-name generation and cleanup.

use crate::vocabulary::{LOWERCASE_WORDS, UPPERCASE_WORDS};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Which end of a name an affix is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    End,
}

/// Title-case the way most catalog names were originally generated: a
/// letter is upper-cased when it follows a non-letter, so `95a` → `95A`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// `dark_blue` → `Dark Blue`. This is the baseline a variant name is
/// compared against when looking for leftover prefix text.
pub fn slug_title(slug: &str) -> String {
    title_case(&slug.replace('_', " "))
}

/// Display name for a node id: material and technical words upper-cased,
/// connecting words lower-cased after the first word, the rest title-cased.
///
/// `95a_tpu` → `95A TPU`, `glow_in_the_dark_pla` → `Glow in the Dark PLA`.
pub fn display_name(slug: &str) -> String {
    slug.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if UPPERCASE_WORDS.contains(&lower.as_str()) {
                word.to_uppercase()
            } else if i > 0 && LOWERCASE_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                title_case(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

static EMPTY_PARENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*\)").expect("valid empty-parens regex"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

/// Remove `()` remnants, collapse runs of whitespace, trim.
pub fn tidy_name(name: &str) -> String {
    let without_parens = EMPTY_PARENS.replace_all(name, "");
    WHITESPACE_RUN
        .replace_all(&without_parens, " ")
        .trim()
        .to_string()
}

/// Strip a leading dash separator left behind after removing a prefix.
pub fn trim_leading_dash(text: &str) -> &str {
    let trimmed = text.trim_start();
    match trimmed.strip_prefix(['-', '\u{2013}', '\u{2014}']) {
        Some(rest) => rest.trim_start(),
        None => text,
    }
}

/// Case-insensitive pattern matching the slug `fragment` spelled out in a
/// display name, with each `_` loosened to any run of spaces, underscores,
/// hyphens, dots, `+` or `*`.
///
/// There is no word boundary after the last word, so fragment `pro_` also
/// eats the start of `Professional Black`, leaving `fessional Black`.
pub fn affix_name_pattern(fragment: &str, anchor: Anchor) -> Option<Regex> {
    const SEP: &str = r"[\s_+\-.*]*";
    let words: Vec<String> = fragment
        .split('_')
        .filter(|word| !word.is_empty())
        .map(regex::escape)
        .collect();
    if words.is_empty() {
        return None;
    }
    let body = words.join(SEP);
    let pattern = match anchor {
        Anchor::Start => format!("^{body}{SEP}"),
        Anchor::End => format!("{SEP}{body}$"),
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| log::warn!("Cannot build name pattern for {fragment:?}: {err}"))
        .ok()
}

/// Remove `pattern` once from `name` and tidy the rest. Returns `None` when
/// nothing meaningful is left.
pub fn strip_name_pattern(name: &str, pattern: &Regex) -> Option<String> {
    let tidy = tidy_name(name);
    let stripped = pattern.replace(&tidy, "");
    let cleaned = tidy_name(trim_leading_dash(&stripped));
    (!cleaned.is_empty()).then_some(cleaned)
}
