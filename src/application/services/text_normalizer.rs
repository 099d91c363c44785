//! Canonical text forms used to match field keys against printed labels.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static PUNCT_OR_SYMBOL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{P}\p{S}]+").unwrap());
static TRAILING_DOTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.+$").unwrap());
static VOWELS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[aeiouAEIOU]").unwrap());
static ALNUM_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").unwrap());

static LEADING_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[:\-–—]\s*").unwrap());
static LABEL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÀ-ÿ0-9 ]{1,30}\s*:\s*").unwrap());
static UP_TO_COLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^:]*:\s*").unwrap());

pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Diacritics stripped, lowercased, whitespace collapsed.
pub fn normalize_text(s: &str) -> String {
    collapse_whitespace(&strip_diacritics(s).to_lowercase())
}

/// Like [`normalize_text`] but punctuation and symbols become spaces.
/// This is the form page tokens are compared in.
pub fn normalize_label(s: &str) -> String {
    let plain = strip_diacritics(s);
    let spaced = PUNCT_OR_SYMBOL.replace_all(&plain, " ");
    collapse_whitespace(&spaced).to_lowercase()
}

/// `dataNascimento` and `data_nascimento` both become `data Nascimento` /
/// `data nascimento`.
pub fn split_key_words(key: &str) -> String {
    let spaced = CAMEL_BOUNDARY.replace_all(key, "$1 $2").replace('_', " ");
    collapse_whitespace(&spaced)
}

pub fn key_words(key: &str) -> Vec<String> {
    normalize_text(&split_key_words(key))
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn consonant_skeleton(s: &str) -> String {
    VOWELS.replace_all(s, "").into_owned()
}

fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n.max(1)).collect()
}

fn dotted(words: &[String]) -> Vec<String> {
    words.iter().map(|w| format!("{w}.")).collect()
}

/// Every printed form a field key might plausibly take, longest first.
///
/// Pure: the same key always yields the same list. Equal-length variants are
/// ordered lexicographically.
pub fn label_variants(key: &str) -> Vec<String> {
    let parts = key_words(key);
    let Some(first) = parts.first() else {
        return Vec::new();
    };

    let mut variants: BTreeSet<String> = BTreeSet::new();
    let mut add_forms = |words: &[String]| {
        variants.insert(words.join(" "));
        variants.insert(words.concat());
    };

    add_forms(&parts);

    let skeleton: Vec<String> = parts
        .iter()
        .map(|p| consonant_skeleton(p))
        .filter(|p| !p.is_empty())
        .collect();
    add_forms(&skeleton);

    for n in [4, 3] {
        let prefixes: Vec<String> = parts.iter().map(|p| prefix(p, n)).collect();
        add_forms(&prefixes);
        add_forms(&dotted(&prefixes));
    }
    add_forms(&dotted(&parts));

    let first_prefix = prefix(first, 3);
    for single in [
        first.clone(),
        format!("{first}."),
        first_prefix.clone(),
        format!("{first_prefix}."),
        prefix(&consonant_skeleton(first), 3),
    ] {
        variants.insert(single);
    }

    let mut out: Vec<String> = variants
        .into_iter()
        .map(|v| TRAILING_DOTS.replace(&collapse_whitespace(&v), ".").into_owned())
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    out.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    out
}

/// The 4-letter dotted abbreviation, e.g. `data_nascimento` → `data. nasc.`.
pub fn dotted_abbreviation(key: &str) -> String {
    key_words(key)
        .iter()
        .map(|p| format!("{}.", prefix(p, 4)))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn alnum_words(s: &str) -> HashSet<String> {
    ALNUM_WORD
        .find_iter(&normalize_text(s))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Removes a leading separator and up to two leading `label:` fragments.
pub fn sanitize_value_text(text: &str) -> String {
    let mut s = LEADING_SEPARATOR.replace(text.trim(), "").into_owned();
    for _ in 0..2 {
        if LABEL_PREFIX.is_match(&s) {
            s = UP_TO_COLON.replace(&s, "").into_owned();
        }
    }
    s.trim().to_string()
}

/// At most `max_chars` characters, cut on a char boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Keeps the first `head` and last `tail` characters joined by `separator`
/// when `s` is longer than `head + tail`.
pub fn head_tail(s: &str, head: usize, tail: usize, separator: &str) -> String {
    let total = s.chars().count();
    if total <= head + tail {
        return s.to_string();
    }
    let head_part = truncate_chars(s, head);
    let tail_start = s
        .char_indices()
        .nth(total - tail)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    format!("{head_part}{separator}{}", &s[tail_start..])
}
