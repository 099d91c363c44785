use std::collections::{BTreeSet, HashSet};

use crate::domain::{Anchor, AnchorOrigin, ExtractionLimits, Page, TokenIndex};

use super::text_normalizer::{dotted_abbreviation, label_variants, normalize_label};

/// Finds the printed label of `key` on `page` by sliding token windows over
/// the normalized token stream.
pub fn locate_schema_anchor(key: &str, page: &Page, limits: &ExtractionLimits) -> Option<Anchor> {
    let variants = matchable_variants(key);
    if variants.is_empty() {
        return None;
    }
    let clean: Vec<(TokenIndex, String)> = page
        .tokens
        .iter()
        .enumerate()
        .map(|(i, t)| (i, normalize_label(&t.text)))
        .filter(|(_, t)| !t.is_empty())
        .collect();
    if clean.is_empty() {
        return None;
    }

    let containable: Vec<&String> = variants
        .iter()
        .filter(|v| v.chars().count() >= limits.min_containment_variant_len)
        .collect();

    let mut best: Option<(WindowRank, TokenIndex, TokenIndex)> = None;
    for window_len in (1..=limits.max_label_window.min(clean.len())).rev() {
        for window in clean.windows(window_len) {
            let spaced = window
                .iter()
                .map(|(_, t)| t.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let joined: String = window.iter().map(|(_, t)| t.as_str()).collect();

            let exact = variants.contains(&spaced) || variants.contains(&joined);
            let contains = containable
                .iter()
                .any(|v| spaced.contains(v.as_str()) || joined.contains(v.as_str()));
            if !exact && !contains {
                continue;
            }

            let rank = WindowRank {
                exact,
                window_len,
                text_len: spaced.len().max(joined.len()),
            };
            if best.as_ref().is_none_or(|(b, _, _)| rank > *b) {
                best = Some((rank, window[0].0, window[window_len - 1].0));
            }
        }
    }

    let (rank, first, last) = best?;
    tracing::trace!(key, first, last, exact = rank.exact, "Schema label matched");
    let span: BTreeSet<TokenIndex> = (first..=last).collect();
    Anchor::over_label(
        key,
        page,
        span,
        AnchorOrigin::Schema,
        limits.schema_anchor_score,
        limits,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct WindowRank {
    exact: bool,
    window_len: usize,
    text_len: usize,
}

fn matchable_variants(key: &str) -> HashSet<String> {
    let abbreviation = dotted_abbreviation(key);
    label_variants(key)
        .into_iter()
        .chain([abbreviation.replace('.', ""), abbreviation])
        .map(|v| normalize_label(&v))
        .filter(|v| !v.is_empty())
        .collect()
}
