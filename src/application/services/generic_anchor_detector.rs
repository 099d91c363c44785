use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Anchor, AnchorOrigin, ExtractionLimits, LayoutConfig, Page, TokenIndex};

use super::text_normalizer::{alnum_words, split_key_words};

static ABBREVIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-zÀ-ÿ]{1,4}\.)+$").unwrap());
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{3,}").unwrap());
static ALNUM_CHAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-zÀ-ÿ0-9]").unwrap());

pub fn is_abbreviation(token: &str) -> bool {
    ABBREVIATION.is_match(token.trim())
}

/// Short, digit-poor text that ends in a colon, carries an abbreviation, or is
/// a capitalized run of at most three words.
pub fn looks_like_label(text: &str, limits: &ExtractionLimits) -> bool {
    let s = text.trim();
    if s.is_empty() || s.chars().count() > limits.generic_max_label_chars {
        return false;
    }
    if DIGIT_RUN.is_match(s) {
        return false;
    }
    if s.ends_with(':') {
        return true;
    }
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.iter().any(|w| is_abbreviation(w)) {
        return true;
    }
    (1..=3).contains(&words.len())
        && words
            .iter()
            .any(|w| w.chars().next().is_some_and(char::is_uppercase))
}

/// Label-like runs anywhere on the page, scored and thinned so no two kept
/// candidates sit closer than the minimum anchor distance.
pub fn detect_generic_anchors(
    page: &Page,
    layout: &LayoutConfig,
    limits: &ExtractionLimits,
) -> Vec<Anchor> {
    let n = page.len();
    let mut candidates = Vec::new();

    for start in 0..n {
        let start_y = page.center(start).y;
        for run_len in 1..=limits.generic_max_run {
            let end = start + run_len - 1;
            if end >= n || (page.center(end).y - start_y).abs() > layout.y_band {
                break;
            }
            let text = (start..=end)
                .map(|i| page.token(i).text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let text = text.trim();
            if !looks_like_label(text, limits) {
                continue;
            }

            let label = text.trim_end_matches([' ', ':']).to_string();
            let span: BTreeSet<TokenIndex> = (start..=end).collect();
            let Some(anchor) = Anchor::over_label(
                label.clone(),
                page,
                span,
                AnchorOrigin::Generic(label),
                0.0,
                limits,
            ) else {
                continue;
            };

            let score = label_score(text, &anchor, page, layout);
            if score >= limits.generic_min_score {
                candidates.push(Anchor {
                    score: f64::from(score),
                    ..anchor
                });
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.point.y.total_cmp(&b.point.y))
            .then(a.point.x.total_cmp(&b.point.x))
    });

    let mut kept: Vec<Anchor> = Vec::new();
    for candidate in candidates {
        if kept
            .iter()
            .all(|k| k.point.distance(&candidate.point) >= limits.min_anchor_distance)
        {
            kept.push(candidate);
        }
    }
    tracing::debug!(page = page.number, candidates = kept.len(), "Generic label candidates");
    kept
}

fn label_score(text: &str, anchor: &Anchor, page: &Page, layout: &LayoutConfig) -> u32 {
    let mut score = 0;
    if text.ends_with(':') {
        score += 1;
    }
    if text.split_whitespace().any(is_abbreviation) {
        score += 1;
    }
    if right_neighbour(anchor, page, layout).is_some_and(|k| has_alnum(page, k)) {
        score += 1;
    }
    if lower_neighbour(anchor, page).is_some_and(|k| has_alnum(page, k)) {
        score += 1;
    }
    if anchor.label_span.iter().any(|&i| page.token(i).bold) {
        score += 1;
    }
    if (2..=10).contains(&text.chars().count()) {
        score += 1;
    }
    score
}

fn has_alnum(page: &Page, index: TokenIndex) -> bool {
    ALNUM_CHAR.is_match(&page.token(index).text)
}

/// Neighbours are measured from the centre of the label box, not from the
/// token centroid.
fn right_neighbour(anchor: &Anchor, page: &Page, layout: &LayoutConfig) -> Option<TokenIndex> {
    let origin = anchor.label_bbox.center();
    (0..page.len())
        .filter(|i| !anchor.label_span.contains(i))
        .filter_map(|i| {
            let c = page.center(i);
            let dx = c.x - origin.x;
            let dy = c.y - origin.y;
            (dx > 0.0 && dy.abs() <= layout.y_band && c.distance(&origin) <= layout.radius)
                .then_some((i, dx))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

fn lower_neighbour(anchor: &Anchor, page: &Page) -> Option<TokenIndex> {
    let origin_y = anchor.label_bbox.center().y;
    (0..page.len())
        .filter(|i| !anchor.label_span.contains(i))
        .filter_map(|i| {
            let c = page.center(i);
            let dy = c.y - origin_y;
            (dy > 0.0 && anchor.gutter.contains(c.x, 0.0)).then_some((i, dy))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Jaccard overlap of the alphanumeric words of a field key and a label.
pub fn label_similarity(key: &str, label: &str) -> f64 {
    let key_words = alnum_words(&split_key_words(key));
    let label_words = alnum_words(label);
    let union = key_words.union(&label_words).count();
    let shared = key_words.intersection(&label_words).count();
    shared as f64 / union.max(1) as f64
}

/// Gives each missing key the best-matching generic candidate, if it clears
/// the threshold. Richer labels and higher scores nudge the match upwards.
pub fn assign_generic_anchors(
    missing_keys: &[String],
    candidates: &[Anchor],
    limits: &ExtractionLimits,
) -> Vec<Anchor> {
    let threshold = if candidates.len() < limits.sparse_candidate_count {
        limits.fuzzy_threshold_sparse
    } else {
        limits.fuzzy_threshold
    };

    let mut assigned = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for key in missing_keys {
        if !seen.insert(key.as_str()) {
            continue;
        }
        let mut best: Option<(f64, &Anchor)> = None;
        for candidate in candidates {
            let label = candidate_label(candidate);
            let richness = 0.05 * (label.split_whitespace().count() as f64 - 1.0)
                + 0.01 * candidate.score;
            let similarity = label_similarity(key, label) + richness;
            if best.is_none_or(|(s, _)| similarity > s) {
                best = Some((similarity, candidate));
            }
        }
        let Some((similarity, candidate)) = best else {
            continue;
        };
        if similarity >= threshold {
            tracing::debug!(
                key = %key,
                label = candidate_label(candidate),
                similarity,
                "Generic label assigned"
            );
            assigned.push(candidate.assigned_to(key.clone()));
        }
    }
    assigned
}

fn candidate_label(anchor: &Anchor) -> &str {
    match &anchor.origin {
        AnchorOrigin::Generic(label) => label,
        AnchorOrigin::Schema => &anchor.key,
    }
}
