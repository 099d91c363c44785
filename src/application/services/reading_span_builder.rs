//! Seed selection and bounded growth of a value's reading span.
//!
//! A span starts at the token nearest to an anchor (to the right on the same
//! line, or below inside the label's gutter), extends rightward along the
//! line, then drops down one line at a time while it stays inside the gutter.
//! Every step respects the token, line and bounding-box caps in
//! [`ExtractionLimits`].

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{
    Anchor, BoundingBox, ClaimedTokens, ExtractionLimits, LayoutConfig, Page, ReadingSpan,
    SpanDirection, TokenIndex,
};

use super::text_normalizer::sanitize_value_text;

static CLAUSE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.;:]\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq)]
struct SeedCandidate {
    index: TokenIndex,
    cost: f64,
    tiebreak: f64,
}

pub struct ReadingSpanBuilder<'a> {
    page: &'a Page,
    layout: &'a LayoutConfig,
    limits: &'a ExtractionLimits,
    label_tokens: BTreeSet<TokenIndex>,
}

impl<'a> ReadingSpanBuilder<'a> {
    /// `anchors` are the page's kept anchors; none of their label tokens is
    /// ever part of a span.
    pub fn new(
        page: &'a Page,
        layout: &'a LayoutConfig,
        limits: &'a ExtractionLimits,
        anchors: &[Anchor],
    ) -> Self {
        let label_tokens = anchors
            .iter()
            .flat_map(|a| a.label_span.iter().copied())
            .collect();
        Self {
            page,
            layout,
            limits,
            label_tokens,
        }
    }

    fn is_available(&self, index: TokenIndex, claimed: &ClaimedTokens) -> bool {
        !self.label_tokens.contains(&index) && !claimed.contains(index)
    }

    /// Picks the starting token for `anchor`, preferring the right neighbour
    /// unless the one below is clearly cheaper.
    pub fn choose_seed(
        &self,
        anchor: &Anchor,
        claimed: &ClaimedTokens,
    ) -> Option<(TokenIndex, SpanDirection)> {
        let right = self.seed_right(anchor, claimed);
        let down = self.seed_down(anchor, claimed);
        match (right, down) {
            (Some(r), Some(d)) if r.cost <= d.cost + self.limits.seed_right_preference => {
                Some((r.index, SpanDirection::Right))
            }
            (_, Some(d)) => Some((d.index, SpanDirection::Down)),
            (Some(r), None) => Some((r.index, SpanDirection::Right)),
            (None, None) => None,
        }
    }

    fn seed_right(&self, anchor: &Anchor, claimed: &ClaimedTokens) -> Option<SeedCandidate> {
        let cut_x = anchor.label_bbox.x1 + self.limits.seed_right_clearance;
        (0..self.page.len())
            .filter(|&i| self.is_available(i, claimed))
            .filter_map(|i| {
                let c = self.page.center(i);
                let distance = c.distance(&anchor.point);
                (c.x > cut_x
                    && (c.y - anchor.point.y).abs() <= self.layout.y_band
                    && distance <= self.layout.radius)
                    .then_some(SeedCandidate {
                        index: i,
                        cost: c.x - anchor.point.x,
                        tiebreak: distance,
                    })
            })
            .min_by(cheapest)
    }

    fn seed_down(&self, anchor: &Anchor, claimed: &ClaimedTokens) -> Option<SeedCandidate> {
        let max_drop = self.limits.seed_down_bands * self.layout.y_band;
        let gutter_center = anchor.gutter.center();
        (0..self.page.len())
            .filter(|&i| self.is_available(i, claimed))
            .filter_map(|i| {
                let c = self.page.center(i);
                let dy = c.y - anchor.point.y;
                (dy > 0.0
                    && dy <= max_drop
                    && anchor.gutter.contains(c.x, self.limits.gutter_slack)
                    && c.distance(&anchor.point) <= self.layout.radius)
                    .then_some(SeedCandidate {
                        index: i,
                        cost: dy + 0.5 * (c.x - gutter_center).abs(),
                        tiebreak: dy,
                    })
            })
            .min_by(cheapest)
    }

    /// Grows the span for `anchor` and returns it together with the claimed
    /// set, extended by the span's tokens.
    pub fn build(
        &self,
        anchor: &Anchor,
        anchors: &[Anchor],
        claimed: ClaimedTokens,
    ) -> (Option<ReadingSpan>, ClaimedTokens) {
        let Some((seed, direction)) = self.choose_seed(anchor, &claimed) else {
            return (None, claimed);
        };
        if self
            .page
            .token(seed)
            .bbox
            .exceeds(self.limits.max_span_width, self.limits.max_span_height)
        {
            tracing::trace!(key = %anchor.key, seed, "Seed exceeds span bounds");
            return (None, claimed);
        }

        let blockers: Vec<BoundingBox> = anchors
            .iter()
            .filter(|other| other.label_span != anchor.label_span)
            .map(|other| other.label_bbox)
            .collect();

        let mut growth = Growth {
            builder: self,
            claimed: &claimed,
            blockers: &blockers,
            used: vec![seed],
            rightward: 0,
        };
        growth.grow(anchor);
        let mut tokens = growth.used;

        self.page.sort_reading_order(&mut tokens);
        let Some(bbox) = self.page.bbox_of(&tokens) else {
            return (None, claimed);
        };
        let text = sanitize_value_text(&self.page.join_text(&tokens));
        let claimed = claimed.claim(&tokens);
        let span = ReadingSpan {
            seed,
            direction,
            tokens,
            bbox,
            text,
        };
        (Some(span), claimed)
    }
}

fn cheapest(a: &SeedCandidate, b: &SeedCandidate) -> std::cmp::Ordering {
    a.cost
        .total_cmp(&b.cost)
        .then(a.tiebreak.total_cmp(&b.tiebreak))
}

struct Growth<'b, 'a> {
    builder: &'b ReadingSpanBuilder<'a>,
    claimed: &'b ClaimedTokens,
    blockers: &'b [BoundingBox],
    used: Vec<TokenIndex>,
    rightward: usize,
}

impl Growth<'_, '_> {
    fn page(&self) -> &Page {
        self.builder.page
    }

    fn limits(&self) -> &ExtractionLimits {
        self.builder.limits
    }

    fn candidate(&self, index: TokenIndex) -> bool {
        if self.used.contains(&index) || !self.builder.is_available(index, self.claimed) {
            return false;
        }
        let bbox = self.page().token(index).bbox;
        !self
            .blockers
            .iter()
            .any(|b| bbox.intersects_padded(b, self.limits().blocker_pad))
    }

    fn fits_with(&self, index: TokenIndex) -> bool {
        if self.used.len() + 1 > self.limits().max_span_tokens {
            return false;
        }
        let mut extended = self.used.clone();
        extended.push(index);
        self.page()
            .bbox_of(&extended)
            .is_some_and(|b| !b.exceeds(self.limits().max_span_width, self.limits().max_span_height))
    }

    fn grow(&mut self, anchor: &Anchor) {
        let seed = self.used[0];
        self.extend_right(seed);

        let gutter_center = anchor.gutter.center();
        let mut extra_lines = 0;
        while self.used.len() <= self.limits().absolute_token_cap {
            let Some(last_y) = self
                .used
                .iter()
                .map(|&i| self.page().center(i).y)
                .max_by(f64::total_cmp)
            else {
                break;
            };

            let next_line = (0..self.page().len())
                .filter(|&i| self.candidate(i))
                .filter(|&i| {
                    let c = self.page().center(i);
                    let dy = c.y - last_y;
                    dy > 0.0
                        && dy <= self.builder.layout.line_jump
                        && anchor.gutter.contains(c.x, 0.0)
                })
                .min_by(|&a, &b| {
                    let (ca, cb) = (self.page().center(a), self.page().center(b));
                    (ca.x - gutter_center)
                        .abs()
                        .total_cmp(&(cb.x - gutter_center).abs())
                        .then(ca.y.total_cmp(&cb.y))
                });
            let Some(start) = next_line else {
                break;
            };
            if extra_lines >= self.limits().max_extra_lines
                || self.looks_like_heading(start)
                || !self.fits_with(start)
            {
                break;
            }

            self.used.push(start);
            extra_lines += 1;
            self.extend_right(start);
        }
    }

    fn extend_right(&mut self, from: TokenIndex) {
        let mut current = from;
        let mut on_line = 0;
        loop {
            let current_token = self.page().token(current);
            let current_y = current_token.center().y;
            let current_x1 = current_token.bbox.x1;

            let next = (0..self.page().len())
                .filter(|&i| self.candidate(i))
                .filter_map(|i| {
                    let t = self.page().token(i);
                    let gap = t.bbox.x0 - current_x1;
                    ((t.center().y - current_y).abs() <= self.builder.layout.y_band
                        && t.bbox.x0 > current_x1
                        && gap <= self.builder.layout.gap_max)
                        .then_some((i, gap, t.bbox.x0))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)));
            let Some((next, _, _)) = next else {
                break;
            };
            if on_line >= self.limits().max_tokens_per_line
                || self.rightward >= self.limits().max_rightward_tokens
                || CLAUSE_END.is_match(&current_token.text)
                || !self.fits_with(next)
            {
                break;
            }

            self.used.push(next);
            current = next;
            on_line += 1;
            self.rightward += 1;
        }
    }

    /// Tall, digit-free, mostly uppercase token.
    fn looks_like_heading(&self, index: TokenIndex) -> bool {
        let token = self.page().token(index);
        let text = token.text.as_str();
        if text.is_empty() || text.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }
        let letters = text.chars().filter(|c| c.is_alphabetic()).count();
        let upper = text.chars().filter(|c| c.is_uppercase()).count();
        let caps_ratio = upper as f64 / letters.max(1) as f64;
        caps_ratio > self.limits().heading_caps_ratio
            && token.height() > self.limits().heading_height_factor * self.builder.layout.median_height
    }
}
