use std::cmp::Ordering;

use crate::domain::{Anchor, ExtractionLimits};

/// Schema anchors first, then by score, then top-to-bottom, left-to-right.
fn priority(a: &Anchor, b: &Anchor) -> Ordering {
    b.origin
        .is_schema()
        .cmp(&a.origin.is_schema())
        .then(b.score.total_cmp(&a.score))
        .then(a.point.y.total_cmp(&b.point.y))
        .then(a.point.x.total_cmp(&b.point.x))
}

/// Drops every anchor that sits too close to, overlaps, or shares label
/// tokens with a higher-priority one.
pub fn resolve_conflicts(mut anchors: Vec<Anchor>, limits: &ExtractionLimits) -> Vec<Anchor> {
    anchors.sort_by(priority);

    let mut kept: Vec<Anchor> = Vec::with_capacity(anchors.len());
    for anchor in anchors {
        let conflict = kept.iter().find(|k| {
            k.point.distance(&anchor.point) < limits.min_anchor_distance
                || k.label_bbox.iou(&anchor.label_bbox) > limits.max_anchor_iou
                || k.shares_label_tokens(&anchor)
        });
        match conflict {
            Some(winner) => {
                tracing::trace!(dropped = %anchor.key, kept = %winner.key, "Anchor conflict");
            }
            None => kept.push(anchor),
        }
    }
    kept
}
