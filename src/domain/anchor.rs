use std::collections::BTreeSet;
use std::fmt;

use super::bounding_box::{BoundingBox, Point};
use super::extraction_limits::ExtractionLimits;
use super::page::Page;
use super::token::TokenIndex;

/// Where an anchor came from: a direct match on the field key, or a
/// page-wide label candidate fuzzily assigned to the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorOrigin {
    Schema,
    Generic(String),
}

impl AnchorOrigin {
    pub fn is_schema(&self) -> bool {
        matches!(self, AnchorOrigin::Schema)
    }
}

impl fmt::Display for AnchorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorOrigin::Schema => f.write_str("schema"),
            AnchorOrigin::Generic(label) => write!(f, "generic:{label}"),
        }
    }
}

/// Vertical column under a label's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gutter {
    pub x0: f64,
    pub x1: f64,
}

impl Gutter {
    pub fn under_label(label: &BoundingBox, limits: &ExtractionLimits) -> Self {
        let label_width = label.width().max(1.0);
        Self {
            x0: label.x0 - limits.gutter_pad,
            x1: label.x0 + limits.gutter_min_width.max(limits.gutter_width_factor * label_width),
        }
    }

    pub fn center(&self) -> f64 {
        0.5 * (self.x0 + self.x1)
    }

    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(1.0)
    }

    pub fn contains(&self, x: f64, slack: f64) -> bool {
        self.x0 - slack <= x && x <= self.x1 + slack
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub key: String,
    pub point: Point,
    pub label_span: BTreeSet<TokenIndex>,
    pub label_bbox: BoundingBox,
    pub gutter: Gutter,
    pub origin: AnchorOrigin,
    pub score: f64,
}

impl Anchor {
    /// Builds an anchor over the given label tokens; `None` for an empty span.
    pub fn over_label(
        key: impl Into<String>,
        page: &Page,
        label_span: BTreeSet<TokenIndex>,
        origin: AnchorOrigin,
        score: f64,
        limits: &ExtractionLimits,
    ) -> Option<Self> {
        let point = Point::centroid(label_span.iter().map(|&i| page.center(i)))?;
        let label_bbox = BoundingBox::enclosing(label_span.iter().map(|&i| page.token(i).bbox))?;
        Some(Self {
            key: key.into(),
            point,
            gutter: Gutter::under_label(&label_bbox, limits),
            label_span,
            label_bbox,
            origin,
            score,
        })
    }

    /// Same label geometry reassigned to another field key.
    pub fn assigned_to(&self, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..self.clone()
        }
    }

    pub fn shares_label_tokens(&self, other: &Anchor) -> bool {
        !self.label_span.is_disjoint(&other.label_span)
    }
}
