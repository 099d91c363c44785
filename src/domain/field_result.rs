use serde::Serialize;

use super::anchor::{Anchor, AnchorOrigin};
use super::bounding_box::BoundingBox;
use super::token::TokenIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanDirection {
    Right,
    Down,
}

/// Tokens grown from a seed, in reading order, with their joined text.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingSpan {
    pub seed: TokenIndex,
    pub direction: SpanDirection,
    pub tokens: Vec<TokenIndex>,
    pub bbox: BoundingBox,
    pub text: String,
}

/// Outcome of reading one anchor's value on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldResult {
    pub key: String,
    pub origin: AnchorOrigin,
    pub seed: Option<TokenIndex>,
    pub tokens: Vec<TokenIndex>,
    pub bbox: Option<BoundingBox>,
    pub text: String,
    pub composed: bool,
    pub direction: Option<SpanDirection>,
}

impl FieldResult {
    pub fn without_span(anchor: &Anchor) -> Self {
        Self {
            key: anchor.key.clone(),
            origin: anchor.origin.clone(),
            seed: None,
            tokens: Vec::new(),
            bbox: None,
            text: String::new(),
            composed: false,
            direction: None,
        }
    }

    pub fn from_span(anchor: &Anchor, span: ReadingSpan) -> Self {
        Self {
            key: anchor.key.clone(),
            origin: anchor.origin.clone(),
            seed: Some(span.seed),
            composed: span.tokens.len() > 1,
            tokens: span.tokens,
            bbox: Some(span.bbox),
            text: span.text,
            direction: Some(span.direction),
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
