use super::bounding_box::{BoundingBox, Point};
use super::token::{Token, TokenIndex};

/// A page owns its tokens; everything else refers to them by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub tokens: Vec<Token>,
}

impl Page {
    pub fn new(number: usize, tokens: Vec<Token>) -> Self {
        Self { number, tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, index: TokenIndex) -> &Token {
        &self.tokens[index]
    }

    pub fn center(&self, index: TokenIndex) -> Point {
        self.tokens[index].center()
    }

    pub fn bbox_of(&self, indices: &[TokenIndex]) -> Option<BoundingBox> {
        BoundingBox::enclosing(indices.iter().map(|&i| self.tokens[i].bbox))
    }

    /// Sorts indices top-to-bottom, then left-to-right, by token center.
    pub fn sort_reading_order(&self, indices: &mut [TokenIndex]) {
        indices.sort_by(|&a, &b| {
            let (ca, cb) = (self.center(a), self.center(b));
            ca.y.total_cmp(&cb.y).then(ca.x.total_cmp(&cb.x))
        });
    }

    pub fn reading_order(&self) -> Vec<TokenIndex> {
        let mut order: Vec<TokenIndex> = (0..self.tokens.len()).collect();
        self.sort_reading_order(&mut order);
        order
    }

    /// Space-joined text of the given tokens in reading order, skipping blank ones.
    pub fn join_text(&self, indices: &[TokenIndex]) -> String {
        let mut ordered = indices.to_vec();
        self.sort_reading_order(&mut ordered);
        ordered
            .iter()
            .map(|&i| self.tokens[i].text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn reading_order_text(&self) -> String {
        self.join_text(&self.reading_order())
    }
}
