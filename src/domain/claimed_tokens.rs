use std::collections::BTreeSet;

use super::token::TokenIndex;

/// Token indices already consumed on a page. Passed by value through span
/// growth and handed back with the new claims added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimedTokens(BTreeSet<TokenIndex>);

impl ClaimedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, index: TokenIndex) -> bool {
        self.0.contains(&index)
    }

    #[must_use]
    pub fn claim(mut self, indices: &[TokenIndex]) -> Self {
        self.0.extend(indices.iter().copied());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
