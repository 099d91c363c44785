use serde::{Deserialize, Serialize};

use super::bounding_box::{BoundingBox, Point};

/// Position of a token inside its page's token array.
pub type TokenIndex = usize;

/// One positioned word as produced by word extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(flatten)]
    pub bbox: BoundingBox,
    pub text: String,
    #[serde(default)]
    pub bold: bool,
}

impl Token {
    pub fn new(bbox: BoundingBox, text: impl Into<String>, bold: bool) -> Self {
        Self {
            bbox,
            text: text.into(),
            bold,
        }
    }

    pub fn center(&self) -> Point {
        self.bbox.center()
    }

    pub fn height(&self) -> f64 {
        self.bbox.height()
    }
}
