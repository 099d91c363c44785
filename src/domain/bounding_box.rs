use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Mean of a set of points, `None` when the set is empty.
    pub fn centroid<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
        for p in points {
            sx += p.x;
            sy += p.y;
            n += 1;
        }
        (n > 0).then(|| Self::new(sx / n as f64, sy / n as f64))
    }
}

/// Axis-aligned box in page units, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(0.5 * (self.x0 + self.x1), 0.5 * (self.y0 + self.y1))
    }

    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn enclosing<I: IntoIterator<Item = BoundingBox>>(boxes: I) -> Option<Self> {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// Intersection over union; zero when both boxes are degenerate.
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let iw = (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0);
        let ih = (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0);
        let inter = iw * ih;
        let union = self.area() + other.area() - inter;
        if union > 0.0 { inter / union } else { 0.0 }
    }

    /// Overlap test after growing both boxes by `pad` on every side.
    pub fn intersects_padded(&self, other: &BoundingBox, pad: f64) -> bool {
        let x0 = (self.x0 - pad).max(other.x0 - pad);
        let y0 = (self.y0 - pad).max(other.y0 - pad);
        let x1 = (self.x1 + pad).min(other.x1 + pad);
        let y1 = (self.y1 + pad).min(other.y1 + pad);
        x1 - x0 > 0.0 && y1 - y0 > 0.0
    }

    pub fn exceeds(&self, max_width: f64, max_height: f64) -> bool {
        self.width() > max_width || self.height() > max_height
    }
}
