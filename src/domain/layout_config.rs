use super::token::Token;

const DEFAULT_MEDIAN_HEIGHT: f64 = 16.0;

/// Page-scoped spatial thresholds scaled by the page's median glyph height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub y_band: f64,
    pub gap_max: f64,
    pub line_jump: f64,
    pub radius: f64,
    pub median_height: f64,
}

impl LayoutConfig {
    pub fn calibrate(tokens: &[Token]) -> Self {
        match median(tokens.iter().map(Token::height).collect()) {
            Some(h) => Self::from_median_height(h),
            None => Self::default(),
        }
    }

    pub fn from_median_height(h: f64) -> Self {
        Self {
            y_band: (0.65 * h).max(10.0),
            gap_max: (1.30 * h).max(14.0),
            line_jump: (1.75 * h).max(18.0),
            radius: (7.5 * h).max(180.0),
            median_height: h,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            y_band: 18.0,
            gap_max: 36.0,
            line_jump: 32.0,
            radius: 220.0,
            median_height: DEFAULT_MEDIAN_HEIGHT,
        }
    }
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some(0.5 * (values[mid - 1] + values[mid]))
    } else {
        Some(values[mid])
    }
}
