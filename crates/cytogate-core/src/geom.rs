use serde::{Deserialize, Serialize};

/// One event projected onto a channel pair, or a vertex in data/axis space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Placeholder for an event that has no position in the current axis space.
    pub const UNMAPPED: Self = Self {
        x: f64::NAN,
        y: f64::NAN,
    };

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pixel position relative to the canvas top-left corner. Y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for ScreenPoint {
    type Output = ScreenPoint;

    fn sub(self, rhs: Self) -> Self::Output {
        ScreenPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Even-odd ray casting test.
///
/// The polygon may or may not repeat its first vertex at the end; both forms
/// give the same answer. Fewer than 3 vertices never contain anything, and a
/// point with a NaN coordinate is never inside.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        let crosses = (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}
