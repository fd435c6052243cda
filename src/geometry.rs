//! Geometry kernel: pure 2D math shared by every other module.
//!
//! Nothing here rounds or snaps. Callers that need snapped values go through
//! [`crate::snap`]; this layer stays numerically exact so snapping decisions
//! are made on unmodified inputs.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in either room or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Fallback box used when there is nothing to measure.
    pub const UNIT: Bounds = Bounds { min_x: 0.0, max_x: 1.0, min_y: 0.0, max_y: 1.0 };

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Edge-to-edge gap between two boxes; zero when they touch or overlap.
    #[must_use]
    pub fn gap(&self, other: &Bounds) -> f64 {
        let dx = (other.min_x - self.max_x).max(self.min_x - other.max_x).max(0.0);
        let dy = (other.min_y - self.max_y).max(self.min_y - other.max_y).max(0.0);
        dx.hypot(dy)
    }
}

/// Rotate `point` about the origin by `angle` radians.
#[must_use]
pub fn rotate(point: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos)
}

/// Corners of a `w` × `h` rectangle centered at `center` and rotated by
/// `rotation_deg` about that center.
///
/// Order is NW, NE, SE, SW in the rectangle's unrotated frame.
#[must_use]
pub fn rect_corners(center: Point, w: f64, h: f64, rotation_deg: f64) -> [Point; 4] {
    let angle = rotation_deg.to_radians();
    let hw = w / 2.0;
    let hh = h / 2.0;
    [
        Point::new(-hw, -hh),
        Point::new(hw, -hh),
        Point::new(hw, hh),
        Point::new(-hw, hh),
    ]
    .map(|local| center + rotate(local, angle))
}

/// Min/max over a set of points. An empty set yields [`Bounds::UNIT`].
#[must_use]
pub fn axis_aligned_bounds(points: &[Point]) -> Bounds {
    if points.is_empty() {
        return Bounds::UNIT;
    }
    points.iter().fold(
        Bounds {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        },
        |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        },
    )
}

/// Distance from `point` to the segment `a`–`b`.
#[must_use]
pub fn distance_point_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    point.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Strict overlap test. Boxes that only share an edge do not overlap.
#[must_use]
pub fn rects_overlap(a: &Bounds, b: &Bounds) -> bool {
    a.min_x < b.max_x && a.max_x > b.min_x && a.min_y < b.max_y && a.max_y > b.min_y
}

/// Map any angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_angle(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if a >= 360.0 { 0.0 } else { a }
}

/// Orientation of the segment `a`→`b` in degrees, normalized.
#[must_use]
pub fn segment_angle(a: Point, b: Point) -> f64 {
    normalize_angle((b.y - a.y).atan2(b.x - a.x).to_degrees())
}
