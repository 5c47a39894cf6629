//! Geometric primitives: `Point`, `Rect`, `PolarBounds`.
//!
//! Layout works in `f64` throughout. Rectangular results are snapped to whole
//! pixels by the layout pass; polar results keep full precision because angle
//! extents must sum exactly to their parent's extent.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::ops::{Add, Sub};

/// A 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    /// Screen-space angle of this point around `center`.
    ///
    /// The y axis points down, so angles grow clockwise on screen. The result
    /// is in `[0, 2π)`.
    #[must_use]
    pub fn angle_around(&self, center: &Self) -> f64 {
        (self.y - center.y).atan2(self.x - center.x).rem_euclid(TAU)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A rectangle defined by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: f64,
    /// Y position of top-left corner
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Get center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Length of the shorter side.
    #[must_use]
    pub fn shorter_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Aspect ratio as `long / short`, always `>= 1`. Degenerate rectangles
    /// report infinity.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        let short = self.shorter_side();
        if short <= 0.0 {
            return f64::INFINITY;
        }
        self.width.max(self.height) / short
    }

    /// Whether the rectangle has a positive area.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Check if a point is inside the rectangle (inclusive).
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Check if this rectangle overlaps another with a positive area.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Calculate intersection with another rectangle.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > x && bottom > y {
            Some(Self::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Create a new rectangle inset by the given amount on all sides.
    #[must_use]
    pub fn inset(&self, amount: f64) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }

    /// Snap the edges to whole pixels.
    ///
    /// Edges are rounded rather than the size, so two rectangles sharing an
    /// edge before snapping still share it afterwards.
    #[must_use]
    pub fn snapped(&self) -> Self {
        let x0 = self.x.round();
        let y0 = self.y.round();
        let x1 = self.right().round();
        let y1 = self.bottom().round();
        Self::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Normalize an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Normalize an angle into `(-π, π]`.
#[must_use]
pub fn normalize_signed_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Annular wedge occupied by a sunburst node.
///
/// Angles are radians in screen space (clockwise from 3 o'clock). The start
/// angle is not normalized: children inherit absolute angles from their
/// parent, so a wedge may start at any value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarBounds {
    /// Inner radius
    pub inner_radius: f64,
    /// Outer radius
    pub outer_radius: f64,
    /// Start angle in radians
    pub start_angle: f64,
    /// Angular extent in radians
    pub angle_extent: f64,
}

impl PolarBounds {
    /// Create a new wedge.
    #[must_use]
    pub const fn new(inner_radius: f64, outer_radius: f64, start_angle: f64, angle_extent: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
            start_angle,
            angle_extent,
        }
    }

    /// End angle (`start + extent`).
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.angle_extent
    }

    /// Angle at the middle of the wedge, normalized into `[0, 2π)`.
    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        normalize_angle(self.start_angle + self.angle_extent / 2.0)
    }

    /// Radial thickness.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Whether the wedge covers any area.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.angle_extent > 0.0 && self.outer_radius > self.inner_radius
    }

    /// Whether `angle` (any representation) lies within the wedge's angular range.
    ///
    /// The angle is shifted into `[start, start + 2π)` before comparison, so
    /// wedges that wrap past 2π are handled. A full circle contains every angle.
    #[must_use]
    pub fn contains_angle(&self, angle: f64) -> bool {
        if self.angle_extent >= TAU {
            return true;
        }
        let shifted = self.start_angle + (angle - self.start_angle).rem_euclid(TAU);
        shifted <= self.start_angle + self.angle_extent
    }

    /// Whether a point, relative to the sunburst `center`, lies inside the wedge.
    /// Radius bounds are inclusive.
    #[must_use]
    pub fn contains_point(&self, center: &Point, point: &Point) -> bool {
        let radius = point.distance(center);
        if radius < self.inner_radius || radius > self.outer_radius {
            return false;
        }
        // The centre of a hub has no meaningful angle.
        if radius == 0.0 {
            return self.inner_radius == 0.0;
        }
        self.contains_angle(point.angle_around(center))
    }
}

impl Default for PolarBounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_default() {
        assert_eq!(Point::default(), Point::ORIGIN);
    }

    #[test]
    fn test_point_angle_around_is_clockwise() {
        let c = Point::ORIGIN;
        assert!((Point::new(1.0, 0.0).angle_around(&c)).abs() < 1e-12);
        assert!((Point::new(0.0, 1.0).angle_around(&c) - PI / 2.0).abs() < 1e-12);
        assert!((Point::new(0.0, -1.0).angle_around(&c) - 3.0 * PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rect_contains_point_inclusive() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains_point(&Point::new(10.0, 10.0)));
        assert!(r.contains_point(&Point::new(30.0, 30.0)));
        assert!(!r.contains_point(&Point::new(30.1, 30.0)));
    }

    #[test]
    fn test_rect_snapped_preserves_shared_edges() {
        let a = Rect::new(0.0, 0.0, 33.3, 10.0);
        let b = Rect::new(33.3, 0.0, 33.3, 10.0);
        let (a, b) = (a.snapped(), b.snapped());
        assert_eq!(a.right(), b.x);
        assert_eq!(a.width + b.width, 67.0);
    }

    #[test]
    fn test_rect_aspect_ratio() {
        assert_eq!(Rect::new(0.0, 0.0, 100.0, 300.0).aspect_ratio(), 3.0);
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).aspect_ratio().is_infinite());
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_none());
        let c = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(&c), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn test_normalize_signed_angle() {
        assert!((normalize_signed_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_signed_angle(PI) - PI).abs() < 1e-12);
        assert!((normalize_signed_angle(-PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_polar_contains_angle_wraps() {
        // 300° .. 420° (wraps through 0)
        let w = PolarBounds::new(0.0, 10.0, 300f64.to_radians(), 120f64.to_radians());
        assert!(w.contains_angle(10f64.to_radians()));
        assert!(w.contains_angle(330f64.to_radians()));
        assert!(!w.contains_angle(90f64.to_radians()));
    }

    #[test]
    fn test_polar_contains_point() {
        let c = Point::new(100.0, 100.0);
        let w = PolarBounds::new(20.0, 40.0, 0.0, PI / 2.0);
        assert!(w.contains_point(&c, &Point::new(121.0, 121.0)));
        assert!(!w.contains_point(&c, &Point::new(105.0, 105.0)));
        assert!(!w.contains_point(&c, &Point::new(79.0, 121.0)));
    }

    #[test]
    fn test_polar_hub_contains_center() {
        let c = Point::new(50.0, 50.0);
        let hub = PolarBounds::new(0.0, 10.0, -PI / 2.0, TAU);
        assert!(hub.contains_point(&c, &c));
    }

    #[test]
    fn test_polar_mid_angle_normalized() {
        let w = PolarBounds::new(0.0, 1.0, -PI / 2.0, PI / 2.0);
        assert!((w.mid_angle() - 7.0 * PI / 4.0).abs() < 1e-12);
    }
}
