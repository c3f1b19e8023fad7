use core::ops::{Add, Sub};

use super::Point;

/// Axis-aligned rectangle in integer pixels (top-left origin).
///
/// Containment is half-open: `[x, x + width) × [y, y + height)`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size anchored at the origin.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Builds a rectangle from its min (inclusive) and max (exclusive) corners.
    #[inline]
    pub const fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    #[inline]
    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Number of covered pixels (zero for empty rects).
    #[inline]
    pub fn area(self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Grows the rectangle by `margin_x` on the left and right and `margin_y`
    /// on the top and bottom. Negative margins shrink it.
    #[inline]
    pub const fn expand(self, margin_x: i32, margin_y: i32) -> Self {
        Self::new(
            self.x - margin_x,
            self.y - margin_y,
            self.width + margin_x * 2,
            self.height + margin_y * 2,
        )
    }

    /// Grows the rectangle by the same margin on all four sides.
    #[inline]
    pub const fn expand_uniform(self, margin: i32) -> Self {
        self.expand(margin, margin)
    }

    /// Symmetric proportional growth: each axis grows by
    /// `floor(dimension * fraction * 0.5)` on both sides.
    #[inline]
    pub fn inflate(self, fraction: f32) -> Self {
        let margin_x = (self.width as f32 * fraction * 0.5).floor() as i32;
        let margin_y = (self.height as f32 * fraction * 0.5).floor() as i32;
        self.expand(margin_x, margin_y)
    }

    /// Smallest rectangle containing both inputs.
    ///
    /// Unlike a region union this always yields a single box, including the
    /// gap between disjoint inputs.
    #[inline]
    pub fn bounding_union(self, other: Rect) -> Rect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::from_corners(x0, y0, x1, y1)
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Rect::from_corners(x0, y0, x1, y1))
        }
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.right() && p.y < self.bottom()
    }

    /// True when every pixel of `other` lies inside `self`.
    /// An empty `other` is contained by anything.
    #[inline]
    pub fn contains_rect(self, other: Rect) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }
}

impl Add<Point> for Rect {
    type Output = Rect;
    #[inline]
    fn add(self, rhs: Point) -> Rect {
        Rect::new(self.x + rhs.x, self.y + rhs.y, self.width, self.height)
    }
}

impl Sub<Point> for Rect {
    type Output = Rect;
    #[inline]
    fn sub(self, rhs: Point) -> Rect {
        Rect::new(self.x - rhs.x, self.y - rhs.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: i32, y: i32, w: i32, h: i32) -> Rect { Rect::new(x, y, w, h) }

    // ── expand / inflate ──────────────────────────────────────────────────

    #[test]
    fn expand_uniform_grows_every_side() {
        assert_eq!(r(0, 0, 200, 100).expand_uniform(10), r(-10, -10, 220, 120));
    }

    #[test]
    fn expand_negative_margin_shrinks() {
        assert_eq!(r(0, 0, 20, 20).expand(-2, -3), r(2, 3, 16, 14));
    }

    #[test]
    fn inflate_zero_is_identity() {
        let rect = r(0, 0, 333, 77);
        assert_eq!(rect.inflate(0.0), rect);
    }

    #[test]
    fn inflate_floors_half_margin() {
        // 101 * 0.1 * 0.5 = 5.05 -> 5, 33 * 0.1 * 0.5 = 1.65 -> 1
        assert_eq!(r(0, 0, 101, 33).inflate(0.1), r(-5, -1, 111, 35));
    }

    // ── translate ─────────────────────────────────────────────────────────

    #[test]
    fn add_point_translates() {
        assert_eq!(r(1, 2, 3, 4) + Point::new(10, -2), r(11, 0, 3, 4));
        assert_eq!(r(11, 0, 3, 4) - Point::new(10, -2), r(1, 2, 3, 4));
    }

    // ── bounding_union ────────────────────────────────────────────────────

    #[test]
    fn bounding_union_of_nested_is_outer() {
        let outer = r(-20, -20, 240, 140);
        let inner = r(-10, -10, 220, 120);
        assert_eq!(outer.bounding_union(inner), outer);
        assert_eq!(inner.bounding_union(outer), outer);
    }

    #[test]
    fn bounding_union_covers_gap() {
        assert_eq!(r(0, 0, 2, 2).bounding_union(r(8, 5, 2, 2)), r(0, 0, 10, 7));
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(0, 0, 10, 10).contains(Point::new(0, 0)));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(0, 0, 10, 10).contains(Point::new(10, 10)));
    }

    #[test]
    fn contains_rect_nested_and_overhanging() {
        assert!(r(0, 0, 10, 10).contains_rect(r(2, 2, 8, 8)));
        assert!(!r(0, 0, 10, 10).contains_rect(r(2, 2, 9, 8)));
        assert!(r(0, 0, 1, 1).contains_rect(r(50, 50, 0, 4)));
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        assert_eq!(r(0, 0, 10, 10).intersect(r(5, 5, 10, 10)), Some(r(5, 5, 5, 5)));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        assert!(r(0, 0, 10, 10).intersect(r(10, 0, 10, 10)).is_none());
    }

    // ── area ──────────────────────────────────────────────────────────────

    #[test]
    fn area_of_empty_is_zero() {
        assert_eq!(r(0, 0, -3, 4).area(), 0);
        assert_eq!(r(0, 0, 3, 4).area(), 12);
    }
}
