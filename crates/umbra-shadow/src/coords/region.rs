use core::ops::{BitAnd, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};

use super::{Point, Rect};

/// A set of pixels stored as non-overlapping rectangles.
///
/// Rectangles are kept in canonical banded form:
/// - sorted top to bottom, then left to right
/// - every rectangle in a band shares the same `y`/`height`
/// - horizontally touching spans inside a band are merged
/// - vertically touching bands with identical spans are coalesced
///
/// Two regions covering the same pixels therefore compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Empty region.
    #[inline]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The non-overlapping rectangles making up this region.
    #[inline]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Rect> {
        self.rects.iter()
    }

    /// Bounding box of the region, or `None` when empty.
    pub fn extents(&self) -> Option<Rect> {
        let mut iter = self.rects.iter().copied();
        let first = iter.next()?;
        Some(iter.fold(first, Rect::bounding_union))
    }

    /// Number of covered pixels.
    pub fn area(&self) -> i64 {
        self.rects.iter().map(|r| r.area()).sum()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.rects.iter().any(|r| r.contains(p))
    }

    /// Returns the region moved by `offset`.
    pub fn translated(&self, offset: Point) -> Region {
        Region {
            rects: self.rects.iter().map(|r| *r + offset).collect(),
        }
    }

    pub fn union(&self, other: &Region) -> Region {
        combine(self, other, |a, b| a || b)
    }

    pub fn intersect(&self, other: &Region) -> Region {
        combine(self, other, |a, b| a && b)
    }

    pub fn subtract(&self, other: &Region) -> Region {
        combine(self, other, |a, b| a && !b)
    }

    /// Symmetric difference: pixels covered by exactly one of the inputs.
    pub fn xor(&self, other: &Region) -> Region {
        combine(self, other, |a, b| a != b)
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        if rect.is_empty() {
            Region::new()
        } else {
            Region { rects: vec![rect] }
        }
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Region::new(), |acc, r| acc.union(&Region::from(r)))
    }
}

impl IntoIterator for Region {
    type Item = Rect;
    type IntoIter = std::vec::IntoIter<Rect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.into_iter()
    }
}

impl<'a> IntoIterator for &'a Region {
    type Item = &'a Rect;
    type IntoIter = core::slice::Iter<'a, Rect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}

// ── operators ─────────────────────────────────────────────────────────────

macro_rules! region_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $impl:ident) => {
        impl $trait<&Region> for &Region {
            type Output = Region;
            fn $method(self, rhs: &Region) -> Region {
                self.$impl(rhs)
            }
        }

        impl $trait<Rect> for Region {
            type Output = Region;
            fn $method(self, rhs: Rect) -> Region {
                self.$impl(&Region::from(rhs))
            }
        }

        impl $assign_trait<Rect> for Region {
            fn $assign_method(&mut self, rhs: Rect) {
                *self = self.$impl(&Region::from(rhs));
            }
        }

        impl $assign_trait<&Region> for Region {
            fn $assign_method(&mut self, rhs: &Region) {
                *self = self.$impl(rhs);
            }
        }
    };
}

region_op!(BitOr, bitor, BitOrAssign, bitor_assign, union);
region_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, xor);
region_op!(Sub, sub, SubAssign, sub_assign, subtract);

impl BitAnd<&Region> for &Region {
    type Output = Region;
    fn bitand(self, rhs: &Region) -> Region {
        self.intersect(rhs)
    }
}

impl BitAnd<Rect> for Region {
    type Output = Region;
    fn bitand(self, rhs: Rect) -> Region {
        self.intersect(&Region::from(rhs))
    }
}

// ── boolean combination ───────────────────────────────────────────────────

/// Evaluates `op` on the grid spanned by every edge of both inputs and
/// rebuilds the result in canonical banded form.
fn combine(a: &Region, b: &Region, op: impl Fn(bool, bool) -> bool) -> Region {
    let mut xs: Vec<i32> = Vec::with_capacity((a.rects.len() + b.rects.len()) * 2);
    let mut ys: Vec<i32> = Vec::with_capacity(xs.capacity());
    for r in a.rects.iter().chain(b.rects.iter()) {
        xs.extend([r.x, r.right()]);
        ys.extend([r.y, r.bottom()]);
    }
    xs.sort_unstable();
    xs.dedup();
    ys.sort_unstable();
    ys.dedup();

    let mut out = Vec::new();
    let mut band: Option<Band> = None;

    for row in ys.windows(2) {
        let (y0, y1) = (row[0], row[1]);
        let spans = band_spans(&xs, |x| {
            let p = Point::new(x, y0);
            op(a.contains(p), b.contains(p))
        });

        match band.as_mut() {
            Some(prev) if prev.y1 == y0 && prev.spans == spans => {
                prev.y1 = y1;
                continue;
            }
            _ => {}
        }

        if let Some(prev) = band.take() {
            prev.flush(&mut out);
        }
        if !spans.is_empty() {
            band = Some(Band { y0, y1, spans });
        }
    }

    if let Some(prev) = band {
        prev.flush(&mut out);
    }

    Region { rects: out }
}

/// Horizontal spans `[x0, x1)` of one band, with touching cells merged.
fn band_spans(xs: &[i32], inside: impl Fn(i32) -> bool) -> Vec<(i32, i32)> {
    let mut spans: Vec<(i32, i32)> = Vec::new();
    for cell in xs.windows(2) {
        let (x0, x1) = (cell[0], cell[1]);
        if !inside(x0) {
            continue;
        }
        match spans.last_mut() {
            Some(last) if last.1 == x0 => last.1 = x1,
            _ => spans.push((x0, x1)),
        }
    }
    spans
}

struct Band {
    y0: i32,
    y1: i32,
    spans: Vec<(i32, i32)>,
}

impl Band {
    fn flush(self, out: &mut Vec<Rect>) {
        out.extend(
            self.spans
                .into_iter()
                .map(|(x0, x1)| Rect::from_corners(x0, self.y0, x1, self.y1)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: i32, y: i32, w: i32, h: i32) -> Rect { Rect::new(x, y, w, h) }

    fn assert_disjoint(region: &Region) {
        let rects = region.rects();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(a.intersect(*b).is_none(), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn empty_rect_makes_empty_region() {
        assert!(Region::from(r(0, 0, 0, 10)).is_empty());
        assert_eq!(Region::new().extents(), None);
    }

    #[test]
    fn union_of_nested_is_outer() {
        let region = Region::from(r(-10, -10, 220, 120)) | r(-20, -20, 240, 140);
        assert_eq!(region.rects(), &[r(-20, -20, 240, 140)]);
    }

    #[test]
    fn union_of_overlapping_is_disjoint_and_exact() {
        let a = r(0, 0, 10, 10);
        let b = r(5, 5, 10, 10);
        let region = Region::from(a) | b;

        assert_disjoint(&region);
        assert_eq!(region.area(), 100 + 100 - 25);
        assert_eq!(region.extents(), Some(r(0, 0, 15, 15)));
        assert!(!region.contains(Point::new(12, 2)));
        assert!(region.contains(Point::new(12, 12)));
    }

    #[test]
    fn canonical_form_ignores_construction_order() {
        let stacked: Region = [r(0, 0, 10, 5), r(0, 5, 10, 5)].into_iter().collect();
        assert_eq!(stacked, Region::from(r(0, 0, 10, 10)));

        let side_by_side: Region = [r(5, 0, 5, 10), r(0, 0, 5, 10)].into_iter().collect();
        assert_eq!(side_by_side, Region::from(r(0, 0, 10, 10)));
    }

    #[test]
    fn subtract_hole_leaves_frame() {
        let ring = Region::from(r(-10, -10, 40, 40)) - r(0, 0, 20, 20);

        assert_disjoint(&ring);
        assert_eq!(ring.area(), 40 * 40 - 20 * 20);
        assert!(!ring.contains(Point::new(5, 5)));
        assert!(ring.contains(Point::new(-5, 5)));
        assert_eq!(ring.rects().len(), 4);
    }

    #[test]
    fn xor_of_contained_rect_equals_subtraction() {
        let outer = Region::from(r(-10, -10, 40, 40));
        let inner = Region::from(r(0, 0, 20, 20));
        assert_eq!(&outer ^ &inner, &outer - &inner);
    }

    #[test]
    fn xor_restores_protruding_part() {
        let effect = Region::from(r(0, 0, 10, 10));
        let frame = Region::from(r(5, 0, 10, 10));
        let xor = &effect ^ &frame;

        assert_eq!(xor.area(), 100);
        assert!(xor.contains(Point::new(2, 2)));
        assert!(!xor.contains(Point::new(7, 2)));
        assert!(xor.contains(Point::new(12, 2)));
    }

    #[test]
    fn intersect_with_rect() {
        let region = Region::from(r(0, 0, 10, 10)) | r(20, 0, 10, 10);
        let clipped = region & r(5, 0, 20, 5);
        assert_eq!(clipped.rects(), &[r(5, 0, 5, 5), r(20, 0, 5, 5)]);
    }

    #[test]
    fn translated_moves_every_rect() {
        let region = Region::from(r(0, 0, 4, 4)) | r(10, 10, 2, 2);
        let moved = region.translated(Point::new(3, -1));
        assert_eq!(moved.rects(), &[r(3, -1, 4, 4), r(13, 9, 2, 2)]);
    }

    #[test]
    fn assign_operators_match_methods() {
        let mut region = Region::from(r(0, 0, 10, 10));
        region ^= r(0, 0, 5, 10);
        assert_eq!(region, Region::from(r(5, 0, 5, 10)));
        region |= r(0, 0, 5, 10);
        assert_eq!(region, Region::from(r(0, 0, 10, 10)));
        region -= r(0, 5, 10, 5);
        assert_eq!(region, Region::from(r(0, 0, 10, 5)));
    }
}
