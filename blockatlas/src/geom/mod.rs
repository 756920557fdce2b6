//! Integer 2D geometry primitives.
//!
//! Provides the `Point` and `Rect` types used for all tile placement and
//! spatial queries. Rectangles are axis-aligned with half-open extents:
//! a point with `x == rect.x + rect.w` lies outside the rectangle. This
//! convention is what makes quadrant membership unambiguous for the
//! quadtree (a coordinate sitting exactly on a split line belongs to the
//! quadrant that starts there).

use std::ops::{Add, Neg, Sub};

/// A point in the integer pixel coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// An axis-aligned rectangle with integer coordinates.
///
/// `(x, y)` is the top-left corner; `w` and `h` are the extents. A
/// rectangle with non-positive width or height is empty. The empty
/// rectangle is the identity for [`Rect::union`] and absorbing for
/// [`Rect::intersect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// The empty rectangle.
    pub const EMPTY: Rect = Rect {
        x: 0,
        y: 0,
        w: 0,
        h: 0,
    };

    /// Create a new rectangle from top-left corner and extents.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Whether this rectangle covers no area.
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Covered area in square pixels (zero for empty rectangles).
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.w as i64 * self.h as i64
        }
    }

    /// Top-left corner.
    pub const fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// One past the right edge.
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// One past the bottom edge.
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Half-open membership test.
    pub fn contains(&self, p: Point) -> bool {
        !self.is_empty()
            && p.x >= self.x
            && p.x < self.right()
            && p.y >= self.y
            && p.y < self.bottom()
    }

    /// Intersection of two rectangles, [`Rect::EMPTY`] if they do not
    /// overlap.
    pub fn intersect(&self, other: &Rect) -> Rect {
        if self.is_empty() || other.is_empty() {
            return Rect::EMPTY;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        if r <= x || b <= y {
            Rect::EMPTY
        } else {
            Rect::new(x, y, r - x, b - y)
        }
    }

    /// Whether two rectangles share any area.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Smallest rectangle covering both operands. The empty rectangle is
    /// the identity, so a union fold over zero rectangles yields
    /// [`Rect::EMPTY`].
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let r = self.right().max(other.right());
        let b = self.bottom().max(other.bottom());
        Rect::new(x, y, r - x, b - y)
    }

    /// Split into four quadrants: top-left, top-right, bottom-left,
    /// bottom-right.
    ///
    /// The top/left quadrants take the floor half of each extent and the
    /// bottom/right quadrants the remainder, so the four children tile
    /// the parent exactly. With half-open membership every point of the
    /// parent falls in exactly one quadrant.
    pub fn quadrants(&self) -> [Rect; 4] {
        let wl = self.w / 2;
        let wr = self.w - wl;
        let ht = self.h / 2;
        let hb = self.h - ht;
        [
            Rect::new(self.x, self.y, wl, ht),
            Rect::new(self.x + wl, self.y, wr, ht),
            Rect::new(self.x, self.y + ht, wl, hb),
            Rect::new(self.x + wl, self.y + ht, wr, hb),
        ]
    }
}

impl Add<Point> for Rect {
    type Output = Rect;

    /// Translate the rectangle by a point offset.
    fn add(self, rhs: Point) -> Rect {
        Rect::new(self.x + rhs.x, self.y + rhs.y, self.w, self.h)
    }
}

impl Sub<Point> for Rect {
    type Output = Rect;

    fn sub(self, rhs: Point) -> Rect {
        Rect::new(self.x - rhs.x, self.y - rhs.y, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_overlapping() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Rect::new(5, 5, 5, 5));
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 5, 5);
        assert!(a.intersect(&b).is_empty());
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        // Half-open extents: [0,10) and [10,20) share no pixel
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_union_with_empty_is_identity() {
        let a = Rect::new(-5, -5, 10, 10);
        assert_eq!(a.union(&Rect::EMPTY), a);
        assert_eq!(Rect::EMPTY.union(&a), a);
    }

    #[test]
    fn test_union_covers_both() {
        let a = Rect::new(-10, -10, 5, 5);
        let b = Rect::new(10, 10, 5, 5);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(-10, -10, 25, 25));
    }

    #[test]
    fn test_contains_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 0)));
        assert!(!r.contains(Point::new(0, 10)));
    }

    #[test]
    fn test_empty_contains_nothing() {
        assert!(!Rect::EMPTY.contains(Point::new(0, 0)));
    }

    #[test]
    fn test_quadrants_tile_parent() {
        let r = Rect::new(-100, -100, 201, 200);
        let quads = r.quadrants();
        let area: i64 = quads.iter().map(Rect::area).sum();
        assert_eq!(area, r.area());
        for q in &quads {
            assert_eq!(q.intersect(&r), *q);
        }
        // Pairwise disjoint
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert!(!quads[i].intersects(&quads[j]));
            }
        }
    }

    #[test]
    fn test_translate_round_trip() {
        let r = Rect::new(3, 4, 7, 8);
        let p = Point::new(-11, 13);
        assert_eq!((r + p) - p, r);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_rect() -> impl Strategy<Value = Rect> {
            (-1000..1000i32, -1000..1000i32, 0..500i32, 0..500i32)
                .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
        }

        proptest! {
            #[test]
            fn test_intersection_commutes(a in arb_rect(), b in arb_rect()) {
                prop_assert_eq!(a.intersect(&b), b.intersect(&a));
            }

            #[test]
            fn test_intersection_within_operands(a in arb_rect(), b in arb_rect()) {
                let r = a.intersect(&b);
                prop_assert_eq!(r.intersect(&a), r);
                prop_assert_eq!(r.intersect(&b), r);
            }

            #[test]
            fn test_union_contains_operands(a in arb_rect(), b in arb_rect()) {
                let u = a.union(&b);
                prop_assert_eq!(a.intersect(&u), a.intersect(&a));
                prop_assert_eq!(b.intersect(&u), b.intersect(&b));
            }

            #[test]
            fn test_quadrants_partition_points(
                r in arb_rect(),
                px in -1500..1500i32,
                py in -1500..1500i32,
            ) {
                let p = Point::new(px, py);
                let owners = r
                    .quadrants()
                    .iter()
                    .filter(|q| q.contains(p))
                    .count();
                if r.contains(p) {
                    prop_assert_eq!(owners, 1, "point must land in exactly one quadrant");
                } else {
                    prop_assert_eq!(owners, 0);
                }
            }
        }
    }
}
