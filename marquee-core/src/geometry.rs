//! Axis-aligned rectangles
//!
//! Used wherever invalidation is tracked: partial presents, the popup
//! region, list item bounds.

/// Axis-aligned integer rectangle in pixel units
///
/// A rectangle is empty when either dimension is zero. `right()` and
/// `bottom()` are inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle {
    pub left: i16,
    pub top: i16,
    pub width: i16,
    pub height: i16,
}

impl Rectangle {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(left: i16, top: i16, width: i16, height: i16) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The empty rectangle at the origin
    pub const fn empty() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Inclusive right edge
    pub const fn right(&self) -> i16 {
        self.left.saturating_add(self.width).saturating_sub(1)
    }

    /// Inclusive bottom edge
    pub const fn bottom(&self) -> i16 {
        self.top.saturating_add(self.height).saturating_sub(1)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Collapse to an empty rectangle, keeping the origin
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
    }

    /// Check if the pixel `(x, y)` lies inside
    pub const fn contains(&self, x: i16, y: i16) -> bool {
        let (x, y) = (x as i32, y as i32);
        let (left, top) = (self.left as i32, self.top as i32);
        left <= x && x < left + self.width as i32 && top <= y && y < top + self.height as i32
    }

    /// Grow by `dx` on the left and right and `dy` on the top and bottom
    ///
    /// Negative values shrink the rectangle.
    pub fn inflate(&mut self, dx: i16, dy: i16) {
        self.left = self.left.saturating_sub(dx);
        self.top = self.top.saturating_sub(dy);
        self.width = self.width.saturating_add(dx.saturating_mul(2));
        self.height = self.height.saturating_add(dy.saturating_mul(2));
    }

    /// Copy of this rectangle grown by `dx`/`dy`
    pub fn inflated(mut self, dx: i16, dy: i16) -> Self {
        self.inflate(dx, dy);
        self
    }

    /// Smallest rectangle covering both `self` and `other`
    ///
    /// An empty operand contributes nothing.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rectangle::new(
            left,
            top,
            right.saturating_sub(left).saturating_add(1),
            bottom.saturating_sub(top).saturating_add(1),
        )
    }

    /// Grow in place to also cover `other`
    pub fn union_with(&mut self, other: &Rectangle) {
        *self = self.union(other);
    }

    /// Intersection with the `width` x `height` area anchored at the origin
    ///
    /// Returns an empty rectangle when nothing overlaps.
    pub fn clip(&self, width: i16, height: i16) -> Rectangle {
        if self.is_empty() || self.width < 0 || self.height < 0 {
            return Rectangle::empty();
        }
        let left = self.left.max(0);
        let top = self.top.max(0);
        let right = self.right().min(width - 1);
        let bottom = self.bottom().min(height - 1);
        if right < left || bottom < top {
            return Rectangle::empty();
        }
        Rectangle::new(
            left,
            top,
            right.saturating_sub(left).saturating_add(1),
            bottom.saturating_sub(top).saturating_add(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_edges() {
        let rc = Rectangle::new(10, 20, 5, 3);
        assert_eq!(rc.right(), 14);
        assert_eq!(rc.bottom(), 22);
    }

    #[test]
    fn test_empty() {
        assert!(Rectangle::new(4, 4, 0, 10).is_empty());
        assert!(Rectangle::new(4, 4, 10, 0).is_empty());
        assert!(!Rectangle::new(4, 4, 1, 1).is_empty());

        let mut rc = Rectangle::new(1, 2, 3, 4);
        rc.clear();
        assert!(rc.is_empty());
    }

    #[test]
    fn test_contains() {
        let rc = Rectangle::new(64, 48, 128, 16);
        assert!(rc.contains(64, 48));
        assert!(rc.contains(191, 63));
        assert!(!rc.contains(192, 48));
        assert!(!rc.contains(64, 64));
        assert!(!rc.contains(63, 50));
    }

    #[test]
    fn test_inflate_shrinks_popup_frame() {
        let mut rc = Rectangle::new(64, 48, 128, 16);
        rc.inflate(-1, -1);
        assert_eq!(rc, Rectangle::new(65, 49, 126, 14));
    }

    #[test]
    fn test_union() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(20, 5, 5, 20);
        let u = a.union(&b);
        assert_eq!(u, Rectangle::new(0, 0, 25, 25));
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Rectangle::new(3, 4, 5, 6);
        assert_eq!(a.union(&Rectangle::empty()), a);
        assert_eq!(Rectangle::empty().union(&a), a);
    }

    #[test]
    fn test_clip() {
        let rc = Rectangle::new(-5, 60, 20, 10);
        assert_eq!(rc.clip(256, 64), Rectangle::new(0, 60, 15, 4));
        assert!(Rectangle::new(300, 0, 4, 4).clip(256, 64).is_empty());
    }

    #[test]
    fn test_extreme_coordinates_saturate() {
        let far = Rectangle::new(i16::MAX - 2, i16::MAX - 2, 10, 10);
        assert_eq!(far.right(), i16::MAX - 1);
        assert!(far.contains(i16::MAX, i16::MAX));
        assert!(far.clip(256, 64).is_empty());

        let mut rc = Rectangle::new(i16::MIN, 0, i16::MAX, 4);
        rc.inflate(10, 0);
        assert_eq!(rc.left, i16::MIN);
        assert_eq!(rc.width, i16::MAX);

        let u = Rectangle::new(i16::MIN, 0, 1, 1).union(&Rectangle::new(i16::MAX - 1, 0, 1, 1));
        assert_eq!(u.width, i16::MAX);
    }

    fn rect() -> impl Strategy<Value = Rectangle> {
        (-40i16..300, -40i16..100, 1i16..80, 1i16..40).prop_map(|(l, t, w, h)| Rectangle::new(l, t, w, h))
    }

    proptest! {
        #[test]
        fn prop_union_covers_both(a in rect(), b in rect(), x in -50i16..400, y in -50i16..150) {
            let u = a.union(&b);
            if a.contains(x, y) || b.contains(x, y) {
                prop_assert!(u.contains(x, y));
            }
        }

        #[test]
        fn prop_clip_stays_inside(rc in rect(), x in -50i16..400, y in -50i16..150) {
            let clipped = rc.clip(256, 64);
            let inside = rc.contains(x, y) && (0..256).contains(&x) && (0..64).contains(&y);
            prop_assert_eq!(clipped.contains(x, y), inside);
        }
    }
}
