/// Cell-space geometry.
///
/// All coordinates are terminal cells. Values are signed so that centered
/// layouts on a too-small viewport can go off-screen without wrapping.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Size { w, h }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// A `size`-sized rect whose center is `center`.
    pub fn centered_on(center: Point, size: Size) -> Self {
        Rect::new(center.x - size.w / 2, center.y - size.h / 2, size.w, size.h)
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by `pad` cells on every side. Never goes negative.
    pub fn inset(&self, pad: i32) -> Rect {
        Rect::new(
            self.x + pad,
            self.y + pad,
            (self.w - 2 * pad).max(0),
            (self.h - 2 * pad).max(0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 4));
        assert!(!r.contains(6, 4));
        assert!(!r.contains(5, 5));
        assert!(!r.contains(1, 3));
    }

    #[test]
    fn centered_round_trip() {
        let r = Rect::centered_on(Point::new(40, 12), Size::new(10, 4));
        assert_eq!(r, Rect::new(35, 10, 10, 4));
        assert_eq!(r.center(), Point::new(40, 12));
    }

    #[test]
    fn inset_saturates() {
        assert_eq!(Rect::new(0, 0, 3, 3).inset(2), Rect::new(2, 2, 0, 0));
    }
}
