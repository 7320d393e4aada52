/// Axis-aligned rectangles in screen units.
///
/// Half-open on the max edge: a rect at x=0 with width 50 covers 0..50, so
/// two tiles sharing an edge do not overlap.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x0: x, y0: y, x1: x + w, y1: y + h }
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    /// Largest rect inside both; empty (zero-sized at self's origin) when
    /// they are disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if r.is_empty() {
            Rect { x0: self.x0, y0: self.y0, x1: self.x0, y1: self.y0 }
        } else {
            r
        }
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect { x0: self.x0 + dx, y0: self.y0 + dy, x1: self.x1 + dx, y1: self.y1 + dy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 50, 50);
        assert!(!a.overlaps(&Rect::new(50, 0, 50, 50)));
        assert!(!a.overlaps(&Rect::new(0, 50, 50, 50)));
        assert!(a.overlaps(&Rect::new(49, 49, 50, 50)));
    }

    #[test]
    fn empty_rects_never_overlap() {
        let a = Rect::new(0, 0, 50, 50);
        assert!(!a.overlaps(&Rect::new(10, 10, 0, 10)));
    }

    #[test]
    fn intersect_clamps() {
        let sheet = Rect::new(0, 0, 100, 50);
        assert_eq!(sheet.intersect(&Rect::new(80, 10, 50, 50)), Rect { x0: 80, y0: 10, x1: 100, y1: 50 });
        assert!(sheet.intersect(&Rect::new(200, 0, 10, 10)).is_empty());
    }
}
