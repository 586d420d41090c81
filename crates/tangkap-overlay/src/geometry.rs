pub use tangkap_types::Point;

/// An axis-aligned rectangle in global logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized bounding box of two corner points, whichever of the four
    /// drag directions produced them.
    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && p.x < self.x + self.width as i32
            && p.y < self.y + self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_normalizes_all_four_directions() {
        let expected = Rect::new(10, 20, 30, 40);
        let corners = [
            (Point::new(10, 20), Point::new(40, 60)),
            (Point::new(40, 20), Point::new(10, 60)),
            (Point::new(10, 60), Point::new(40, 20)),
            (Point::new(40, 60), Point::new(10, 20)),
        ];
        for (a, b) in corners {
            assert_eq!(Rect::from_points(a, b), expected);
        }
    }

    #[test]
    fn degenerate_drag_yields_empty_rect() {
        let p = Point::new(5, 5);
        let rect = Rect::from_points(p, p);
        assert_eq!(rect.width, 0);
        assert_eq!(rect.height, 0);
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(Point::new(0, 0)));
        assert!(rect.contains(Point::new(9, 9)));
        assert!(!rect.contains(Point::new(10, 0)));
        assert!(!rect.contains(Point::new(0, 10)));
    }
}
