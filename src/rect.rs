//! Screen-space rectangles, in the native map view's point coordinates.

use cgmath::{EuclideanSpace, Point2, Vector2, Zero};
use std::ops;

/// A rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Rectangle origin.
    pub origin: Point2<f64>,

    /// Rectangle size.
    pub size: Vector2<f64>,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: Point2<f64>, size: Vector2<f64>) -> Rect {
        Rect { origin, size }
    }

    /// Returns a zero-sized rectangle at the origin.
    pub fn zero() -> Rect {
        Rect {
            origin: Point2::new(0., 0.),
            size: Vector2::zero(),
        }
    }

    /// Returns true if the point is inside the rectangle.
    ///
    /// The far edges are exclusive, so adjacent controls never both claim a point.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.size.x
            && point.y < self.origin.y + self.size.y
    }
}

/// Offsets the rectangle, e.g. to move a subview frame into its superview's coordinates.
impl ops::Add<Point2<f64>> for Rect {
    type Output = Rect;
    fn add(self, point: Point2<f64>) -> Rect {
        Rect {
            origin: self.origin + point.to_vec(),
            size: self.size,
        }
    }
}

#[test]
fn test_rect_contains() {
    let rect = Rect::new(Point2::new(10., 10.), Vector2::new(20., 5.));
    assert!(rect.contains(Point2::new(10., 10.)));
    assert!(rect.contains(Point2::new(29.9, 14.9)));
    assert!(!rect.contains(Point2::new(30., 12.)), "far edge is exclusive");
    assert!(!rect.contains(Point2::new(9.9, 12.)));
    assert!(!Rect::zero().contains(Point2::new(0., 0.)));

    let moved = rect + Point2::new(5., -10.);
    assert_eq!(moved.origin, Point2::new(15., 0.));
    assert!(moved.contains(Point2::new(16., 1.)));
}
