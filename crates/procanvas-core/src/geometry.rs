//! Geometric primitives for diagram editing and rendering.
//!
//! This module provides the geometric types used throughout procanvas for
//! positioning nodes, hit-testing pointer events and routing connections.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding/margin values for four sides
//! - [`Side`] - One of the four edges of a rectangle
//!
//! # Coordinate System
//!
//! Procanvas uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Diagram coordinates are always unscaled. Zoom is applied by the renderer
//! as a display transform and never written back into stored positions.

use serde::{Deserialize, Serialize};

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use procanvas_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Rounds both coordinates to the nearest multiple of `grid`.
    ///
    /// A non-positive grid leaves the point unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use procanvas_core::geometry::Point;
    /// let snapped = Point::new(109.0, 151.0).snap_to_grid(20.0);
    /// assert_eq!(snapped, Point::new(100.0, 160.0));
    /// ```
    pub fn snap_to_grid(self, grid: f32) -> Self {
        if grid <= 0.0 {
            return self;
        }
        Self {
            x: (self.x / grid).round() * grid,
            y: (self.y / grid).round() * grid,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Multiplies both dimension by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// One of the four edges of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Returns the edge facing this one.
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Returns true for the left and right edges.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
///
/// # Examples
///
/// ```
/// # use procanvas_core::geometry::{Bounds, Point, Side, Size};
/// let bounds = Bounds::new_from_top_left(Point::new(100.0, 150.0), Size::new(120.0, 80.0));
/// assert_eq!(bounds.center(), Point::new(160.0, 190.0));
/// assert_eq!(bounds.anchor(Side::Right), Point::new(220.0, 190.0));
/// assert!(bounds.contains(Point::new(110.0, 160.0)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds whose top-left corner sits at `top_left`
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Returns the midpoint of the given edge.
    pub fn anchor(self, side: Side) -> Point {
        let center = self.center();
        match side {
            Side::Top => Point::new(center.x, self.min_y),
            Side::Right => Point::new(self.max_x, center.y),
            Side::Bottom => Point::new(center.x, self.max_y),
            Side::Left => Point::new(self.min_x, center.y),
        }
    }

    /// Returns true if the point lies inside or on the border of the bounds
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Merges two bounds to create a larger bounds that contains both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Expands the bounds by adding insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }
}

/// Represents spacing around an element (padding, margin, etc.)
/// with potentially different values for each side
#[derive(Debug, Clone, Copy, Default)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
        assert!(point.is_zero());
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);
        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_snap_to_grid() {
        assert_eq!(
            Point::new(300.0, 150.0).snap_to_grid(20.0),
            Point::new(300.0, 160.0)
        );
        assert_eq!(
            Point::new(9.0, 11.0).snap_to_grid(20.0),
            Point::new(0.0, 20.0)
        );
        assert_eq!(
            Point::new(-9.0, -31.0).snap_to_grid(20.0),
            Point::new(0.0, -40.0)
        );
    }

    #[test]
    fn test_point_snap_to_non_positive_grid_is_identity() {
        let point = Point::new(13.0, 17.0);
        assert_eq!(point.snap_to_grid(0.0), point);
        assert_eq!(point.snap_to_grid(-5.0), point);
    }

    #[test]
    fn test_point_serde_shape() {
        let json = serde_json::to_string(&Point::new(1.5, 2.0)).unwrap();
        assert_eq!(json, r#"{"x":1.5,"y":2.0}"#);
    }

    #[test]
    fn test_size_scale() {
        let size = Size::new(10.0, 20.0).scale(1.5);
        assert_approx_eq!(f32, size.width(), 15.0);
        assert_approx_eq!(f32, size.height(), 30.0);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Top.opposite(), Side::Bottom);
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert!(Side::Right.is_horizontal());
        assert!(!Side::Bottom.is_horizontal());
    }

    #[test]
    fn test_bounds_from_top_left() {
        let a = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(40.0, 30.0));
        assert_eq!(a.center(), Point::new(30.0, 35.0));
        assert_eq!(a.min_point(), Point::new(10.0, 20.0));
        assert_eq!(a.to_size(), Size::new(40.0, 30.0));
    }

    #[test]
    fn test_bounds_anchors() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
        assert_eq!(bounds.anchor(Side::Top), Point::new(50.0, 0.0));
        assert_eq!(bounds.anchor(Side::Right), Point::new(100.0, 25.0));
        assert_eq!(bounds.anchor(Side::Bottom), Point::new(50.0, 50.0));
        assert_eq!(bounds.anchor(Side::Left), Point::new(0.0, 25.0));
    }

    #[test]
    fn test_bounds_contains_border() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert!(a.contains(Point::new(10.0, 10.0)));
        assert!(a.contains(Point::new(0.0, 5.0)));
        assert!(!a.contains(Point::new(10.1, 5.0)));
    }

    #[test]
    fn test_bounds_merge_and_padding() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let c = Bounds::new_from_top_left(Point::new(20.0, 20.0), Size::new(10.0, 10.0));

        let merged = a.merge(&c);
        assert_eq!(merged.max_x(), 30.0);
        assert_eq!(merged.max_y(), 30.0);

        let padded = a.add_padding(Insets::uniform(2.0));
        assert_approx_eq!(f32, padded.width(), 14.0);
        assert_approx_eq!(f32, padded.min_x(), -2.0);
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn grid_strategy() -> impl Strategy<Value = f32> {
        prop_oneof![Just(5.0f32), Just(10.0f32), Just(20.0f32), Just(25.0f32)]
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Snapping moves a point by at most half a grid unit per axis and lands on a multiple.
    fn check_snap_lands_on_grid(point: Point, grid: f32) -> Result<(), TestCaseError> {
        let snapped = point.snap_to_grid(grid);

        prop_assert!((snapped.x() - point.x()).abs() <= grid / 2.0 + 0.01);
        prop_assert!((snapped.y() - point.y()).abs() <= grid / 2.0 + 0.01);

        let rem_x = (snapped.x() / grid).fract().abs();
        let rem_y = (snapped.y() / grid).fract().abs();
        prop_assert!(rem_x < 0.001 || rem_x > 0.999);
        prop_assert!(rem_y < 0.001 || rem_y > 0.999);
        Ok(())
    }

    /// Snapping is idempotent.
    fn check_snap_is_idempotent(point: Point, grid: f32) -> Result<(), TestCaseError> {
        let once = point.snap_to_grid(grid);
        let twice = once.snap_to_grid(grid);
        prop_assert!(approx_eq!(f32, once.x(), twice.x(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, once.y(), twice.y(), epsilon = 0.001));
        Ok(())
    }

    /// Every anchor lies on the border of its bounds.
    fn check_anchors_on_border(bounds: Bounds) -> Result<(), TestCaseError> {
        for side in [Side::Top, Side::Right, Side::Bottom, Side::Left] {
            let anchor = bounds.anchor(side);
            prop_assert!(bounds.contains(anchor), "{side:?} anchor {anchor:?} outside {bounds:?}");
        }
        Ok(())
    }

    /// The merged bounds contains both inputs' centers.
    fn check_merge_contains_both(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        let merged = a.merge(&b);
        prop_assert!(merged.contains(a.center()));
        prop_assert!(merged.contains(b.center()));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn snap_lands_on_grid(point in point_strategy(), grid in grid_strategy()) {
            check_snap_lands_on_grid(point, grid)?;
        }

        #[test]
        fn snap_is_idempotent(point in point_strategy(), grid in grid_strategy()) {
            check_snap_is_idempotent(point, grid)?;
        }

        #[test]
        fn anchors_on_border(bounds in bounds_strategy()) {
            check_anchors_on_border(bounds)?;
        }

        #[test]
        fn merge_contains_both(a in bounds_strategy(), b in bounds_strategy()) {
            check_merge_contains_both(a, b)?;
        }
    }
}
