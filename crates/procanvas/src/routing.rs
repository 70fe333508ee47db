//! Connection routing.
//!
//! Given the bounds of a source and a target element, [`route`] picks one
//! edge midpoint on each ("anchors") and produces a smooth single-bend path
//! between them:
//!
//! 1. Compare `|dx|` and `|dy|` between the two centers. Ties go horizontal.
//! 2. Horizontal-dominant: leave the source on the side facing the target
//!    (right or left) and enter the target on the opposite side. The cubic
//!    curve bends through the horizontal midpoint between the anchors.
//! 3. Vertical-dominant: the same with bottom/top and the vertical midpoint.
//!
//! Identical source and target bounds produce a dedicated loop from the
//! right midpoint back into the top midpoint. Overlapping but distinct
//! bounds go through the dominant-axis branch unchanged.
//!
//! Connections carrying manual waypoints are routed by [`route_through`] as a
//! polyline instead.
//!
//! All functions here are pure.

use std::fmt;

use procanvas_core::geometry::{Bounds, Point, Side};

/// How far a self-loop bulges out of its element.
const SELF_LOOP_REACH: f32 = 40.0;

/// One drawing command of a routed path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo(p) => write!(f, "M {} {}", p.x(), p.y()),
            Self::LineTo(p) => write!(f, "L {} {}", p.x(), p.y()),
            Self::CubicTo {
                control1,
                control2,
                end,
            } => write!(
                f,
                "C {} {}, {} {}, {} {}",
                control1.x(),
                control1.y(),
                control2.x(),
                control2.y(),
                end.x(),
                end.y()
            ),
        }
    }
}

/// A routed connection path.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    source_side: Side,
    target_side: Side,
    commands: Vec<PathCommand>,
    label_position: Point,
}

impl Route {
    /// The side of the source element the path leaves from.
    pub fn source_side(&self) -> Side {
        self.source_side
    }

    /// The side of the target element the path enters.
    pub fn target_side(&self) -> Side {
        self.target_side
    }

    /// The first point of the path.
    pub fn start(&self) -> Point {
        match self.commands.first() {
            Some(PathCommand::MoveTo(p)) => *p,
            _ => Point::default(),
        }
    }

    /// The last point of the path.
    pub fn end(&self) -> Point {
        match self.commands.last() {
            Some(PathCommand::MoveTo(p) | PathCommand::LineTo(p)) => *p,
            Some(PathCommand::CubicTo { end, .. }) => *end,
            None => Point::default(),
        }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Where a connection name is drawn.
    pub fn label_position(&self) -> Point {
        self.label_position
    }

    /// Returns the SVG path description, e.g. `M 10 20 C 50 20, 50 80, 90 80`.
    pub fn path_data(&self) -> String {
        self.commands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Routes a connection between two element rectangles.
///
/// # Examples
///
/// ```
/// # use procanvas::routing::route;
/// # use procanvas_core::geometry::{Bounds, Point, Side, Size};
/// let source = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 80.0));
/// let target = Bounds::new_from_top_left(Point::new(300.0, 0.0), Size::new(100.0, 80.0));
///
/// let route = route(source, target);
/// assert_eq!(route.source_side(), Side::Right);
/// assert_eq!(route.target_side(), Side::Left);
/// assert_eq!(route.path_data(), "M 100 40 C 200 40, 200 40, 300 40");
/// ```
pub fn route(source: Bounds, target: Bounds) -> Route {
    if source == target {
        return self_loop(source);
    }

    let (source_side, target_side) = facing_sides(source.center(), target.center());
    let start = source.anchor(source_side);
    let end = target.anchor(target_side);

    let (control1, control2) = if source_side.is_horizontal() {
        let mid_x = (start.x() + end.x()) / 2.0;
        (Point::new(mid_x, start.y()), Point::new(mid_x, end.y()))
    } else {
        let mid_y = (start.y() + end.y()) / 2.0;
        (Point::new(start.x(), mid_y), Point::new(end.x(), mid_y))
    };

    Route {
        source_side,
        target_side,
        commands: vec![
            PathCommand::MoveTo(start),
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            },
        ],
        label_position: start.midpoint(end),
    }
}

/// Routes a connection through manual waypoints as a polyline.
///
/// The source anchor faces the first waypoint and the target anchor faces
/// the last one. Without waypoints this is [`route`].
pub fn route_through(source: Bounds, target: Bounds, waypoints: &[Point]) -> Route {
    let (Some(&first), Some(&last)) = (waypoints.first(), waypoints.last()) else {
        return route(source, target);
    };

    let (source_side, _) = facing_sides(source.center(), first);
    let (target_side, _) = facing_sides(target.center(), last);
    let start = source.anchor(source_side);
    let end = target.anchor(target_side);

    let mut points = Vec::with_capacity(waypoints.len() + 2);
    points.push(start);
    points.extend_from_slice(waypoints);
    points.push(end);

    // Middle segment of the polyline.
    let middle = (points.len() - 1) / 2;
    let label_position = points[middle].midpoint(points[middle + 1]);

    let commands = std::iter::once(PathCommand::MoveTo(start))
        .chain(points[1..].iter().copied().map(PathCommand::LineTo))
        .collect();

    Route {
        source_side,
        target_side,
        commands,
        label_position,
    }
}

/// Returns the side of `from` facing `to` and the side of `to` facing back.
fn facing_sides(from: Point, to: Point) -> (Side, Side) {
    let delta = to.sub_point(from);
    let side = if delta.x().abs() >= delta.y().abs() {
        if delta.x() >= 0.0 { Side::Right } else { Side::Left }
    } else if delta.y() >= 0.0 {
        Side::Bottom
    } else {
        Side::Top
    };
    (side, side.opposite())
}

fn self_loop(bounds: Bounds) -> Route {
    let start = bounds.anchor(Side::Right);
    let end = bounds.anchor(Side::Top);
    let control1 = start.add_point(Point::new(SELF_LOOP_REACH, 0.0));
    let control2 = end.add_point(Point::new(0.0, -SELF_LOOP_REACH));

    Route {
        source_side: Side::Right,
        target_side: Side::Top,
        commands: vec![
            PathCommand::MoveTo(start),
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            },
        ],
        label_position: control1.midpoint(control2),
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use procanvas_core::geometry::Size;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            10.0f32..300.0,
            10.0f32..300.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Both ends of a route lie on edge midpoints of their rectangles.
    fn check_endpoints_are_anchors(source: Bounds, target: Bounds) -> Result<(), TestCaseError> {
        let route = route(source, target);
        prop_assert_eq!(route.start(), source.anchor(route.source_side()));
        prop_assert_eq!(route.end(), target.anchor(route.target_side()));
        Ok(())
    }

    /// Anchors face each other: the target side is opposite the source side,
    /// and the source side points towards the target.
    fn check_anchors_face_each_other(source: Bounds, target: Bounds) -> Result<(), TestCaseError> {
        prop_assume!(source != target);
        let route = route(source, target);
        prop_assert_eq!(route.target_side(), route.source_side().opposite());

        let delta = target.center().sub_point(source.center());
        match route.source_side() {
            Side::Right => {
                prop_assert!(delta.x() >= 0.0 && delta.x().abs() >= delta.y().abs());
            }
            Side::Left => {
                prop_assert!(delta.x() < 0.0 && delta.x().abs() >= delta.y().abs());
            }
            Side::Bottom => {
                prop_assert!(delta.y() >= 0.0 && delta.y().abs() > delta.x().abs());
            }
            Side::Top => {
                prop_assert!(delta.y() < 0.0 && delta.y().abs() > delta.x().abs());
            }
        }
        Ok(())
    }

    /// The curve bends through the midpoint between anchors on the dominant axis.
    fn check_bend_at_midpoint(source: Bounds, target: Bounds) -> Result<(), TestCaseError> {
        prop_assume!(source != target);
        let route = route(source, target);
        let (start, end) = (route.start(), route.end());
        let Some(PathCommand::CubicTo {
            control1, control2, ..
        }) = route.commands().get(1).copied()
        else {
            return Err(TestCaseError::fail("expected a cubic segment"));
        };

        if route.source_side().is_horizontal() {
            let mid_x = (start.x() + end.x()) / 2.0;
            prop_assert!(approx_eq!(f32, control1.x(), mid_x, epsilon = 0.01));
            prop_assert!(approx_eq!(f32, control2.x(), mid_x, epsilon = 0.01));
        } else {
            let mid_y = (start.y() + end.y()) / 2.0;
            prop_assert!(approx_eq!(f32, control1.y(), mid_y, epsilon = 0.01));
            prop_assert!(approx_eq!(f32, control2.y(), mid_y, epsilon = 0.01));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn endpoints_are_anchors(source in bounds_strategy(), target in bounds_strategy()) {
            check_endpoints_are_anchors(source, target)?;
        }

        #[test]
        fn anchors_face_each_other(source in bounds_strategy(), target in bounds_strategy()) {
            check_anchors_face_each_other(source, target)?;
        }

        #[test]
        fn bend_at_midpoint(source in bounds_strategy(), target in bounds_strategy()) {
            check_bend_at_midpoint(source, target)?;
        }
    }
}
