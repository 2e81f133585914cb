//! Circular interpolation geometry.
//!
//! An arc is given by its current point, its target and the I/J offsets to
//! the centre. In multi-quadrant mode the offsets are signed. In
//! single-quadrant mode they are unsigned and the centre is picked from the
//! direction of travel.

use lyon::geom::Arc;
use lyon::math::{vector, Angle};
use lyon::path::path::Builder;
use pcbexpose_core::Point;

use crate::shape::to_lyon;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadrantMode {
    Single,
    Multi,
}

impl Default for QuadrantMode {
    fn default() -> Self {
        Self::Multi
    }
}

/// A resolved arc. Angles are in degrees, counter-clockwise from +X.
/// `sweep` is positive for counter-clockwise arcs and negative for clockwise ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl ArcSegment {
    /// Resolve the arc from `from` to `to` with centre offsets `(i, j)`.
    pub fn resolve(
        from: Point,
        to: Point,
        offset: (f64, f64),
        direction: ArcDirection,
        quadrant: QuadrantMode,
    ) -> Self {
        let (i, j) = offset;
        let center = arc_center(from, to, offset, direction, quadrant);
        let start = point_angle(center, from);
        let end = point_angle(center, to);

        let mut sweep = end - start;
        match direction {
            ArcDirection::CounterClockwise => {
                if sweep < 0.0 {
                    sweep += 360.0;
                }
                if sweep == 0.0 {
                    sweep = 360.0;
                }
            }
            ArcDirection::Clockwise => {
                if sweep > 0.0 {
                    sweep -= 360.0;
                }
                if sweep == 0.0 {
                    sweep = -360.0;
                }
            }
        }

        Self {
            center,
            radius: (i * i + j * j).sqrt(),
            start_angle: start,
            sweep,
        }
    }

    fn geometry(&self) -> Arc<f32> {
        let r = self.radius as f32;
        Arc {
            center: to_lyon(self.center),
            radii: vector(r, r),
            x_rotation: Angle::radians(0.0),
            start_angle: Angle::degrees(self.start_angle as f32),
            sweep_angle: Angle::degrees(self.sweep as f32),
        }
    }

    pub fn start_point(&self) -> Point {
        let a = self.start_angle.to_radians();
        self.center
            .offset(self.radius * a.cos(), self.radius * a.sin())
    }

    pub fn end_point(&self) -> Point {
        let a = (self.start_angle + self.sweep).to_radians();
        self.center
            .offset(self.radius * a.cos(), self.radius * a.sin())
    }

    /// Append the arc as cubic curves to an open builder whose pen is at the arc start.
    pub fn append_to(&self, builder: &mut Builder) {
        self.geometry().for_each_cubic_bezier(&mut |seg| {
            builder.cubic_bezier_to(seg.ctrl1, seg.ctrl2, seg.to);
        });
    }

    /// The arc as a standalone open path.
    pub fn to_path(&self) -> lyon::path::Path {
        let mut builder = lyon::path::Path::builder();
        builder.begin(to_lyon(self.start_point()));
        self.append_to(&mut builder);
        builder.end(false);
        builder.build()
    }
}

/// Centre of an arc. Single-quadrant offsets are unsigned, so the sign of
/// each is chosen from the direction of travel.
pub fn arc_center(
    from: Point,
    to: Point,
    (i, j): (f64, f64),
    direction: ArcDirection,
    quadrant: QuadrantMode,
) -> Point {
    match (quadrant, direction) {
        (QuadrantMode::Multi, _) => from.offset(i, j),
        (QuadrantMode::Single, ArcDirection::CounterClockwise) => {
            let cy = if from.x < to.x { from.y + j } else { from.y - j };
            let cx = if from.y < to.y { from.x - i } else { from.x + i };
            Point::new(cx, cy)
        }
        (QuadrantMode::Single, ArcDirection::Clockwise) => {
            let cy = if from.x < to.x { from.y - j } else { from.y + j };
            let cx = if from.y < to.y { from.x + i } else { from.x - i };
            Point::new(cx, cy)
        }
    }
}

/// Angle of `p` around `center` in degrees, normalised to `[0, 360)`.
pub fn point_angle(center: Point, p: Point) -> f64 {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    let mut angle = if dx == 0.0 {
        if dy > 0.0 {
            90.0
        } else {
            270.0
        }
    } else {
        (dy / dx).atan().to_degrees()
    };
    if p.x < center.x {
        angle += 180.0;
    }
    if angle < 0.0 {
        angle += 360.0;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_point_angle_quadrants() {
        let c = Point::new(0.0, 0.0);
        assert!(close(point_angle(c, Point::new(1.0, 0.0)), 0.0));
        assert!(close(point_angle(c, Point::new(0.0, 1.0)), 90.0));
        assert!(close(point_angle(c, Point::new(-1.0, 0.0)), 180.0));
        assert!(close(point_angle(c, Point::new(0.0, -1.0)), 270.0));
        assert!(close(point_angle(c, Point::new(1.0, -1.0)), 315.0));
        assert!(close(point_angle(c, Point::new(-1.0, 1.0)), 135.0));
    }

    #[test]
    fn test_multi_quadrant_counter_clockwise() {
        let arc = ArcSegment::resolve(
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            (-1.0, 0.0),
            ArcDirection::CounterClockwise,
            QuadrantMode::Multi,
        );
        assert_eq!(arc.center, Point::new(0.0, 0.0));
        assert!(close(arc.radius, 1.0));
        assert!(close(arc.start_angle, 0.0));
        assert!(close(arc.sweep, 90.0));
    }

    #[test]
    fn test_multi_quadrant_clockwise() {
        let arc = ArcSegment::resolve(
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            (-1.0, 0.0),
            ArcDirection::Clockwise,
            QuadrantMode::Multi,
        );
        assert!(close(arc.sweep, -270.0));
        let end = arc.end_point();
        assert!((end.x - 0.0).abs() < 1e-9 && (end.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_circle_when_endpoints_meet() {
        let arc = ArcSegment::resolve(
            Point::new(1.0, 0.0),
            Point::new(1.0, 0.0),
            (-1.0, 0.0),
            ArcDirection::CounterClockwise,
            QuadrantMode::Multi,
        );
        assert!(close(arc.sweep, 360.0));
    }

    #[test]
    fn test_single_quadrant_sign_table() {
        let from = Point::new(1.0, 0.0);
        let up_left = Point::new(0.0, 1.0);
        // CCW, moving left and up: cy = y - j, cx = x - i
        assert_eq!(
            arc_center(from, up_left, (1.0, 0.0), ArcDirection::CounterClockwise, QuadrantMode::Single),
            Point::new(0.0, 0.0)
        );
        // CW, moving left and up: cy = y + j, cx = x + i
        assert_eq!(
            arc_center(from, up_left, (1.0, 1.0), ArcDirection::Clockwise, QuadrantMode::Single),
            Point::new(2.0, 1.0)
        );
        let down_right = Point::new(2.0, -1.0);
        // CCW, moving right and down: cy = y + j, cx = x + i
        assert_eq!(
            arc_center(from, down_right, (0.0, 1.0), ArcDirection::CounterClockwise, QuadrantMode::Single),
            Point::new(1.0, 1.0)
        );
        // CW, moving right and down: cy = y - j, cx = x - i
        assert_eq!(
            arc_center(from, down_right, (1.0, 0.0), ArcDirection::Clockwise, QuadrantMode::Single),
            Point::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_arc_path_endpoints() {
        let arc = ArcSegment::resolve(
            Point::new(0.0, -1.0),
            Point::new(0.0, 1.0),
            (0.0, 1.0),
            ArcDirection::CounterClockwise,
            QuadrantMode::Multi,
        );
        assert!(close(arc.start_angle, 270.0));
        assert!(close(arc.sweep, 180.0));
        let path = arc.to_path();
        let bb = lyon::algorithms::aabb::bounding_box(path.iter());
        assert!((bb.max.x - 1.0).abs() < 1e-3);
        assert!(bb.min.x > -1e-3);
    }
}
