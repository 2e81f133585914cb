//! Shapes emitted by the interpreter.
//!
//! Every shape lives in board space (inches, Y up). Paths use lyon's `f32`
//! geometry, which is plenty for board-sized coordinates.

use lyon::geom::Arc;
use lyon::math::{point, vector, Angle};
use lyon::path::Path;
use pcbexpose_core::Point;

/// Whether a shape adds or removes material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Dark,
    Clear,
}

impl Default for Polarity {
    fn default() -> Self {
        Self::Dark
    }
}

impl Polarity {
    pub fn inverse(self) -> Self {
        match self {
            Self::Dark => Self::Clear,
            Self::Clear => Self::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

#[derive(Debug, Clone)]
pub enum Shape {
    /// Axis-aligned ellipse; a circle when `width == height`.
    Ellipse {
        center: Point,
        width: f64,
        height: f64,
    },
    Rectangle {
        center: Point,
        width: f64,
        height: f64,
    },
    RoundedRectangle {
        center: Point,
        width: f64,
        height: f64,
        radius: f64,
    },
    /// Filled closed path: polygons, outlines and regions.
    Outline(Path),
    /// Path stroked at `width`.
    Stroke { path: Path, width: f64, cap: LineCap },
}

impl Shape {
    pub fn circle(center: Point, diameter: f64) -> Self {
        Self::Ellipse {
            center,
            width: diameter,
            height: diameter,
        }
    }

    /// Axis-aligned extent as (min, max) corners.
    pub fn bounds(&self) -> (Point, Point) {
        match self {
            Shape::Ellipse {
                center,
                width,
                height,
            }
            | Shape::Rectangle {
                center,
                width,
                height,
            }
            | Shape::RoundedRectangle {
                center,
                width,
                height,
                ..
            } => (
                center.offset(-width / 2.0, -height / 2.0),
                center.offset(width / 2.0, height / 2.0),
            ),
            Shape::Outline(path) => path_bounds(path, 0.0),
            Shape::Stroke { path, width, .. } => path_bounds(path, width / 2.0),
        }
    }

    /// Closed outline of the filled area. For strokes this is the centreline.
    pub fn to_path(&self) -> Path {
        match self {
            Shape::Ellipse {
                center,
                width,
                height,
            } => ellipse_path(*center, width / 2.0, height / 2.0),
            Shape::Rectangle {
                center,
                width,
                height,
            } => rectangle_path(*center, *width, *height),
            Shape::RoundedRectangle {
                center,
                width,
                height,
                radius,
            } => rounded_rectangle_path(*center, *width, *height, *radius),
            Shape::Outline(path) | Shape::Stroke { path, .. } => path.clone(),
        }
    }

    pub fn is_ellipse(&self) -> bool {
        matches!(self, Shape::Ellipse { .. })
    }
}

/// A shape and the polarity it was emitted with. Never modified after emission.
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub shape: Shape,
    pub polarity: Polarity,
}

impl DrawItem {
    pub fn new(shape: Shape, polarity: Polarity) -> Self {
        Self { shape, polarity }
    }

    pub fn is_dark(&self) -> bool {
        self.polarity == Polarity::Dark
    }
}

fn path_bounds(path: &Path, inflate: f64) -> (Point, Point) {
    let bb = lyon::algorithms::aabb::bounding_box(path.iter());
    (
        Point::new(bb.min.x as f64 - inflate, bb.min.y as f64 - inflate),
        Point::new(bb.max.x as f64 + inflate, bb.max.y as f64 + inflate),
    )
}

pub(crate) fn to_lyon(p: Point) -> lyon::math::Point {
    point(p.x as f32, p.y as f32)
}

pub fn ellipse_path(center: Point, rx: f64, ry: f64) -> Path {
    let mut builder = Path::builder();
    let center = to_lyon(center);
    let radii = vector(rx as f32, ry as f32);
    builder.begin(center + vector(radii.x, 0.0));

    let arc = Arc {
        center,
        radii,
        x_rotation: Angle::radians(0.0),
        start_angle: Angle::radians(0.0),
        sweep_angle: Angle::radians(2.0 * std::f32::consts::PI),
    };
    arc.for_each_cubic_bezier(&mut |seg| {
        builder.cubic_bezier_to(seg.ctrl1, seg.ctrl2, seg.to);
    });
    builder.close();
    builder.build()
}

pub fn rectangle_path(center: Point, width: f64, height: f64) -> Path {
    let (hw, hh) = (width / 2.0, height / 2.0);
    polygon_path(&[
        center.offset(-hw, -hh),
        center.offset(hw, -hh),
        center.offset(hw, hh),
        center.offset(-hw, hh),
    ])
}

/// Rectangle with quarter-circle corners of `radius`.
pub fn rounded_rectangle_path(center: Point, width: f64, height: f64, radius: f64) -> Path {
    let radius = radius.clamp(0.0, width.min(height) / 2.0);
    if radius <= 0.0 {
        return rectangle_path(center, width, height);
    }
    let (hw, hh) = ((width / 2.0 - radius) as f32, (height / 2.0 - radius) as f32);
    let c = to_lyon(center);
    let r = radius as f32;

    // Corner centres counter-clockwise from bottom-right, with the angle each corner starts at.
    let corners = [
        (c + vector(hw, -hh), -90.0f32),
        (c + vector(hw, hh), 0.0),
        (c + vector(-hw, hh), 90.0),
        (c + vector(-hw, -hh), 180.0),
    ];

    let mut builder = Path::builder();
    builder.begin(c + vector(-hw, -hh - r));
    for (corner, start) in corners {
        let arc = Arc {
            center: corner,
            radii: vector(r, r),
            x_rotation: Angle::radians(0.0),
            start_angle: Angle::degrees(start),
            sweep_angle: Angle::degrees(90.0),
        };
        builder.line_to(arc.from());
        arc.for_each_cubic_bezier(&mut |seg| {
            builder.cubic_bezier_to(seg.ctrl1, seg.ctrl2, seg.to);
        });
    }
    builder.close();
    builder.build()
}

/// Closed polygon through `points`; an empty path for fewer than three points.
pub fn polygon_path(points: &[Point]) -> Path {
    let mut builder = Path::builder();
    if points.len() >= 3 {
        builder.begin(to_lyon(points[0]));
        for p in &points[1..] {
            builder.line_to(to_lyon(*p));
        }
        builder.close();
    }
    builder.build()
}

/// Open two-point path.
pub fn line_path(from: Point, to: Point) -> Path {
    let mut builder = Path::builder();
    builder.begin(to_lyon(from));
    builder.line_to(to_lyon(to));
    builder.end(false);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_ellipse_bounds() {
        let shape = Shape::circle(Point::new(1.0, 2.0), 0.5);
        let (min, max) = shape.bounds();
        assert_eq!(min, Point::new(0.75, 1.75));
        assert_eq!(max, Point::new(1.25, 2.25));
        assert!(shape.is_ellipse());
    }

    #[test]
    fn test_ellipse_path_matches_bounds() {
        let path = ellipse_path(Point::new(0.0, 0.0), 2.0, 1.0);
        let (min, max) = Shape::Outline(path).bounds();
        assert!(close(min.x, -2.0) && close(max.x, 2.0));
        assert!(min.y >= -1.0001 && max.y <= 1.0001);
    }

    #[test]
    fn test_stroke_bounds_include_half_width() {
        let shape = Shape::Stroke {
            path: line_path(Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
            width: 0.2,
            cap: LineCap::Round,
        };
        let (min, max) = shape.bounds();
        assert!(close(min.x, -0.1) && close(min.y, -0.1));
        assert!(close(max.x, 1.1) && close(max.y, 0.1));
    }

    #[test]
    fn test_rounded_rectangle_path_extent() {
        let path = rounded_rectangle_path(Point::new(0.0, 0.0), 2.0, 1.0, 0.5);
        let (min, max) = Shape::Outline(path).bounds();
        assert!(close(min.x, -1.0) && close(max.x, 1.0));
        assert!(close(min.y, -0.5) && close(max.y, 0.5));
    }

    #[test]
    fn test_polygon_path_needs_three_points() {
        let path = polygon_path(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert_eq!(path.iter().count(), 0);
    }

    #[test]
    fn test_polarity_inverse() {
        assert_eq!(Polarity::Dark.inverse(), Polarity::Clear);
        assert_eq!(Polarity::default(), Polarity::Dark);
    }
}
