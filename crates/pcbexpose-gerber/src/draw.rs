//! Turning apertures into shapes: flashes (D03), linear strokes and arcs (D01).

use lyon::math::{Angle, Transform};
use pcbexpose_core::Point;
use tracing::warn;

use crate::aperture::{Aperture, ApertureKind};
use crate::arc::ArcSegment;
use crate::shape::{line_path, polygon_path, DrawItem, LineCap, Polarity, Shape};

/// Shapes produced by flashing `aperture` at `at`.
pub fn flash(aperture: &Aperture, at: Point, polarity: Polarity) -> Vec<DrawItem> {
    let mut items = Vec::new();
    let p = |i| aperture.param_or(i, 0.0);

    let hole_index = match aperture.kind {
        ApertureKind::Circle => {
            items.push(DrawItem::new(Shape::circle(at, p(0)), polarity));
            Some(1)
        }
        ApertureKind::Rectangle => {
            items.push(DrawItem::new(
                Shape::Rectangle {
                    center: at,
                    width: p(0),
                    height: p(1),
                },
                polarity,
            ));
            Some(2)
        }
        ApertureKind::Obround => {
            items.push(DrawItem::new(
                Shape::RoundedRectangle {
                    center: at,
                    width: p(0),
                    height: p(1),
                    radius: p(0).min(p(1)) / 2.0,
                },
                polarity,
            ));
            Some(2)
        }
        ApertureKind::Polygon => {
            let sides = p(1).round().max(3.0) as usize;
            let points = regular_polygon(Point::default(), p(0) / 2.0, sides, p(2));
            let path = polygon_path(&points).transformed(&translate(at));
            items.push(DrawItem::new(Shape::Outline(path), polarity));
            Some(3)
        }
        _ => {
            if let Some(item) = flash_primitive(aperture, at, polarity) {
                items.push(item);
            }
            None
        }
    };

    if let Some(hole) = hole_index.and_then(|i| aperture.param(i)) {
        if hole > 0.0 {
            items.push(DrawItem::new(Shape::circle(at, hole), Polarity::Clear));
        }
    }

    items
}

/// Macro primitives: parameter 0 is the exposure flag, the last one the rotation.
fn flash_primitive(aperture: &Aperture, at: Point, polarity: Polarity) -> Option<DrawItem> {
    let p = |i| aperture.param_or(i, 0.0);
    let polarity = if p(0) == 0.0 {
        polarity.inverse()
    } else {
        polarity
    };

    let shape = match aperture.kind {
        ApertureKind::MacroCircle => Shape::circle(at.offset(p(2), p(3)), p(1)),
        ApertureKind::MacroVectorLine => {
            let (start, end) = (Point::new(p(2), p(3)), Point::new(p(4), p(5)));
            let length = start.distance_to(&end);
            if length == 0.0 {
                warn!("zero-length vector line primitive skipped");
                return None;
            }
            let half = p(1) / 2.0;
            let (nx, ny) = (
                -(end.y - start.y) / length * half,
                (end.x - start.x) / length * half,
            );
            let corners = [
                start.offset(nx, ny),
                end.offset(nx, ny),
                end.offset(-nx, -ny),
                start.offset(-nx, -ny),
            ];
            Shape::Outline(polygon_path(&corners).transformed(&placement(p(6), at)))
        }
        ApertureKind::MacroCenterLine => {
            let (hw, hh) = (p(1) / 2.0, p(2) / 2.0);
            let center = Point::new(p(3), p(4));
            let corners = [
                center.offset(-hw, -hh),
                center.offset(hw, -hh),
                center.offset(hw, hh),
                center.offset(-hw, hh),
            ];
            Shape::Outline(polygon_path(&corners).transformed(&placement(p(5), at)))
        }
        ApertureKind::MacroOutline => {
            let Some(count) = aperture.outline_points() else {
                warn!(
                    "outline primitive declares {} points but has {} parameters",
                    p(1),
                    aperture.params.len()
                );
                return None;
            };
            let rotation_index = 2 + 2 * count;
            let points: Vec<Point> = (0..count)
                .map(|i| Point::new(p(2 + 2 * i), p(3 + 2 * i)))
                .collect();
            Shape::Outline(polygon_path(&points).transformed(&placement(p(rotation_index), at)))
        }
        ApertureKind::MacroPolygon => {
            let sides = p(1).round().max(3.0) as usize;
            let points = regular_polygon(Point::new(p(2), p(3)), p(4) / 2.0, sides, 0.0);
            Shape::Outline(polygon_path(&points).transformed(&placement(p(5), at)))
        }
        ApertureKind::MacroMoire | ApertureKind::MacroThermal => {
            warn!("macro primitive {:?} is not rendered", aperture.kind);
            return None;
        }
        ApertureKind::Circle
        | ApertureKind::Rectangle
        | ApertureKind::Obround
        | ApertureKind::Polygon => return None,
    };

    Some(DrawItem::new(shape, polarity))
}

/// Stroke `aperture` along the straight segment `from`..`to`.
pub fn interpolate(aperture: &Aperture, from: Point, to: Point, polarity: Polarity) -> Vec<DrawItem> {
    match aperture.kind {
        ApertureKind::Circle => vec![DrawItem::new(
            Shape::Stroke {
                path: line_path(from, to),
                width: aperture.param_or(0, 0.0),
                cap: LineCap::Round,
            },
            polarity,
        )],
        ApertureKind::Rectangle => {
            let (w, h) = (aperture.param_or(0, 0.0), aperture.param_or(1, 0.0));
            let pad = |center| Shape::Rectangle {
                center,
                width: w,
                height: h,
            };
            vec![
                DrawItem::new(
                    Shape::Stroke {
                        path: line_path(from, to),
                        width: (w * w + h * h).sqrt(),
                        cap: LineCap::Butt,
                    },
                    polarity,
                ),
                DrawItem::new(pad(from), polarity),
                DrawItem::new(pad(to), polarity),
            ]
        }
        kind => {
            warn!("cannot interpolate with {:?} aperture", kind);
            Vec::new()
        }
    }
}

/// Stroke `aperture` along an arc with round caps.
pub fn stroke_arc(aperture: &Aperture, arc: &ArcSegment, polarity: Polarity) -> Vec<DrawItem> {
    if aperture.kind.is_macro() {
        warn!("cannot draw arcs with {:?} aperture", aperture.kind);
        return Vec::new();
    }
    vec![DrawItem::new(
        Shape::Stroke {
            path: arc.to_path(),
            width: aperture.param_or(0, 0.0),
            cap: LineCap::Round,
        },
        polarity,
    )]
}

/// Vertices of a regular polygon, the first at `start_deg`.
fn regular_polygon(center: Point, radius: f64, sides: usize, start_deg: f64) -> Vec<Point> {
    (0..sides)
        .map(|k| {
            let theta = (start_deg + 360.0 * k as f64 / sides as f64).to_radians();
            center.offset(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

fn translate(at: Point) -> Transform {
    Transform::translation(at.x as f32, at.y as f32)
}

/// Rotate by `360 - rotation_deg` about the macro origin, which then sits at `at`.
fn placement(rotation_deg: f64, at: Point) -> Transform {
    Transform::rotation(Angle::degrees((360.0 - rotation_deg) as f32)).then(&translate(at))
}
