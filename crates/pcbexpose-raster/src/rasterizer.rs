//! Paints draw items into a pixel buffer.
//!
//! Board space is inches with Y up; the raster has its origin at the top
//! left. The framing transform maps the minimum X of the bounds to column 0
//! and the maximum Y to row 0, so every layer interpreted against the same
//! [`Bounds`] lands on the same pixels.

use crate::error::{RasterError, RasterResult};
use image::{Rgba, RgbaImage};
use lyon::path::{Event, Path};
use pcbexpose_core::{mm_to_inches, Bounds};
use pcbexpose_gerber::{DrawItem, LineCap, Polarity, Shape};
use tiny_skia::{
    BlendMode, Color, ColorU8, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

/// Default ink: copper red.
pub const DEFAULT_INK: [u8; 3] = [0xff, 0x00, 0x00];

/// Target raster size and density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Horizontal pixels per inch.
    pub ppi_x: f64,
    /// Vertical pixels per inch.
    pub ppi_y: f64,
    /// RGB color used for dark items.
    pub ink: [u8; 3],
}

impl RenderOptions {
    pub fn new(width: u32, height: u32, ppi_x: f64, ppi_y: f64) -> Self {
        Self {
            width,
            height,
            ppi_x,
            ppi_y,
            ink: DEFAULT_INK,
        }
    }

    pub fn with_ink(mut self, ink: [u8; 3]) -> Self {
        self.ink = ink;
        self
    }

    pub fn validate(&self) -> RasterResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(self.ppi_x) || !usable(self.ppi_y) {
            return Err(RasterError::InvalidDensity {
                x: self.ppi_x,
                y: self.ppi_y,
            });
        }
        Ok(())
    }
}

/// Panel alignment correction applied in board space before framing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Correction {
    /// Shift to the right, in millimetres.
    pub offset_x_mm: f64,
    /// Shift toward the bottom of the image, in millimetres.
    pub offset_y_mm: f64,
    /// Counter-clockwise rotation about the bounds' minimum corner.
    pub rotation_deg: f64,
}

impl Correction {
    pub fn new(offset_x_mm: f64, offset_y_mm: f64, rotation_deg: f64) -> Self {
        Self {
            offset_x_mm,
            offset_y_mm,
            rotation_deg,
        }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn is_identity(&self) -> bool {
        self.offset_x_mm == 0.0 && self.offset_y_mm == 0.0 && self.rotation_deg == 0.0
    }

    /// Board-space transform: rotate about `(min_x, min_y)`, then translate.
    pub fn transform(&self, bounds: &Bounds) -> Transform {
        let pivot_x = bounds.min_x() as f32;
        let pivot_y = bounds.min_y() as f32;
        Transform::from_rotate_at(self.rotation_deg as f32, pivot_x, pivot_y).post_translate(
            mm_to_inches(self.offset_x_mm) as f32,
            -mm_to_inches(self.offset_y_mm) as f32,
        )
    }
}

/// Renders draw item lists at a fixed size and density.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    options: RenderOptions,
}

impl Rasterizer {
    pub fn new(options: RenderOptions) -> RasterResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Board to pixel transform for `bounds`.
    pub fn frame(&self, bounds: &Bounds) -> Transform {
        let sx = self.options.ppi_x as f32;
        let sy = self.options.ppi_y as f32;
        Transform::from_row(
            sx,
            0.0,
            0.0,
            -sy,
            -(bounds.min_x() as f32) * sx,
            bounds.max_y() as f32 * sy,
        )
    }

    /// Framing preceded by the optional correction.
    pub fn board_transform(&self, bounds: &Bounds, correction: Option<&Correction>) -> Transform {
        let frame = self.frame(bounds);
        match correction {
            Some(c) if !c.is_identity() => c.transform(bounds).post_concat(frame),
            _ => frame,
        }
    }

    pub fn render(&self, items: &[DrawItem], bounds: &Bounds) -> RasterResult<RgbaImage> {
        self.render_with(items, bounds, None)
    }

    pub fn render_corrected(
        &self,
        items: &[DrawItem],
        bounds: &Bounds,
        correction: &Correction,
    ) -> RasterResult<RgbaImage> {
        self.render_with(items, bounds, Some(correction))
    }

    fn render_with(
        &self,
        items: &[DrawItem],
        bounds: &Bounds,
        correction: Option<&Correction>,
    ) -> RasterResult<RgbaImage> {
        let mut pixmap = self.blank_pixmap()?;
        let transform = self.board_transform(bounds, correction);
        for item in items {
            self.paint(&mut pixmap, &item.shape, item.polarity, transform);
        }
        tracing::info!(
            items = items.len(),
            width = self.options.width,
            height = self.options.height,
            "Rendered layer"
        );
        Ok(pixmap_to_image(&pixmap))
    }

    pub(crate) fn blank_pixmap(&self) -> RasterResult<Pixmap> {
        Pixmap::new(self.options.width, self.options.height).ok_or(
            RasterError::InvalidResolution {
                width: self.options.width,
                height: self.options.height,
            },
        )
    }

    /// Composite one shape: dark is source-over in the ink color, clear erases.
    pub(crate) fn paint(
        &self,
        pixmap: &mut Pixmap,
        shape: &Shape,
        polarity: Polarity,
        transform: Transform,
    ) {
        let mut paint = Paint::default();
        paint.anti_alias = true;
        match polarity {
            Polarity::Dark => {
                let [r, g, b] = self.options.ink;
                paint.set_color(Color::from_rgba8(r, g, b, 255));
                paint.blend_mode = BlendMode::SourceOver;
            }
            Polarity::Clear => {
                paint.set_color(Color::BLACK);
                paint.blend_mode = BlendMode::Clear;
            }
        }

        let Some(path) = to_skia_path(&shape.to_path()) else {
            tracing::trace!("Skipping empty shape");
            return;
        };

        match shape {
            Shape::Stroke { width, cap, .. } => {
                let stroke = Stroke {
                    width: *width as f32,
                    line_cap: match cap {
                        LineCap::Butt => tiny_skia::LineCap::Butt,
                        LineCap::Round => tiny_skia::LineCap::Round,
                    },
                    line_join: tiny_skia::LineJoin::Round,
                    ..Default::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, transform, None);
            }
            _ => pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None),
        }
    }
}

/// Convert a lyon path to a tiny-skia path; `None` when it has no segments.
pub fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for event in path.iter() {
        match event {
            Event::Begin { at } => pb.move_to(at.x, at.y),
            Event::Line { to, .. } => pb.line_to(to.x, to.y),
            Event::Quadratic { ctrl, to, .. } => pb.quad_to(ctrl.x, ctrl.y, to.x, to.y),
            Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => pb.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y),
            Event::End { close, .. } => {
                if close {
                    pb.close();
                }
            }
        }
    }
    pb.finish()
}

pub fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();
    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let c = pixels[(y * width + x) as usize].demultiply();
        Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}

pub fn image_to_pixmap(image: &RgbaImage) -> RasterResult<Pixmap> {
    let mut pixmap =
        Pixmap::new(image.width(), image.height()).ok_or(RasterError::InvalidResolution {
            width: image.width(),
            height: image.height(),
        })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcbexpose_core::Point;

    fn board(min: Point, max: Point) -> Bounds {
        let mut bounds = Bounds::new();
        bounds.include_rect(min, max);
        bounds
    }

    #[test]
    fn test_options_validation() {
        assert!(RenderOptions::new(0, 10, 100.0, 100.0).validate().is_err());
        assert!(matches!(
            RenderOptions::new(10, 10, 0.0, 100.0).validate(),
            Err(RasterError::InvalidDensity { .. })
        ));
        assert!(RenderOptions::new(10, 10, 100.0, f64::NAN).validate().is_err());
        assert!(RenderOptions::new(10, 10, 100.0, 100.0).validate().is_ok());
    }

    #[test]
    fn test_frame_maps_corners() {
        let r = Rasterizer::new(RenderOptions::new(100, 100, 10.0, 20.0)).unwrap();
        let bounds = board(Point::new(1.0, 2.0), Point::new(3.0, 4.0));
        let frame = r.frame(&bounds);

        let mut pts = [
            tiny_skia::Point::from_xy(1.0, 4.0),
            tiny_skia::Point::from_xy(3.0, 2.0),
        ];
        frame.map_points(&mut pts);
        assert!((pts[0].x - 0.0).abs() < 1e-4 && (pts[0].y - 0.0).abs() < 1e-4);
        assert!((pts[1].x - 20.0).abs() < 1e-4 && (pts[1].y - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_correction_offsets_in_mm() {
        let bounds = board(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let c = Correction::new(25.4, 25.4, 0.0);
        let mut pts = [tiny_skia::Point::from_xy(0.5, 0.5)];
        c.transform(&bounds).map_points(&mut pts);
        assert!((pts[0].x - 1.5).abs() < 1e-5);
        assert!((pts[0].y + 0.5).abs() < 1e-5);
        assert!(Correction::identity().is_identity());
    }

    #[test]
    fn test_correction_rotates_about_minimum() {
        let bounds = board(Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        let c = Correction::new(0.0, 0.0, 90.0);
        let mut pts = [tiny_skia::Point::from_xy(2.0, 1.0)];
        c.transform(&bounds).map_points(&mut pts);
        assert!((pts[0].x - 1.0).abs() < 1e-5);
        assert!((pts[0].y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_dark_then_clear() {
        let r = Rasterizer::new(RenderOptions::new(20, 20, 10.0, 10.0)).unwrap();
        let items = vec![
            DrawItem::new(
                Shape::Rectangle {
                    center: Point::new(1.0, 1.0),
                    width: 2.0,
                    height: 2.0,
                },
                Polarity::Dark,
            ),
            DrawItem::new(Shape::circle(Point::new(1.0, 1.0), 0.6), Polarity::Clear),
        ];
        let bounds = board(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
        let image = r.render(&items, &bounds).unwrap();

        assert_eq!(image.dimensions(), (20, 20));
        assert_eq!(image.get_pixel(2, 2).0, [0xff, 0x00, 0x00, 0xff]);
        assert_eq!(image.get_pixel(10, 10).0[3], 0);
    }

    #[test]
    fn test_pixmap_image_round_trip() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(1, 1, Rgba([10, 200, 30, 255]));
        let back = pixmap_to_image(&image_to_pixmap(&image).unwrap());
        assert_eq!(back.get_pixel(1, 1).0, [10, 200, 30, 255]);
        assert_eq!(back.get_pixel(0, 0).0[3], 0);
    }
}
