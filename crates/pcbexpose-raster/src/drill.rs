//! Cutting drill clearances into an already rendered layer.

use crate::error::{RasterError, RasterResult};
use crate::rasterizer::{image_to_pixmap, pixmap_to_image, Correction, Rasterizer};
use image::RgbaImage;
use pcbexpose_core::Bounds;
use pcbexpose_gerber::{DrawItem, Polarity, Shape};

/// How drill pads are cut into the target raster.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrillOverlay {
    /// Replacement hole diameter in inches. `None` erases each whole pad.
    pub hole_diameter: Option<f64>,
    /// Correction applied to the drill shapes, normally the one used for
    /// the layer underneath.
    pub correction: Option<Correction>,
}

impl DrillOverlay {
    pub fn full_pads() -> Self {
        Self::default()
    }

    pub fn with_hole_diameter(diameter: f64) -> Self {
        Self {
            hole_diameter: Some(diameter),
            correction: None,
        }
    }

    pub fn corrected(mut self, correction: Correction) -> Self {
        self.correction = Some(correction);
        self
    }

    /// The shape erased for one drill item, if it is a dark plain ellipse.
    pub fn cutout(&self, item: &DrawItem) -> Option<Shape> {
        if item.polarity != Polarity::Dark {
            return None;
        }
        match &item.shape {
            Shape::Ellipse { center, .. } => Some(match self.hole_diameter {
                Some(diameter) if diameter > 0.0 => Shape::circle(*center, diameter),
                _ => item.shape.clone(),
            }),
            _ => None,
        }
    }
}

impl Rasterizer {
    /// Erase the drill pads of `drills` from `image`.
    ///
    /// `bounds` must be the frame `image` was rendered with, so both layers
    /// share pixel positions.
    pub fn overlay_drills(
        &self,
        image: &RgbaImage,
        drills: &[DrawItem],
        bounds: &Bounds,
        overlay: &DrillOverlay,
    ) -> RasterResult<RgbaImage> {
        let expected = (self.options().width, self.options().height);
        if image.dimensions() != expected {
            return Err(RasterError::SizeMismatch {
                expected,
                actual: image.dimensions(),
            });
        }

        let mut pixmap = image_to_pixmap(image)?;
        let transform = self.board_transform(bounds, overlay.correction.as_ref());
        let mut cut = 0usize;
        for shape in drills.iter().filter_map(|item| overlay.cutout(item)) {
            self.paint(&mut pixmap, &shape, Polarity::Clear, transform);
            cut += 1;
        }
        tracing::info!(holes = cut, "Overlaid drills");
        Ok(pixmap_to_image(&pixmap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::RenderOptions;
    use pcbexpose_core::Point;

    fn pad(x: f64, y: f64, diameter: f64) -> DrawItem {
        DrawItem::new(Shape::circle(Point::new(x, y), diameter), Polarity::Dark)
    }

    #[test]
    fn test_cutout_only_for_dark_ellipses() {
        let overlay = DrillOverlay::full_pads();
        assert!(overlay.cutout(&pad(0.0, 0.0, 0.1)).is_some());

        let clear = DrawItem::new(Shape::circle(Point::new(0.0, 0.0), 0.1), Polarity::Clear);
        assert!(overlay.cutout(&clear).is_none());

        let rect = DrawItem::new(
            Shape::Rectangle {
                center: Point::new(0.0, 0.0),
                width: 0.1,
                height: 0.1,
            },
            Polarity::Dark,
        );
        assert!(overlay.cutout(&rect).is_none());
    }

    #[test]
    fn test_replacement_hole_is_concentric() {
        let overlay = DrillOverlay::with_hole_diameter(0.02);
        match overlay.cutout(&pad(1.0, 2.0, 0.1)) {
            Some(Shape::Ellipse {
                center,
                width,
                height,
            }) => {
                assert_eq!(center, Point::new(1.0, 2.0));
                assert_eq!(width, 0.02);
                assert_eq!(height, 0.02);
            }
            other => panic!("expected ellipse, got {:?}", other),
        }
    }

    #[test]
    fn test_overlay_erases_pad_center() {
        let r = Rasterizer::new(RenderOptions::new(40, 40, 20.0, 20.0)).unwrap();
        let copper = vec![DrawItem::new(
            Shape::Rectangle {
                center: Point::new(1.0, 1.0),
                width: 2.0,
                height: 2.0,
            },
            Polarity::Dark,
        )];
        let mut bounds = Bounds::new();
        bounds.include_rect(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
        let image = r.render(&copper, &bounds).unwrap();

        let drilled = r
            .overlay_drills(
                &image,
                &[pad(1.0, 1.0, 0.5)],
                &bounds,
                &DrillOverlay::with_hole_diameter(0.2),
            )
            .unwrap();
        assert_eq!(drilled.get_pixel(20, 20).0[3], 0);
        // outside the 0.2 hole, still on the pad
        assert_eq!(drilled.get_pixel(20, 25).0[3], 255);
    }

    #[test]
    fn test_overlay_rejects_mismatched_image() {
        let r = Rasterizer::new(RenderOptions::new(10, 10, 20.0, 20.0)).unwrap();
        let err = r
            .overlay_drills(
                &RgbaImage::new(5, 5),
                &[],
                &Bounds::new(),
                &DrillOverlay::full_pads(),
            )
            .unwrap_err();
        assert!(matches!(err, RasterError::SizeMismatch { .. }));
    }
}
