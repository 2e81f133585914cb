//! Turning a rendered layer into the mask shown on the exposure screen.

use image::{imageops, Rgb, RgbImage, RgbaImage};
use pcbexpose_core::Material;

const LIT: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const DARK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);

/// Coverage at or above this alpha counts as ink.
const COVERAGE_THRESHOLD: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExposureOptions {
    /// Flip horizontally, for boards exposed face down.
    pub mirror: bool,
    /// Screen bezel margin in pixels.
    pub margin_x: i32,
    pub margin_y: i32,
    pub material: Material,
}

/// Build the full-resolution mask: lit where the layer has ink (or where it
/// has none, for positive resist), shifted by the bezel margin. A mirrored
/// layer shifts left instead of right.
pub fn finish_exposure(layer: &RgbaImage, options: &ExposureOptions) -> RgbImage {
    let (width, height) = layer.dimensions();
    let invert = options.material.inverts();
    let background = if invert { LIT } else { DARK };
    let mut out = RgbImage::from_pixel(width, height, background);

    let shift_x = if options.mirror {
        -options.margin_x
    } else {
        options.margin_x
    };

    for (x, y, pixel) in layer.enumerate_pixels() {
        let source_x = if options.mirror { width - 1 - x } else { x };
        let dx = source_x as i64 + shift_x as i64;
        let dy = y as i64 + options.margin_y as i64;
        if dx < 0 || dy < 0 || dx >= width as i64 || dy >= height as i64 {
            continue;
        }
        let inked = pixel.0[3] >= COVERAGE_THRESHOLD;
        out.put_pixel(dx as u32, dy as u32, if inked != invert { LIT } else { DARK });
    }

    tracing::debug!(
        mirror = options.mirror,
        material = %options.material,
        "Finished exposure mask"
    );
    out
}

/// The preview image stored alongside the mask: the layer itself, mirrored
/// when the mask is.
pub fn preview_image(layer: &RgbaImage, mirror: bool) -> RgbaImage {
    if mirror {
        imageops::flip_horizontal(layer)
    } else {
        layer.clone()
    }
}
