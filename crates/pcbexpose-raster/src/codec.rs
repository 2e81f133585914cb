//! Run-length coding of 15-bit color images.
//!
//! Each run starts with a little-endian color word:
//!
//! ```text
//! 15      11 10       6   5   4       0
//! [ red 5  ][ green 5 ][F][ blue 5   ]
//! ```
//!
//! `F` set means a second little-endian word follows whose low 12 bits hold
//! `count - 1`. Single pixels carry no length word.

use crate::error::{RasterError, RasterResult};
use image::{Rgb, RgbImage, RgbaImage};

/// "Run follows" flag in the color word.
pub const RUN_FLAG: u16 = 0x0020;

/// Longest run a length word can describe.
pub const MAX_RUN: usize = 0x1000;

/// Pack an 8-bit RGB color into a color word without the run flag.
pub fn color_word(rgb: [u8; 3]) -> u16 {
    let [r, g, b] = rgb.map(|c| (c >> 3) as u16);
    (r << 11) | (g << 6) | b
}

/// Expand a color word back to 8 bits per channel.
pub fn word_color(word: u16) -> [u8; 3] {
    [
        (((word >> 11) & 0x1f) << 3) as u8,
        (((word >> 6) & 0x1f) << 3) as u8,
        ((word & 0x1f) << 3) as u8,
    ]
}

/// The color a pixel decodes to after a round trip.
pub fn quantize(rgb: [u8; 3]) -> [u8; 3] {
    rgb.map(|c| c & 0xf8)
}

pub fn encode(image: &RgbImage) -> Vec<u8> {
    encode_pixels(image.pixels().map(|p| p.0))
}

/// Alpha is dropped; fully transparent pixels encode as black.
pub fn encode_rgba(image: &RgbaImage) -> Vec<u8> {
    encode_pixels(image.pixels().map(|p| {
        let [r, g, b, a] = p.0;
        if a == 0 {
            [0, 0, 0]
        } else {
            [r, g, b]
        }
    }))
}

/// Encode pixels given in row-major order.
pub fn encode_pixels<I>(pixels: I) -> Vec<u8>
where
    I: IntoIterator<Item = [u8; 3]>,
{
    let mut out = Vec::new();
    let mut run: Option<([u8; 3], usize)> = None;

    for pixel in pixels {
        run = match run {
            Some((color, count)) if color == pixel && count < MAX_RUN => Some((color, count + 1)),
            Some((color, count)) => {
                write_run(&mut out, color, count);
                Some((pixel, 1))
            }
            None => Some((pixel, 1)),
        };
    }
    if let Some((color, count)) = run {
        write_run(&mut out, color, count);
    }
    out
}

fn write_run(out: &mut Vec<u8>, color: [u8; 3], count: usize) {
    let mut word = color_word(color);
    if count > 1 {
        word |= RUN_FLAG;
    }
    out.extend_from_slice(&word.to_le_bytes());
    if count > 1 {
        let length = ((count - 1) & 0x0fff) as u16;
        out.extend_from_slice(&length.to_le_bytes());
    }
}

/// Decode a payload into a `width` x `height` image.
///
/// A payload covering fewer pixels leaves the rest black.
pub fn decode(data: &[u8], width: u32, height: u32) -> RasterResult<RgbImage> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidResolution { width, height });
    }
    let total = width as usize * height as usize;
    let mut buffer = vec![0u8; total * 3];
    let mut written = 0usize;
    let mut offset = 0usize;

    while offset < data.len() {
        let word = read_word(data, offset)?;
        let run_start = offset;
        offset += 2;

        let mut count = 1usize;
        if word & RUN_FLAG != 0 {
            let length = read_word(data, offset)?;
            offset += 2;
            count += (length & 0x0fff) as usize;
        }

        if written + count > total {
            return Err(RasterError::Overflow {
                run: count,
                offset: run_start,
                width,
                height,
            });
        }

        let color = word_color(word);
        for pixel in buffer[written * 3..(written + count) * 3].chunks_exact_mut(3) {
            pixel.copy_from_slice(&color);
        }
        written += count;
    }

    if written < total {
        tracing::warn!(
            decoded = written,
            expected = total,
            "Payload ended early, filling the rest with black"
        );
    }

    RgbImage::from_raw(width, height, buffer).ok_or(RasterError::InvalidResolution { width, height })
}

fn read_word(data: &[u8], offset: usize) -> RasterResult<u16> {
    match data.get(offset..offset + 2) {
        Some(&[lo, hi]) => Ok(u16::from_le_bytes([lo, hi])),
        _ => Err(RasterError::Truncated { offset }),
    }
}

/// Solid image helper, mostly for previews of empty layers.
pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(rgb))
}
