//! Error types for the raster crate.

use thiserror::Error;

/// Errors raised while rasterizing layers or coding preview images.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    /// Target image has a zero dimension.
    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    /// Pixel density is zero, negative or not finite.
    #[error("Invalid pixel density {x}x{y} ppi")]
    InvalidDensity { x: f64, y: f64 },

    /// Encoded stream ended in the middle of a color or length word.
    #[error("Encoded stream truncated at byte {offset}")]
    Truncated { offset: usize },

    /// A run would write past the last pixel.
    #[error("Run of {run} pixels at byte {offset} overflows a {width}x{height} image")]
    Overflow {
        run: usize,
        offset: usize,
        width: u32,
        height: u32,
    },

    /// Not enough bytes for a 32 byte record header.
    #[error("Record header at offset {offset} needs 32 bytes, file has {len}")]
    ShortHeader { offset: usize, len: usize },

    /// The header names a payload outside the file.
    #[error("Payload at {offset}+{size} exceeds file size {len}")]
    PayloadOutOfRange { offset: usize, size: usize, len: usize },

    /// Two images that must match in size do not.
    #[error("Image size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Result type alias for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;
