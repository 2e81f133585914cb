//! # pcbexpose-raster
//!
//! Rasterizes interpreted layers and codes them for the exposure screen:
//!
//! - [`rasterizer`] - compositing draw items with an optional panel correction
//! - [`drill`] - cutting drill clearances into a rendered layer
//! - [`exposure`] - mirror, margin and resist inversion of the final mask
//! - [`codec`] - the 15-bit run-length image format
//! - [`preview`] - header plus payload records

pub mod codec;
pub mod drill;
pub mod error;
pub mod exposure;
pub mod preview;
pub mod rasterizer;

pub use codec::{decode, encode, encode_rgba, quantize, MAX_RUN, RUN_FLAG};
pub use drill::DrillOverlay;
pub use error::{RasterError, RasterResult};
pub use exposure::{finish_exposure, preview_image, ExposureOptions};
pub use preview::{PreviewRecord, HEADER_SIZE};
pub use rasterizer::{Correction, Rasterizer, RenderOptions, DEFAULT_INK};
