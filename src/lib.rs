//! # pcbexpose
//!
//! Renders RS-274X Gerber layers into exposure masks for resin printer
//! screens, for photo-etching PCBs.
//!
//! ## Architecture
//!
//! pcbexpose is organized as a workspace with multiple crates:
//!
//! 1. **pcbexpose-core** - Units, points, bounds, layer kinds
//! 2. **pcbexpose-gerber** - Tokenizer, coordinate decoder, apertures, interpreter
//! 3. **pcbexpose-raster** - Rasterizer, drill overlay, exposure mask, run-length codec
//! 4. **pcbexpose-settings** - Printer profile and render configuration
//! 5. **pcbexpose** - This crate: pipeline helpers and the command-line front end

use anyhow::Context;
use std::path::Path;

pub use pcbexpose_core::{Bounds, LayerKind, Material, Point, Unit};
pub use pcbexpose_gerber::{interpret, interpret_with_bounds, DrawItem, GerberError, Interpretation};
pub use pcbexpose_raster::{
    finish_exposure, preview_image, Correction, DrillOverlay, ExposureOptions, PreviewRecord,
    RasterError, Rasterizer, RenderOptions,
};
pub use pcbexpose_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting on stderr
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

/// `RUST_LOG`-style directives, or INFO when they are absent or invalid.
fn log_filter(directives: Option<&str>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// An interpreted Gerber file and what its extension says it is.
#[derive(Debug, Clone)]
pub struct Layer {
    pub kind: LayerKind,
    pub interpretation: Interpretation,
}

impl Layer {
    /// Read and interpret `path`, growing `bounds`.
    pub fn load(path: &Path, bounds: Bounds) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let interpretation = interpret_with_bounds(&source, bounds)
            .with_context(|| format!("Failed to interpret {}", path.display()))?;
        let kind = LayerKind::from_path(path);
        tracing::info!(
            layer = %kind,
            items = interpretation.items.len(),
            "Interpreted layer"
        );
        Ok(Self {
            kind,
            interpretation,
        })
    }

    pub fn bounds(&self) -> &Bounds {
        &self.interpretation.bounds
    }
}

/// Rasterizer settings for the configured printer screen.
pub fn render_options(config: &Config) -> RenderOptions {
    let (ppi_x, ppi_y) = config.printer.pixels_per_inch();
    RenderOptions::new(
        config.printer.resolution_x,
        config.printer.resolution_y,
        ppi_x,
        ppi_y,
    )
    .with_ink(config.render.ink_color)
}

pub fn correction(config: &Config) -> Correction {
    let c = &config.correction;
    Correction::new(c.offset_x_mm, c.offset_y_mm, c.rotation_deg)
}

pub fn exposure_options(config: &Config) -> ExposureOptions {
    ExposureOptions {
        mirror: config.export.mirror,
        margin_x: config.printer.bezel_margin_x,
        margin_y: config.printer.bezel_margin_y,
        material: config.export.material,
    }
}

/// Render `layer` for the configured screen, optionally corrected and with
/// the pads of `drills` cut out.
///
/// When drills are given they must have been interpreted against the
/// bounds of `layer`; their bounds then frame both.
pub fn render_layer(
    config: &Config,
    layer: &Layer,
    drills: Option<&Layer>,
    corrected: bool,
) -> anyhow::Result<image::RgbaImage> {
    let rasterizer = Rasterizer::new(render_options(config))?;
    let bounds = drills.map_or(layer.bounds(), Layer::bounds);
    let correction = corrected.then(|| correction(config));

    let items = &layer.interpretation.items;
    let image = match &correction {
        Some(c) => rasterizer.render_corrected(items, bounds, c)?,
        None => rasterizer.render(items, bounds)?,
    };

    let Some(drills) = drills else {
        return Ok(image);
    };
    let mut overlay = match config.drill.hole_diameter_inches() {
        Some(diameter) => DrillOverlay::with_hole_diameter(diameter),
        None => DrillOverlay::full_pads(),
    };
    if let Some(c) = correction {
        overlay = overlay.corrected(c);
    }
    Ok(rasterizer.overlay_drills(&image, &drills.interpretation.items, bounds, &overlay)?)
}
