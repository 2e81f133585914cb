//! Configuration for pcbexpose
//!
//! Configuration is organized into sections:
//! - Printer profile (screen resolution, physical size, bezel margin)
//! - Render settings (ink color)
//! - Panel correction (offsets and rotation)
//! - Drill overlay (replacement hole diameter)
//! - Export (mirroring, photoresist material)
//!
//! Files are JSON or TOML, picked by extension.

use crate::error::{ConfigError, ConfigResult, SettingsResult};
use pcbexpose_core::{mm_to_inches, Material, MM_PER_INCH};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Exposure screen of a resin printer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterProfile {
    pub name: String,
    /// Screen resolution in pixels
    pub resolution_x: u32,
    pub resolution_y: u32,
    /// Visible screen area in mm
    pub screen_width_mm: f64,
    pub screen_height_mm: f64,
    /// Pixels hidden behind the bezel
    pub bezel_margin_x: i32,
    pub bezel_margin_y: i32,
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self {
            name: "Elegoo Mars".to_string(),
            resolution_x: 2560,
            resolution_y: 1440,
            screen_width_mm: 120.96,
            screen_height_mm: 68.04,
            bezel_margin_x: 35,
            bezel_margin_y: 35,
        }
    }
}

impl PrinterProfile {
    /// Horizontal and vertical pixel density.
    pub fn pixels_per_inch(&self) -> (f64, f64) {
        (
            self.resolution_x as f64 * MM_PER_INCH / self.screen_width_mm,
            self.resolution_y as f64 * MM_PER_INCH / self.screen_height_mm,
        )
    }
}

/// Render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// RGB ink for dark shapes
    pub ink_color: [u8; 3],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            ink_color: [0xff, 0x00, 0x00],
        }
    }
}

/// Panel alignment correction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionSettings {
    pub offset_x_mm: f64,
    pub offset_y_mm: f64,
    pub rotation_deg: f64,
}

impl CorrectionSettings {
    pub fn is_identity(&self) -> bool {
        self.offset_x_mm == 0.0 && self.offset_y_mm == 0.0 && self.rotation_deg == 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillSettings {
    /// Replacement hole diameter in mm; unset erases whole pads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole_diameter_mm: Option<f64>,
}

impl DrillSettings {
    pub fn hole_diameter_inches(&self) -> Option<f64> {
        self.hole_diameter_mm.map(mm_to_inches)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub mirror: bool,
    pub material: Material,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub printer: PrinterProfile,
    pub render: RenderSettings,
    pub correction: CorrectionSettings,
    pub drill: DrillSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let printer = &self.printer;
        if printer.resolution_x == 0 {
            return Err(ConfigError::out_of_range(
                "printer.resolution_x",
                printer.resolution_x,
            ));
        }
        if printer.resolution_y == 0 {
            return Err(ConfigError::out_of_range(
                "printer.resolution_y",
                printer.resolution_y,
            ));
        }

        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(printer.screen_width_mm) {
            return Err(ConfigError::out_of_range(
                "printer.screen_width_mm",
                printer.screen_width_mm,
            ));
        }
        if !positive(printer.screen_height_mm) {
            return Err(ConfigError::out_of_range(
                "printer.screen_height_mm",
                printer.screen_height_mm,
            ));
        }

        if let Some(d) = self.drill.hole_diameter_mm {
            if !positive(d) {
                return Err(ConfigError::out_of_range("drill.hole_diameter_mm", d));
            }
        }

        Ok(())
    }
}
