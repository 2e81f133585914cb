//! pcbexpose Settings Crate
//!
//! Handles printer profiles and the render, correction, drill and export
//! settings, stored as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    Config, CorrectionSettings, DrillSettings, ExportSettings, PrinterProfile, RenderSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
