//! Unit conversion utilities
//!
//! Gerber documents are written in inches or millimetres. Everything past the
//! coordinate decoder works in inches, and pixel densities are expressed in
//! pixels per inch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Millimetres in one inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Document unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Imperial inches (the internal unit)
    Inch,
    /// Millimetres
    Millimeter,
}

impl Default for Unit {
    fn default() -> Self {
        Self::Inch
    }
}

impl Unit {
    /// Convert a value expressed in this unit to inches.
    pub fn to_inches(self, value: f64) -> f64 {
        match self {
            Self::Inch => value,
            Self::Millimeter => mm_to_inches(value),
        }
    }

    /// Convert a value in inches back to this unit.
    pub fn from_inches(self, inches: f64) -> f64 {
        match self {
            Self::Inch => inches,
            Self::Millimeter => inches_to_mm(inches),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inch => write!(f, "in"),
            Self::Millimeter => write!(f, "mm"),
        }
    }
}

impl FromStr for Unit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" | "inch" | "inches" | "imperial" => Ok(Self::Inch),
            "mm" | "millimeter" | "millimeters" | "metric" => Ok(Self::Millimeter),
            _ => Err(CoreError::UnknownUnit(s.to_string())),
        }
    }
}

/// Millimetres to inches.
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Inches to millimetres.
pub fn inches_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}
