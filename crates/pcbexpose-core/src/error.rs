//! Error types for the core crate.

use thiserror::Error;

/// Errors raised by the shared core types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A unit name could not be recognised.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// A photoresist material name could not be recognised.
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
