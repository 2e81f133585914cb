//! # pcbexpose-core
//!
//! Shared building blocks for the pcbexpose crates:
//!
//! - [`units`] - inch/millimetre handling; the internal unit is the inch
//! - [`geometry`] - board-space points and the growing [`Bounds`] accumulator
//! - [`layer`] - layer classification from Gerber file extensions and the
//!   photoresist [`Material`]
//! - [`error`] - the core error type

pub mod error;
pub mod geometry;
pub mod layer;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use geometry::{Bounds, Point};
pub use layer::{LayerKind, Material};
pub use units::{inches_to_mm, mm_to_inches, Unit, MM_PER_INCH};
