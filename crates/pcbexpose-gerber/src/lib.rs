//! # pcbexpose-gerber
//!
//! Interprets RS-274X ("extended Gerber") documents into an ordered list of
//! dark and clear shapes.
//!
//! The pipeline is:
//!
//! 1. [`tokenizer`] splits the text into blocks and `%` toggles
//! 2. [`interpreter`] runs the modal state machine, using
//!    [`coordinate`] to decode fixed-digit numbers and
//!    [`aperture`] to resolve D codes
//! 3. [`draw`] and [`arc`] turn apertures and moves into [`Shape`]s
//!
//! ```
//! use pcbexpose_gerber::interpret;
//!
//! let layer = interpret("%FSLAX24Y24*%%MOIN*%%ADD10C,0.010*%D10*X0Y0D03*M02*").unwrap();
//! assert_eq!(layer.items.len(), 1);
//! assert!(layer.is_stopped());
//! ```

pub mod aperture;
pub mod arc;
pub mod coordinate;
pub mod draw;
pub mod error;
pub mod interpreter;
pub mod shape;
pub mod tokenizer;

pub use aperture::{Aperture, ApertureKind, ApertureMacro, ApertureRegistry};
pub use arc::{ArcDirection, ArcSegment, QuadrantMode};
pub use coordinate::{Axis, AxisFormat, CoordinateFormat, Notation, ZeroOmission};
pub use error::{GerberError, GerberResult, MalformedNumber};
pub use interpreter::{
    interpret, interpret_with_bounds, Interpolation, Interpretation, Interpreter,
    InterpreterState, RegionPath, Termination,
};
pub use shape::{DrawItem, LineCap, Polarity, Shape};
pub use tokenizer::{tokenize, Token, TokenStream};
