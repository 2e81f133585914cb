//! Error types for the Gerber crate.
//!
//! Only conditions that make the rest of the document meaningless are errors.
//! Everything else (unknown commands, deprecated syntax, unsupported macro
//! primitives) is reported through `tracing` and skipped.

use thiserror::Error;

/// Fatal interpretation errors. Each carries the index of the offending token.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GerberError {
    /// A D code referenced an aperture that was never defined.
    #[error("Undefined aperture D{code} at token {position}")]
    UndefinedAperture {
        /// The aperture code.
        code: u32,
        /// Token index.
        position: usize,
    },

    /// A mandatory number could not be parsed.
    #[error("Malformed number '{text}' at token {position}")]
    MalformedNumber {
        /// The text that failed to parse.
        text: String,
        /// Token index.
        position: usize,
    },

    /// An aperture definition named a macro that was never declared.
    #[error("Unknown aperture macro '{name}' at token {position}")]
    UnknownMacro {
        /// The macro name.
        name: String,
        /// Token index.
        position: usize,
    },

    /// D01 or D03 was issued before any aperture was selected.
    #[error("No aperture selected at token {position}")]
    NoApertureSelected {
        /// Token index.
        position: usize,
    },
}

impl GerberError {
    /// Index of the token that caused the error.
    pub fn position(&self) -> usize {
        match self {
            Self::UndefinedAperture { position, .. }
            | Self::MalformedNumber { position, .. }
            | Self::UnknownMacro { position, .. }
            | Self::NoApertureSelected { position } => *position,
        }
    }
}

/// A number that failed to parse, before the token position is known.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Malformed number '{0}'")]
pub struct MalformedNumber(pub String);

impl MalformedNumber {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Attach the token position, producing the fatal error.
    pub fn at(self, position: usize) -> GerberError {
        GerberError::MalformedNumber {
            text: self.0,
            position,
        }
    }
}

/// Result type alias for Gerber interpretation.
pub type GerberResult<T> = Result<T, GerberError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gerber_error_display() {
        let err = GerberError::UndefinedAperture {
            code: 15,
            position: 7,
        };
        assert_eq!(err.to_string(), "Undefined aperture D15 at token 7");
        assert_eq!(err.position(), 7);

        let err = GerberError::UnknownMacro {
            name: "THERMAL80".to_string(),
            position: 3,
        };
        assert_eq!(err.to_string(), "Unknown aperture macro 'THERMAL80' at token 3");
    }

    #[test]
    fn test_malformed_number_at() {
        let err = MalformedNumber::new("12a").at(4);
        assert_eq!(
            err,
            GerberError::MalformedNumber {
                text: "12a".to_string(),
                position: 4
            }
        );
        assert_eq!(err.to_string(), "Malformed number '12a' at token 4");
    }
}
