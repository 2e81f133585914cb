//! Fixed-digit coordinate decoding
//!
//! Gerber coordinates are written without a decimal point. The `FS` command
//! declares how many integer and fractional digits each axis carries and
//! which zeros may be omitted:
//!
//! - leading-zero omission: `X12345` with 2.4 digits is `1.2345`
//! - trailing-zero omission (deprecated): `X12` with 2.4 digits is `12.0`
//!
//! Decoded values are converted to inches according to the active unit.

use pcbexpose_core::Unit;
use serde::{Deserialize, Serialize};

use crate::error::MalformedNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZeroOmission {
    Leading,
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notation {
    Absolute,
    Incremental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Digit layout of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisFormat {
    pub integer_digits: u32,
    pub decimal_digits: u32,
}

impl AxisFormat {
    pub fn new(integer_digits: u32, decimal_digits: u32) -> Self {
        Self {
            integer_digits,
            decimal_digits,
        }
    }
}

/// Coordinate format declared by `FS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateFormat {
    pub x: AxisFormat,
    pub y: AxisFormat,
    pub zero_omission: ZeroOmission,
    pub notation: Notation,
}

impl Default for CoordinateFormat {
    /// 2.3 digits on both axes, leading zeros omitted, absolute notation.
    fn default() -> Self {
        Self {
            x: AxisFormat::new(2, 3),
            y: AxisFormat::new(2, 3),
            zero_omission: ZeroOmission::Leading,
            notation: Notation::Absolute,
        }
    }
}

impl CoordinateFormat {
    pub fn axis(&self, axis: Axis) -> AxisFormat {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Parse an `FS` command body such as `FSLAX24Y24`.
    ///
    /// Axes missing from the command keep the default 2.3 layout.
    pub fn parse_fs(command: &str) -> Result<Self, MalformedNumber> {
        let body = command.strip_prefix("FS").unwrap_or(command);
        let mut format = Self::default();

        let mut flags = body.chars();
        match flags.next() {
            Some('T') => format.zero_omission = ZeroOmission::Trailing,
            Some('L') | Some('D') => format.zero_omission = ZeroOmission::Leading,
            _ => return Err(MalformedNumber::new(command)),
        }
        if let Some('I') = flags.next() {
            format.notation = Notation::Incremental;
        }

        if let Some(x) = axis_digits(body, 'X', command)? {
            format.x = x;
        }
        if let Some(y) = axis_digits(body, 'Y', command)? {
            format.y = y;
        }
        Ok(format)
    }

    /// Decode `text` for `axis` into document units.
    pub fn decode_raw(&self, text: &str, axis: Axis) -> Result<f64, MalformedNumber> {
        let text = text.trim();
        if text.contains('.') {
            return text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| MalformedNumber::new(text));
        }

        let (negative, digits) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MalformedNumber::new(text));
        }

        let layout = self.axis(axis);
        let raw: f64 = digits.parse().map_err(|_| MalformedNumber::new(text))?;
        let value = match self.zero_omission {
            ZeroOmission::Leading => raw / 10f64.powi(layout.decimal_digits as i32),
            ZeroOmission::Trailing => {
                let missing =
                    (layout.integer_digits + layout.decimal_digits) as i32 - digits.len() as i32;
                raw * 10f64.powi(missing) / 10f64.powi(layout.decimal_digits as i32)
            }
        };

        Ok(if negative { -value } else { value })
    }

    /// Decode `text` for `axis` into inches.
    pub fn decode(&self, text: &str, axis: Axis, unit: Unit) -> Result<f64, MalformedNumber> {
        self.decode_raw(text, axis).map(|v| unit.to_inches(v))
    }

    /// Write `value` (document units) in this format with leading zeros omitted.
    pub fn format(&self, value: f64, axis: Axis) -> String {
        let layout = self.axis(axis);
        let scaled = (value * 10f64.powi(layout.decimal_digits as i32)).round() as i64;
        scaled.to_string()
    }
}

fn axis_digits(
    body: &str,
    letter: char,
    command: &str,
) -> Result<Option<AxisFormat>, MalformedNumber> {
    let Some(index) = body.find(letter) else {
        return Ok(None);
    };
    let mut digits = body[index + 1..].chars().map(|c| c.to_digit(10));
    match (digits.next().flatten(), digits.next().flatten()) {
        (Some(integer), Some(decimal)) => Ok(Some(AxisFormat::new(integer, decimal))),
        _ => Err(MalformedNumber::new(command)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_format() {
        let f = CoordinateFormat::default();
        assert_eq!(f.x, AxisFormat::new(2, 3));
        assert_eq!(f.zero_omission, ZeroOmission::Leading);
        assert!(close(f.decode_raw("1500", Axis::X).unwrap(), 1.5));
    }

    #[test]
    fn test_parse_fs() {
        let f = CoordinateFormat::parse_fs("FSLAX24Y35").unwrap();
        assert_eq!(f.x, AxisFormat::new(2, 4));
        assert_eq!(f.y, AxisFormat::new(3, 5));
        assert_eq!(f.zero_omission, ZeroOmission::Leading);
        assert_eq!(f.notation, Notation::Absolute);

        let f = CoordinateFormat::parse_fs("FSTIX33Y33").unwrap();
        assert_eq!(f.zero_omission, ZeroOmission::Trailing);
        assert_eq!(f.notation, Notation::Incremental);

        assert!(CoordinateFormat::parse_fs("FSLAX2Y24").is_err());
        assert!(CoordinateFormat::parse_fs("FS").is_err());
    }

    #[test]
    fn test_leading_zero_omission() {
        let f = CoordinateFormat::parse_fs("FSLAX24Y24").unwrap();
        assert!(close(f.decode("12345", Axis::X, Unit::Inch).unwrap(), 1.2345));
        assert!(close(f.decode("-500", Axis::Y, Unit::Inch).unwrap(), -0.05));
        assert!(close(f.decode("+0", Axis::Y, Unit::Inch).unwrap(), 0.0));
    }

    #[test]
    fn test_trailing_zero_omission() {
        let f = CoordinateFormat::parse_fs("FSTAX24Y24").unwrap();
        assert!(close(f.decode_raw("12", Axis::X).unwrap(), 12.0));
        assert!(close(f.decode_raw("-0125", Axis::X).unwrap(), -1.25));
        assert!(close(f.decode_raw("123456", Axis::X).unwrap(), 12.3456));
    }

    #[test]
    fn test_millimeters_convert_to_inches() {
        let f = CoordinateFormat::parse_fs("FSLAX33Y33").unwrap();
        assert!(close(f.decode("25400", Axis::X, Unit::Millimeter).unwrap(), 1.0));
    }

    #[test]
    fn test_decimal_point_literal() {
        let f = CoordinateFormat::default();
        assert!(close(f.decode_raw("1.25", Axis::X).unwrap(), 1.25));
    }

    #[test]
    fn test_malformed() {
        let f = CoordinateFormat::default();
        assert!(f.decode_raw("", Axis::X).is_err());
        assert!(f.decode_raw("-", Axis::X).is_err());
        assert!(f.decode_raw("12a4", Axis::X).is_err());
        assert!(f.decode_raw("1.2.3", Axis::X).is_err());
    }

    #[test]
    fn test_format() {
        let f = CoordinateFormat::parse_fs("FSLAX24Y24").unwrap();
        assert_eq!(f.format(1.2345, Axis::X), "12345");
        assert_eq!(f.format(-0.05, Axis::Y), "-500");
    }
}
