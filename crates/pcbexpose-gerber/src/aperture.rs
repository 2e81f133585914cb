//! Aperture and macro registry
//!
//! `%AD...%` binds an aperture code (D10 and up) to either a standard shape
//! (`C`, `R`, `O`, `P`) or an aperture macro declared earlier with
//! `%AM...%`. Macros are expanded once, at definition time, into a list of
//! primitive apertures with every `$n` placeholder already substituted.
//!
//! Length parameters are converted to inches when the aperture is defined,
//! using the unit in force at that point.

use std::collections::HashMap;

use pcbexpose_core::Unit;
use tracing::{debug, warn};

use crate::error::{GerberError, GerberResult, MalformedNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApertureKind {
    /// `C`: diameter, hole
    Circle,
    /// `R`: width, height, hole
    Rectangle,
    /// `O`: width, height, hole
    Obround,
    /// `P`: outer diameter, vertices, rotation, hole
    Polygon,
    /// Primitive 1: exposure, diameter, centre x, centre y, rotation
    MacroCircle,
    /// Primitive 20: exposure, width, start x, start y, end x, end y, rotation
    MacroVectorLine,
    /// Primitive 21: exposure, width, height, centre x, centre y, rotation
    MacroCenterLine,
    /// Primitive 4: exposure, vertex count n, n+1 points, rotation
    MacroOutline,
    /// Primitive 5: exposure, vertices, centre x, centre y, diameter, rotation
    MacroPolygon,
    /// Primitive 6
    MacroMoire,
    /// Primitive 7
    MacroThermal,
}

impl ApertureKind {
    /// Standard aperture template letter.
    pub fn from_template(name: &str) -> Option<Self> {
        match name {
            "C" => Some(Self::Circle),
            "R" => Some(Self::Rectangle),
            "O" => Some(Self::Obround),
            "P" => Some(Self::Polygon),
            _ => None,
        }
    }

    /// Macro primitive code.
    pub fn from_primitive(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::MacroCircle),
            4 => Some(Self::MacroOutline),
            5 => Some(Self::MacroPolygon),
            6 => Some(Self::MacroMoire),
            7 => Some(Self::MacroThermal),
            20 => Some(Self::MacroVectorLine),
            21 => Some(Self::MacroCenterLine),
            _ => None,
        }
    }

    pub fn is_macro(&self) -> bool {
        !matches!(
            self,
            Self::Circle | Self::Rectangle | Self::Obround | Self::Polygon
        )
    }
}

/// One primitive shape and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Aperture {
    pub kind: ApertureKind,
    pub params: Vec<f64>,
}

impl Aperture {
    pub fn new(kind: ApertureKind, params: Vec<f64>) -> Self {
        Self { kind, params }
    }

    pub fn param(&self, index: usize) -> Option<f64> {
        self.params.get(index).copied()
    }

    pub fn param_or(&self, index: usize, default: f64) -> f64 {
        self.param(index).unwrap_or(default)
    }

    /// Vertex count of an outline primitive, start point included, when its
    /// parameters hold that many points plus the rotation.
    pub fn outline_points(&self) -> Option<usize> {
        let declared = self.param_or(1, 0.0).max(0.0);
        let available = self.params.len().saturating_sub(3) / 2;
        (declared < available as f64).then(|| declared as usize + 1)
    }

    /// Whether parameter `index` is a length (as opposed to a count, angle or exposure flag).
    pub fn is_length(&self, index: usize) -> bool {
        match self.kind {
            ApertureKind::Circle | ApertureKind::Rectangle | ApertureKind::Obround => true,
            ApertureKind::Polygon => index == 0 || index == 3,
            ApertureKind::MacroCircle => (1..=3).contains(&index),
            ApertureKind::MacroVectorLine => (1..=5).contains(&index),
            ApertureKind::MacroCenterLine => (1..=4).contains(&index),
            ApertureKind::MacroOutline => match self.outline_points() {
                Some(points) => index >= 2 && index < 2 + 2 * points,
                None => index >= 2 && index + 1 < self.params.len(),
            },
            ApertureKind::MacroPolygon => (2..=4).contains(&index),
            ApertureKind::MacroMoire => index <= 4 || index == 6 || index == 7,
            ApertureKind::MacroThermal => index <= 4,
        }
    }

    /// Convert length parameters from `unit` to inches.
    pub fn in_inches(mut self, unit: Unit) -> Self {
        if unit == Unit::Inch {
            return self;
        }
        for index in 0..self.params.len() {
            if self.is_length(index) {
                self.params[index] = unit.to_inches(self.params[index]);
            }
        }
        self
    }
}

/// A named `%AM` template: raw primitive lines, one per block.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureMacro {
    pub name: String,
    pub lines: Vec<String>,
}

impl ApertureMacro {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    /// Instantiate the macro with the arguments of an aperture definition.
    pub fn expand(&self, args: &[f64]) -> Result<Vec<Aperture>, MalformedNumber> {
        let mut apertures = Vec::new();

        for line in &self.lines {
            let line = line.trim();
            if line.is_empty() || line == "0" || line.starts_with("0 ") {
                continue;
            }
            if line.starts_with('$') {
                debug!(name = %self.name, "skipping macro equation '{}'", line);
                continue;
            }

            let mut fields = line.split(',').map(str::trim);
            let code_text = fields.next().unwrap_or_default();
            let code: u32 = code_text
                .parse()
                .map_err(|_| MalformedNumber::new(code_text))?;
            let Some(kind) = ApertureKind::from_primitive(code) else {
                warn!(name = %self.name, "unknown macro primitive {}", code);
                continue;
            };

            let params = fields
                .filter(|f| !f.is_empty())
                .map(|f| self.field_value(f, args))
                .collect::<Result<Vec<_>, _>>()?;
            apertures.push(Aperture::new(kind, params));
        }

        Ok(apertures)
    }

    fn field_value(&self, field: &str, args: &[f64]) -> Result<f64, MalformedNumber> {
        if let Some(index) = field.strip_prefix('$') {
            let index: usize = index.parse().map_err(|_| MalformedNumber::new(field))?;
            return Ok(match index.checked_sub(1).and_then(|i| args.get(i)) {
                Some(value) => *value,
                None => {
                    warn!(name = %self.name, "macro argument ${} not supplied, using 0", index);
                    0.0
                }
            });
        }
        field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| MalformedNumber::new(field))
    }
}

/// Append-only table of macros and aperture codes for one document.
#[derive(Debug, Clone, Default)]
pub struct ApertureRegistry {
    macros: HashMap<String, ApertureMacro>,
    apertures: HashMap<u32, Vec<Aperture>>,
}

impl ApertureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_macro(&mut self, aperture_macro: ApertureMacro) {
        debug!(
            "defined macro {} ({} lines)",
            aperture_macro.name,
            aperture_macro.lines.len()
        );
        self.macros
            .insert(aperture_macro.name.clone(), aperture_macro);
    }

    pub fn aperture_macro(&self, name: &str) -> Option<&ApertureMacro> {
        self.macros.get(name)
    }

    pub fn define(&mut self, code: u32, apertures: Vec<Aperture>) {
        debug!(code, "defined aperture D{} ({} primitives)", code, apertures.len());
        if self.apertures.insert(code, apertures).is_some() {
            warn!(code, "aperture D{} redefined", code);
        }
    }

    pub fn get(&self, code: u32) -> Option<&[Aperture]> {
        self.apertures.get(&code).map(Vec::as_slice)
    }

    pub fn contains(&self, code: u32) -> bool {
        self.apertures.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.apertures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apertures.is_empty()
    }

    /// Parse and register an `AD` command such as `ADD10C,0.010X0.004`.
    ///
    /// Returns the defined code, or `None` when the template letter is unknown
    /// (logged and skipped).
    pub fn define_from_command(
        &mut self,
        command: &str,
        unit: Unit,
        position: usize,
    ) -> GerberResult<Option<u32>> {
        let body = command.strip_prefix("AD").unwrap_or(command);
        let body = body.strip_prefix('D').unwrap_or(body);

        let digits_end = body
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(body.len());
        let code: u32 = body[..digits_end]
            .parse()
            .map_err(|_| MalformedNumber::new(command).at(position))?;

        let (template, args_text) = body[digits_end..]
            .split_once(',')
            .unwrap_or((&body[digits_end..], ""));
        let template = template.trim();
        let args = args_text
            .split('X')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(|a| {
                a.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| MalformedNumber::new(a).at(position))
            })
            .collect::<GerberResult<Vec<_>>>()?;

        let apertures = if let Some(kind) = ApertureKind::from_template(template) {
            vec![Aperture::new(kind, args).in_inches(unit)]
        } else if let Some(aperture_macro) = self.aperture_macro(template) {
            aperture_macro
                .expand(&args)
                .map_err(|e| e.at(position))?
                .into_iter()
                .map(|a| a.in_inches(unit))
                .collect()
        } else if template.chars().count() <= 1 {
            warn!(code, "unknown aperture template '{}'", template);
            return Ok(None);
        } else {
            return Err(GerberError::UnknownMacro {
                name: template.to_string(),
                position,
            });
        };

        self.define(code, apertures);
        Ok(Some(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_standard_circle() {
        let mut registry = ApertureRegistry::new();
        let code = registry
            .define_from_command("ADD10C,0.010", Unit::Inch, 0)
            .unwrap();
        assert_eq!(code, Some(10));
        let apertures = registry.get(10).unwrap();
        assert_eq!(apertures.len(), 1);
        assert_eq!(apertures[0].kind, ApertureKind::Circle);
        assert_eq!(apertures[0].params, vec![0.010]);
    }

    #[test]
    fn test_standard_rectangle_in_mm() {
        let mut registry = ApertureRegistry::new();
        registry
            .define_from_command("ADD11R,2.54X1.27X0.254", Unit::Millimeter, 0)
            .unwrap();
        let a = &registry.get(11).unwrap()[0];
        assert_eq!(a.kind, ApertureKind::Rectangle);
        assert!(close(a.params[0], 0.1));
        assert!(close(a.params[1], 0.05));
        assert!(close(a.params[2], 0.01));
    }

    #[test]
    fn test_polygon_keeps_counts_and_angles() {
        let a = Aperture::new(ApertureKind::Polygon, vec![25.4, 6.0, 30.0, 2.54]).in_inches(Unit::Millimeter);
        assert!(close(a.params[0], 1.0));
        assert_eq!(a.params[1], 6.0);
        assert_eq!(a.params[2], 30.0);
        assert!(close(a.params[3], 0.1));
    }

    #[test]
    fn test_macro_expansion() {
        let mut registry = ApertureRegistry::new();
        registry.define_macro(ApertureMacro::new(
            "DONUTPAD",
            vec![
                "0 pad with offset".to_string(),
                "1,1,$1,0,0".to_string(),
                "$3=$1x2".to_string(),
                "21,1,$2,$1,0,0,45".to_string(),
            ],
        ));
        registry
            .define_from_command("ADD20DONUTPAD,0.05X0.02", Unit::Inch, 3)
            .unwrap();

        let apertures = registry.get(20).unwrap();
        assert_eq!(apertures.len(), 2);
        assert_eq!(apertures[0].kind, ApertureKind::MacroCircle);
        assert_eq!(apertures[0].params, vec![1.0, 0.05, 0.0, 0.0]);
        assert_eq!(apertures[1].kind, ApertureKind::MacroCenterLine);
        assert_eq!(apertures[1].params, vec![1.0, 0.02, 0.05, 0.0, 0.0, 45.0]);
    }

    #[test]
    fn test_missing_macro_argument_is_zero() {
        let m = ApertureMacro::new("M", vec!["1,1,$4,0,0".to_string()]);
        let apertures = m.expand(&[1.0]).unwrap();
        assert_eq!(apertures[0].params[1], 0.0);
    }

    #[test]
    fn test_unknown_primitive_skipped() {
        let m = ApertureMacro::new("M", vec!["2,1,0.1,0,0,1,1,0".to_string(), "1,1,0.1,0,0".to_string()]);
        let apertures = m.expand(&[]).unwrap();
        assert_eq!(apertures.len(), 1);
    }

    #[test]
    fn test_outline_lengths() {
        let a = Aperture::new(
            ApertureKind::MacroOutline,
            vec![1.0, 3.0, 0.0, 0.0, 25.4, 0.0, 25.4, 25.4, 0.0, 0.0, 90.0],
        )
        .in_inches(Unit::Millimeter);
        assert_eq!(a.params[1], 3.0);
        assert!(close(a.params[4], 1.0));
        assert!(close(a.params[7], 1.0));
        assert_eq!(a.params[10], 90.0);
    }

    #[test]
    fn test_unknown_macro_is_fatal() {
        let mut registry = ApertureRegistry::new();
        let err = registry
            .define_from_command("ADD12THERMAL80,0.1", Unit::Inch, 9)
            .unwrap_err();
        assert_eq!(
            err,
            GerberError::UnknownMacro {
                name: "THERMAL80".to_string(),
                position: 9
            }
        );
    }

    #[test]
    fn test_unknown_letter_is_skipped() {
        let mut registry = ApertureRegistry::new();
        let code = registry
            .define_from_command("ADD13Z,0.1", Unit::Inch, 0)
            .unwrap();
        assert_eq!(code, None);
        assert!(!registry.contains(13));
    }

    #[test]
    fn test_malformed_definition() {
        let mut registry = ApertureRegistry::new();
        assert!(matches!(
            registry.define_from_command("ADDC,0.1", Unit::Inch, 1),
            Err(GerberError::MalformedNumber { position: 1, .. })
        ));
        assert!(matches!(
            registry.define_from_command("ADD10C,0.1X?", Unit::Inch, 2),
            Err(GerberError::MalformedNumber { position: 2, .. })
        ));
    }
}
