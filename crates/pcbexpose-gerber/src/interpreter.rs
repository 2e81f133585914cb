//! RS-274X command interpreter
//!
//! Walks the token stream once, keeping the modal state in a single
//! [`InterpreterState`] value, and appends a [`DrawItem`] for every shape the
//! document produces. The caller's [`Bounds`] is grown as shapes are emitted
//! and handed back with the result.

use lyon::path::Path;
use pcbexpose_core::{Bounds, Point, Unit};
use tracing::{debug, info, trace, warn};

use crate::aperture::{ApertureMacro, ApertureRegistry};
use crate::arc::{ArcDirection, ArcSegment, QuadrantMode};
use crate::coordinate::{Axis, CoordinateFormat, Notation};
use crate::draw;
use crate::error::{GerberError, GerberResult, MalformedNumber};
use crate::shape::{to_lyon, DrawItem, Polarity, Shape};
use crate::tokenizer::{Token, TokenStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Clockwise,
    CounterClockwise,
}

impl Default for Interpolation {
    fn default() -> Self {
        Self::Linear
    }
}

impl Interpolation {
    pub fn arc_direction(&self) -> Option<ArcDirection> {
        match self {
            Self::Linear => None,
            Self::Clockwise => Some(ArcDirection::Clockwise),
            Self::CounterClockwise => Some(ArcDirection::CounterClockwise),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RegionStep {
    Start(Point),
    Line(Point),
    Arc(ArcSegment),
}

/// Contour being collected between G36 and G37.
#[derive(Debug, Clone, Default)]
pub struct RegionPath {
    steps: Vec<RegionStep>,
}

impl RegionPath {
    pub fn is_started(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Number of drawn segments, not counting the starting point.
    pub fn segment_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// D02: start the contour at `to`, or extend it with a straight edge.
    pub fn move_to(&mut self, to: Point) {
        if self.is_started() {
            self.steps.push(RegionStep::Line(to));
        } else {
            self.steps.push(RegionStep::Start(to));
        }
    }

    /// D01 in linear mode. An unstarted contour begins at `from`.
    pub fn line_to(&mut self, from: Point, to: Point) {
        if !self.is_started() {
            self.steps.push(RegionStep::Start(from));
        }
        self.steps.push(RegionStep::Line(to));
    }

    /// D01 in circular mode.
    pub fn arc_to(&mut self, from: Point, arc: ArcSegment) {
        if !self.is_started() {
            self.steps.push(RegionStep::Start(from));
        }
        self.steps.push(RegionStep::Arc(arc));
    }

    /// Closed path, or `None` when nothing was drawn.
    pub fn build(&self) -> Option<Path> {
        let (RegionStep::Start(start), rest) = self.steps.split_first()? else {
            return None;
        };
        if rest.is_empty() {
            return None;
        }

        let mut builder = Path::builder();
        builder.begin(to_lyon(*start));
        for step in rest {
            match step {
                RegionStep::Start(p) | RegionStep::Line(p) => {
                    builder.line_to(to_lyon(*p));
                }
                RegionStep::Arc(arc) => {
                    builder.line_to(to_lyon(arc.start_point()));
                    arc.append_to(&mut builder);
                }
            }
        }
        builder.close();
        Some(builder.build())
    }
}

/// Modal state of one interpretation.
#[derive(Debug, Clone, Default)]
pub struct InterpreterState {
    pub position: Point,
    /// I/J centre offsets of the current block, in inches.
    pub arc_offset: (f64, f64),
    pub interpolation: Interpolation,
    pub quadrant_mode: QuadrantMode,
    /// `Some` between G36 and G37.
    pub region: Option<RegionPath>,
    pub polarity: Polarity,
    pub unit: Unit,
    pub format: CoordinateFormat,
    /// Selected aperture code (D10 and up).
    pub aperture: Option<u32>,
    /// Set by D01, cleared by D02/D03. Coordinate-only blocks repeat D01 while set.
    pub tool_on: bool,
    /// Inside `%...%`.
    pub extended: bool,
    pub stopped: bool,
}

/// How an interpretation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every token was consumed.
    EndOfInput,
    /// M00 or M02 at `position`; later tokens were ignored.
    Stopped { position: usize },
}

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct Interpretation {
    pub items: Vec<DrawItem>,
    pub bounds: Bounds,
    pub termination: Termination,
    pub apertures_defined: usize,
}

impl Interpretation {
    pub fn is_stopped(&self) -> bool {
        matches!(self.termination, Termination::Stopped { .. })
    }

    pub fn dark_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_dark()).count()
    }
}

/// Single-use interpreter for one document.
#[derive(Debug, Clone)]
pub struct Interpreter {
    state: InterpreterState,
    registry: ApertureRegistry,
    items: Vec<DrawItem>,
    bounds: Bounds,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Bounds::new())
    }
}

impl Interpreter {
    /// Interpreter that grows `bounds` as it emits shapes.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            state: InterpreterState::default(),
            registry: ApertureRegistry::new(),
            items: Vec::new(),
            bounds,
        }
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn registry(&self) -> &ApertureRegistry {
        &self.registry
    }

    /// Interpret `source` to completion, stop or the first fatal error.
    pub fn run(mut self, source: &str) -> GerberResult<Interpretation> {
        let mut tokens = TokenStream::new(source);
        let mut termination = Termination::EndOfInput;
        debug!("interpreting {} tokens", tokens.len());

        while let Some((position, token)) = tokens.next_token() {
            match token {
                Token::Toggle => self.state.extended = !self.state.extended,
                Token::Command(text) if self.state.extended => {
                    self.execute_extended(&text, position, &mut tokens)?;
                }
                Token::Command(text) => {
                    self.execute_block(&text, position)?;
                    if self.state.stopped {
                        debug!(
                            "stopped at token {}, {} tokens ignored",
                            position,
                            tokens.remaining()
                        );
                        termination = Termination::Stopped { position };
                        break;
                    }
                }
            }
        }

        if self.state.region.is_some() {
            warn!("document ended inside a region; the open contour was dropped");
        }
        info!(
            "interpreted {} shapes, bounds {:.4}x{:.4} in",
            self.items.len(),
            self.bounds.width(),
            self.bounds.height()
        );

        Ok(Interpretation {
            items: self.items,
            bounds: self.bounds,
            termination,
            apertures_defined: self.registry.len(),
        })
    }

    fn execute_extended(
        &mut self,
        command: &str,
        position: usize,
        tokens: &mut TokenStream,
    ) -> GerberResult<()> {
        let prefix = command.get(..2).unwrap_or(command);
        let args = command.get(2..).unwrap_or_default();

        match prefix {
            "AD" => {
                self.registry
                    .define_from_command(command, self.state.unit, position)?;
            }
            "AM" => {
                let mut lines = Vec::new();
                while let Some(Token::Command(line)) = tokens.peek() {
                    lines.push(line.clone());
                    tokens.next_token();
                }
                self.registry
                    .define_macro(ApertureMacro::new(args.trim(), lines));
            }
            "FS" => {
                self.state.format =
                    CoordinateFormat::parse_fs(command).map_err(|e| e.at(position))?;
                debug!("coordinate format {:?}", self.state.format);
            }
            "LP" => match args {
                "D" => self.state.polarity = Polarity::Dark,
                "C" => self.state.polarity = Polarity::Clear,
                _ => warn!("unknown polarity '{}' ignored", command),
            },
            "MO" => match args.parse::<Unit>() {
                Ok(unit) => self.state.unit = unit,
                Err(e) => warn!("{} in '{}'", e, command),
            },
            "AS" | "IN" | "IP" | "IR" | "LN" | "MI" | "OF" | "SF" => {
                warn!("deprecated command '{}' ignored", command);
            }
            "TF" | "TA" | "TO" | "TD" => trace!("attribute '{}'", command),
            _ => warn!("unknown extended command '{}' at token {}", command, position),
        }
        Ok(())
    }

    fn execute_block(&mut self, block: &str, position: usize) -> GerberResult<()> {
        let bytes = block.as_bytes();
        let mut target = self.state.position;
        let mut pending_coordinates = false;
        let mut index = 0;
        self.state.arc_offset = (0.0, 0.0);

        while index < bytes.len() {
            let letter = bytes[index] as char;
            index += 1;
            if letter.is_ascii_whitespace() {
                continue;
            }

            let (text, next) = number_span(block, index);
            match letter {
                'G' => {
                    index = next;
                    let code = parse_code(text, position)?;
                    if code == 4 {
                        trace!("comment '{}'", block);
                        break;
                    }
                    self.apply_g_code(code, position);
                }
                'X' | 'Y' | 'I' | 'J' => {
                    index = next;
                    let axis = if matches!(letter, 'X' | 'I') {
                        Axis::X
                    } else {
                        Axis::Y
                    };
                    let value = self
                        .state
                        .format
                        .decode(text, axis, self.state.unit)
                        .map_err(|e| e.at(position))?;
                    match letter {
                        'X' => target.x = self.absolute(value, self.state.position.x),
                        'Y' => target.y = self.absolute(value, self.state.position.y),
                        'I' => self.state.arc_offset.0 = value,
                        _ => self.state.arc_offset.1 = value,
                    }
                    if matches!(letter, 'X' | 'Y') {
                        pending_coordinates = true;
                    }
                }
                'D' => {
                    index = next;
                    let code = parse_code(text, position)?;
                    self.apply_d_code(code, target, position)?;
                    if code < 10 {
                        pending_coordinates = false;
                    }
                }
                'N' => index = next,
                'M' => {
                    let code = parse_code(text, position)?;
                    if code == 0 || code == 2 {
                        self.state.stopped = true;
                        return Ok(());
                    }
                    warn!("unknown M{:02} at token {}", code, position);
                    break;
                }
                other => {
                    warn!("unknown command '{}' in block '{}' at token {}", other, block, position);
                    break;
                }
            }
        }

        // Coordinates without an operation repeat the modal one.
        if pending_coordinates {
            if self.state.region.is_some() {
                self.draw_in_region(target);
            } else if self.state.tool_on {
                self.interpolate_to(target, position)?;
            }
        }

        self.state.position = target;
        Ok(())
    }

    fn absolute(&self, value: f64, current: f64) -> f64 {
        match self.state.format.notation {
            Notation::Absolute => value,
            Notation::Incremental => current + value,
        }
    }

    fn apply_g_code(&mut self, code: u32, position: usize) {
        match code {
            1 | 10 | 11 | 12 => self.state.interpolation = Interpolation::Linear,
            2 => self.state.interpolation = Interpolation::Clockwise,
            3 => self.state.interpolation = Interpolation::CounterClockwise,
            36 => {
                if self.state.region.is_some() {
                    warn!("G36 inside a region at token {}, restarting contour", position);
                }
                self.state.region = Some(RegionPath::default());
            }
            37 => self.close_region(),
            54 | 55 => trace!("G{} ignored", code),
            70 => self.state.unit = Unit::Inch,
            71 => self.state.unit = Unit::Millimeter,
            74 => self.state.quadrant_mode = QuadrantMode::Single,
            75 => self.state.quadrant_mode = QuadrantMode::Multi,
            90 => self.state.format.notation = Notation::Absolute,
            91 => self.state.format.notation = Notation::Incremental,
            _ => warn!("unknown G{:02} at token {}", code, position),
        }
    }

    fn apply_d_code(&mut self, code: u32, target: Point, position: usize) -> GerberResult<()> {
        match code {
            1 => {
                self.state.tool_on = true;
                if self.state.region.is_some() {
                    self.draw_in_region(target);
                } else {
                    self.interpolate_to(target, position)?;
                }
            }
            2 => {
                self.state.tool_on = false;
                if let Some(region) = self.state.region.as_mut() {
                    region.move_to(target);
                }
            }
            3 => {
                self.state.tool_on = false;
                let code = self.selected_aperture(position)?;
                let polarity = self.state.polarity;
                if let Some(apertures) = self.registry.get(code) {
                    for aperture in apertures {
                        for item in draw::flash(aperture, target, polarity) {
                            emit(&mut self.items, &mut self.bounds, item);
                        }
                    }
                }
            }
            c if c >= 10 => {
                if !self.registry.contains(c) {
                    return Err(GerberError::UndefinedAperture { code: c, position });
                }
                self.state.aperture = Some(c);
                self.state.tool_on = false;
            }
            _ => warn!("unknown D{:02} at token {}", code, position),
        }
        Ok(())
    }

    fn selected_aperture(&self, position: usize) -> GerberResult<u32> {
        let code = self
            .state
            .aperture
            .ok_or(GerberError::NoApertureSelected { position })?;
        if !self.registry.contains(code) {
            return Err(GerberError::UndefinedAperture { code, position });
        }
        Ok(code)
    }

    /// D01 outside a region: stroke every primitive of the selected aperture.
    fn interpolate_to(&mut self, target: Point, position: usize) -> GerberResult<()> {
        let code = self.selected_aperture(position)?;
        let from = self.state.position;
        let polarity = self.state.polarity;
        let arc = self.arc_to(target);

        if let Some(apertures) = self.registry.get(code) {
            for aperture in apertures {
                let items = match &arc {
                    Some(arc) => draw::stroke_arc(aperture, arc, polarity),
                    None => draw::interpolate(aperture, from, target, polarity),
                };
                for item in items {
                    emit(&mut self.items, &mut self.bounds, item);
                }
            }
        }
        Ok(())
    }

    fn draw_in_region(&mut self, target: Point) {
        let from = self.state.position;
        let arc = self.arc_to(target);
        if let Some(region) = self.state.region.as_mut() {
            match arc {
                Some(arc) => region.arc_to(from, arc),
                None => region.line_to(from, target),
            }
        }
    }

    /// The arc from the current position to `target`, or `None` in linear mode.
    fn arc_to(&self, target: Point) -> Option<ArcSegment> {
        self.state.interpolation.arc_direction().map(|direction| {
            ArcSegment::resolve(
                self.state.position,
                target,
                self.state.arc_offset,
                direction,
                self.state.quadrant_mode,
            )
        })
    }

    fn close_region(&mut self) {
        let Some(region) = self.state.region.take() else {
            warn!("G37 without G36");
            return;
        };
        match region.build() {
            Some(path) => {
                trace!("region closed with {} segments", region.segment_count());
                emit(
                    &mut self.items,
                    &mut self.bounds,
                    DrawItem::new(Shape::Outline(path), self.state.polarity),
                );
            }
            None => debug!("empty region dropped"),
        }
    }
}

fn emit(items: &mut Vec<DrawItem>, bounds: &mut Bounds, item: DrawItem) {
    let (min, max) = item.shape.bounds();
    bounds.include_rect(min, max);
    trace!("emit {:?} {:?}..{:?}", item.polarity, min, max);
    items.push(item);
}

/// The run of number characters starting at byte `start`, and the index just past it.
fn number_span(block: &str, start: usize) -> (&str, usize) {
    let rest = block.get(start..).unwrap_or_default();
    let len = rest
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.')))
        .unwrap_or(rest.len());
    (&rest[..len], start + len)
}

fn parse_code(text: &str, position: usize) -> GerberResult<u32> {
    text.parse()
        .map_err(|_| MalformedNumber::new(text).at(position))
}

/// Interpret a whole document with a fresh bounds accumulator.
pub fn interpret(source: &str) -> GerberResult<Interpretation> {
    Interpreter::new(Bounds::new()).run(source)
}

/// Interpret a document, growing an existing bounds accumulator.
pub fn interpret_with_bounds(source: &str, bounds: Bounds) -> GerberResult<Interpretation> {
    Interpreter::new(bounds).run(source)
}
