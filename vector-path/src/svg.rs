//! Reading and writing SVG path data.
//!
//! See <https://www.w3.org/TR/SVG11/paths.html#PathData>

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::{self, Write};
use std::str::FromStr;

use thiserror::Error;

use crate::{
    builder::PathBuilder,
    path::{Path, PathEl, Point},
};

// digits printed after the decimal point
const PRECISION: usize = 8;

/// An error encountered while parsing SVG path data.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathParseError {
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("expected a number at offset {0}")]
    MissingNumber(usize),
    #[error("expected an arc flag (0 or 1) at offset {0}")]
    InvalidFlag(usize),
}

impl Path {
    /// Parse SVG path data.
    ///
    /// All commands of the SVG path grammar are accepted, upper case for
    /// absolute and lower case for relative coordinates. Data that does not
    /// begin with a moveto starts at the origin.
    ///
    /// Endpoint arcs become center parameterized [`Command::ArcTo`]s unless
    /// they have a non-zero x axis rotation, in which case they are
    /// approximated with cubic beziers.
    ///
    /// [`Command::ArcTo`]: crate::Command::ArcTo
    pub fn from_svg(data: &str) -> Result<Path, PathParseError> {
        Parser::new(data).parse()
    }

    /// Format the path as SVG path data.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::from_svg(s)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Previous {
    Quad(Point),
    Cubic(Point),
    Other,
}

struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
    builder: PathBuilder,
    // the control point to reflect for T and S
    previous: Previous,
}

impl<'a> Parser<'a> {
    fn new(data: &'a str) -> Self {
        Parser {
            data: data.as_bytes(),
            pos: 0,
            builder: PathBuilder::new(),
            previous: Previous::Other,
        }
    }

    fn parse(mut self) -> Result<Path, PathParseError> {
        let mut command = None;
        loop {
            self.skip_separators();
            let Some(&byte) = self.data.get(self.pos) else {
                break;
            };
            if byte.is_ascii_alphabetic() {
                if !b"MmLlHhVvQqTtCcSsAaZz".contains(&byte) {
                    return Err(self.unexpected());
                }
                self.pos += 1;
                command = Some(byte);
                if byte.eq_ignore_ascii_case(&b'z') {
                    self.builder.close();
                    self.previous = Previous::Other;
                    command = None;
                    continue;
                }
            } else if command.is_none() {
                return Err(self.unexpected());
            }
            let Some(current) = command else {
                continue;
            };
            self.command(current)?;
            // extra coordinate pairs after a moveto are linetos
            command = match current {
                b'M' => Some(b'L'),
                b'm' => Some(b'l'),
                other => Some(other),
            };
        }
        Ok(self.builder.build())
    }

    fn command(&mut self, command: u8) -> Result<(), PathParseError> {
        let relative = command.is_ascii_lowercase();
        let origin = if relative {
            self.builder.current_point()
        } else {
            Point::ZERO
        };
        let point = |parser: &mut Self| -> Result<Point, PathParseError> {
            let x = parser.number()?;
            let y = parser.number()?;
            Ok(Point::new(origin.x + x, origin.y + y))
        };
        let current = self.builder.current_point();
        let mut previous = Previous::Other;
        match command.to_ascii_uppercase() {
            b'M' => {
                let p = point(self)?;
                self.builder.move_to(p.x, p.y);
            }
            b'L' => {
                let p = point(self)?;
                self.builder.line_to(p.x, p.y);
            }
            b'H' => {
                let x = self.number()? + if relative { current.x } else { 0.0 };
                self.builder.line_to(x, current.y);
            }
            b'V' => {
                let y = self.number()? + if relative { current.y } else { 0.0 };
                self.builder.line_to(current.x, y);
            }
            b'Q' => {
                let c = point(self)?;
                let p = point(self)?;
                self.builder.quad_to(c.x, c.y, p.x, p.y);
                previous = Previous::Quad(c);
            }
            b'T' => {
                let c = match self.previous {
                    Previous::Quad(c) => reflect(c, current),
                    _ => current,
                };
                let p = point(self)?;
                self.builder.quad_to(c.x, c.y, p.x, p.y);
                previous = Previous::Quad(c);
            }
            b'C' => {
                let c0 = point(self)?;
                let c1 = point(self)?;
                let p = point(self)?;
                self.builder.cubic_to(c0.x, c0.y, c1.x, c1.y, p.x, p.y);
                previous = Previous::Cubic(c1);
            }
            b'S' => {
                let c0 = match self.previous {
                    Previous::Cubic(c) => reflect(c, current),
                    _ => current,
                };
                let c1 = point(self)?;
                let p = point(self)?;
                self.builder.cubic_to(c0.x, c0.y, c1.x, c1.y, p.x, p.y);
                previous = Previous::Cubic(c1);
            }
            b'A' => {
                let rx = self.number()?;
                let ry = self.number()?;
                let rotation = self.number()?;
                let large_arc = self.flag()?;
                let sweep = self.flag()?;
                let p = point(self)?;
                svg_arc(
                    &mut self.builder,
                    current,
                    (rx, ry),
                    rotation,
                    large_arc,
                    sweep,
                    p,
                );
            }
            _ => return Err(self.unexpected()),
        }
        self.previous = previous;
        Ok(())
    }

    fn unexpected(&self) -> PathParseError {
        let ch = std::str::from_utf8(&self.data[self.pos..])
            .ok()
            .and_then(|rest| rest.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        PathParseError::UnexpectedChar {
            ch,
            offset: self.pos,
        }
    }

    fn skip_separators(&mut self) {
        while let Some(byte) = self.data.get(self.pos) {
            if byte.is_ascii_whitespace() || *byte == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn number(&mut self) -> Result<f64, PathParseError> {
        self.skip_separators();
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut digits = self.skip_digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            digits += self.skip_digits();
        }
        if digits == 0 {
            self.pos = start;
            return Err(PathParseError::MissingNumber(start));
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mantissa_end = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            // 'e' without digits is not an exponent
            if self.skip_digits() == 0 {
                self.pos = mantissa_end;
            }
        }
        std::str::from_utf8(&self.data[start..self.pos])
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or(PathParseError::MissingNumber(start))
    }

    fn flag(&mut self) -> Result<bool, PathParseError> {
        self.skip_separators();
        let flag = match self.peek() {
            Some(b'0') => false,
            Some(b'1') => true,
            _ => return Err(PathParseError::InvalidFlag(self.pos)),
        };
        self.pos += 1;
        Ok(flag)
    }
}

fn reflect(control: Point, around: Point) -> Point {
    Point::new(2.0 * around.x - control.x, 2.0 * around.y - control.y)
}

/// Append an endpoint parameterized arc to `builder`.
///
/// Follows the conversion in
/// <https://www.w3.org/TR/SVG11/implnote.html#ArcImplementationNotes>.
fn svg_arc(
    builder: &mut PathBuilder,
    from: Point,
    (rx, ry): (f64, f64),
    rotation_degrees: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) {
    if from == to {
        return;
    }
    let (mut rx, mut ry) = (rx.abs(), ry.abs());
    if rx == 0.0 || ry == 0.0 {
        builder.line_to(to.x, to.y);
        return;
    }
    let phi = rotation_degrees.rem_euclid(360.0).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let dx2 = (from.x - to.x) * 0.5;
    let dy2 = (from.y - to.y) * 0.5;
    let x1 = cos_phi * dx2 + sin_phi * dy2;
    let y1 = -sin_phi * dx2 + cos_phi * dy2;

    // scale up radii that cannot span the endpoints
    let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }
    let (rx2, ry2) = (rx * rx, ry * ry);
    let numerator = rx2 * ry2 - rx2 * y1 * y1 - ry2 * x1 * x1;
    let denominator = rx2 * y1 * y1 + ry2 * x1 * x1;
    let mut coef = (numerator / denominator).max(0.0).sqrt();
    if large_arc == sweep {
        coef = -coef;
    }
    let cx1 = coef * rx * y1 / ry;
    let cy1 = -coef * ry * x1 / rx;
    let center = Point::new(
        cos_phi * cx1 - sin_phi * cy1 + (from.x + to.x) * 0.5,
        sin_phi * cx1 + cos_phi * cy1 + (from.y + to.y) * 0.5,
    );

    let (ux, uy) = ((x1 - cx1) / rx, (y1 - cy1) / ry);
    let (vx, vy) = ((-x1 - cx1) / rx, (-y1 - cy1) / ry);
    let start = uy.atan2(ux);
    let mut delta = (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
    if !sweep && delta > 0.0 {
        delta -= TAU;
    } else if sweep && delta < 0.0 {
        delta += TAU;
    }

    if phi == 0.0 {
        builder.arc_to(center.x, center.y, rx, ry, start, delta);
    } else {
        rotated_arc_to_cubics(builder, center, (rx, ry), phi, start, delta, to);
    }
}

// Approximate a rotated elliptical arc with cubic beziers of at most a
// quarter turn each.
fn rotated_arc_to_cubics(
    builder: &mut PathBuilder,
    center: Point,
    (rx, ry): (f64, f64),
    phi: f64,
    start: f64,
    delta: f64,
    to: Point,
) {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let point = |angle: f64| {
        let (sin, cos) = angle.sin_cos();
        let (x, y) = (rx * cos, ry * sin);
        Point::new(
            center.x + cos_phi * x - sin_phi * y,
            center.y + sin_phi * x + cos_phi * y,
        )
    };
    let derivative = |angle: f64| {
        let (sin, cos) = angle.sin_cos();
        let (x, y) = (-rx * sin, ry * cos);
        Point::new(cos_phi * x - sin_phi * y, sin_phi * x + cos_phi * y)
    };
    let segments = (delta.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = delta / segments as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();
    let mut p0 = builder.current_point();
    for i in 0..segments {
        let a0 = start + step * i as f64;
        let a1 = a0 + step;
        let p3 = if i + 1 == segments { to } else { point(a1) };
        let (d0, d1) = (derivative(a0), derivative(a1));
        let c0 = Point::new(p0.x + k * d0.x, p0.y + k * d0.y);
        let c1 = Point::new(p3.x - k * d1.x, p3.y - k * d1.y);
        builder.cubic_to(c0.x, c0.y, c1.x, c1.y, p3.x, p3.y);
        p0 = p3;
    }
}

pub(crate) fn write_path(path: &Path, f: &mut impl Write) -> fmt::Result {
    for el in path.segments() {
        match el {
            PathEl::MoveTo(p) => write!(f, "M{} {}", num(p.x), num(p.y))?,
            PathEl::LineTo(p) => write!(f, "L{} {}", num(p.x), num(p.y))?,
            PathEl::QuadTo(c, p) => write!(
                f,
                "Q{} {} {} {}",
                num(c.x),
                num(c.y),
                num(p.x),
                num(p.y)
            )?,
            PathEl::CubicTo(c0, c1, p) => write!(
                f,
                "C{} {} {} {} {} {}",
                num(c0.x),
                num(c0.y),
                num(c1.x),
                num(c1.y),
                num(p.x),
                num(p.y)
            )?,
            PathEl::ArcTo(arc) => {
                // a single endpoint arc cannot describe a full turn
                let pieces = if arc.delta.abs() >= TAU - 1e-9 { 2 } else { 1 };
                let delta = arc.delta / pieces as f64;
                for i in 1..=pieces {
                    let end = arc.point_at(arc.start + delta * i as f64);
                    let large_arc = delta.abs() > PI;
                    let sweep = delta > 0.0;
                    write!(
                        f,
                        "A{} {} 0 {} {} {} {}",
                        num(arc.rx.abs()),
                        num(arc.ry.abs()),
                        large_arc as u8,
                        sweep as u8,
                        num(end.x),
                        num(end.y)
                    )?;
                }
            }
            PathEl::Close => f.write_char('z')?,
        }
    }
    Ok(())
}

// at most PRECISION decimals, no trailing zeros, no negative zero
fn num(value: f64) -> String {
    let mut text = format!("{:.*}", PRECISION, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}
