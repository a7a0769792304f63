//! The path model: typed commands over a flat coordinate buffer.

use std::f64::consts::{PI, TAU};
use std::fmt;

use sfnt_types::BoundingBox;

use crate::flatten::{flatten, BoundsFlattener};

/// A point in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub(crate) fn approx_eq(self, other: Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// The kind of a path command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    MoveTo,
    LineTo,
    QuadTo,
    CubicTo,
    ArcTo,
    Close,
}

impl Command {
    /// The number of coordinates this command consumes from the point buffer.
    pub const fn arity(self) -> usize {
        match self {
            Command::MoveTo | Command::LineTo => 2,
            Command::QuadTo => 4,
            Command::CubicTo | Command::ArcTo => 6,
            Command::Close => 0,
        }
    }
}

/// An elliptical arc in center parameterization.
///
/// Angles are in radians, measured from the positive x axis towards the
/// positive y axis. A positive `delta` sweeps in that direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    pub start: f64,
    pub delta: f64,
}

impl Arc {
    /// The point on the ellipse at `angle`.
    pub fn point_at(&self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point::new(self.center.x + self.rx * cos, self.center.y + self.ry * sin)
    }

    pub fn start_point(&self) -> Point {
        self.point_at(self.start)
    }

    pub fn end_point(&self) -> Point {
        self.point_at(self.start + self.delta)
    }

    fn approx_eq(&self, other: &Arc, epsilon: f64) -> bool {
        self.center.approx_eq(other.center, epsilon)
            && (self.rx - other.rx).abs() <= epsilon
            && (self.ry - other.ry).abs() <= epsilon
            && angle_difference(self.start, other.start).abs() <= epsilon
            && (self.delta - other.delta).abs() <= epsilon
    }
}

// the difference between two angles, folded into [-PI, PI]
fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}

/// Single element of a path, with its coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathEl {
    /// Begin a new subpath.
    MoveTo(Point),
    /// Draw a line from the current point.
    LineTo(Point),
    /// Draw a quadratic bezier from the current point with the given control
    /// point.
    QuadTo(Point, Point),
    /// Draw a cubic bezier from the current point with the given control
    /// points.
    CubicTo(Point, Point, Point),
    /// Draw an elliptical arc.
    ArcTo(Arc),
    /// Close the current subpath.
    Close,
}

/// An ordered sequence of drawing commands.
///
/// The coordinates of all commands are stored in one buffer; each command
/// consumes [`Command::arity`] values from it. The first command of a
/// non-empty path is always a [`Command::MoveTo`].
///
/// Paths are created with a [`PathBuilder`](crate::PathBuilder), parsed from
/// SVG path data with [`Path::from_svg`], or produced by the helpers in
/// [`shapes`](crate::shapes).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub(crate) commands: Vec<Command>,
    pub(crate) points: Vec<f64>,
}

impl Path {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The flat coordinate buffer.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub(crate) fn push(&mut self, command: Command, points: &[f64]) {
        debug_assert_eq!(command.arity(), points.len());
        self.commands.push(command);
        self.points.extend_from_slice(points);
    }

    /// Append all commands of `other`.
    pub fn extend(&mut self, other: &Path) {
        self.commands.extend_from_slice(&other.commands);
        self.points.extend_from_slice(&other.points);
    }

    /// Iterate over the elements of the path.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            commands: self.commands.iter(),
            points: &self.points,
        }
    }

    /// The point where the next command would start.
    ///
    /// This is the end point of the last command, or the start of the
    /// subpath after a close. Returns `None` for an empty path.
    pub fn current_point(&self) -> Option<Point> {
        let mut start = None;
        let mut current = None;
        for el in self.segments() {
            match el {
                PathEl::MoveTo(p) => {
                    start = Some(p);
                    current = Some(p);
                }
                PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CubicTo(_, _, p) => {
                    current = Some(p)
                }
                PathEl::ArcTo(arc) => current = Some(arc.end_point()),
                PathEl::Close => current = start,
            }
        }
        current
    }

    /// The bounding box of the flattened path, or `None` if it is empty.
    pub fn bounds(&self) -> Option<BoundingBox<f64>> {
        let mut bounds = BoundsFlattener::default();
        flatten(self, &mut bounds, 1.0);
        bounds.bounds()
    }

    /// Compare two paths, allowing coordinates to differ by `epsilon`.
    ///
    /// Arc start angles are compared modulo a full turn.
    pub fn approx_eq(&self, other: &Path, epsilon: f64) -> bool {
        self.commands == other.commands
            && self
                .segments()
                .zip(other.segments())
                .all(|pair| match pair {
                    (PathEl::MoveTo(a), PathEl::MoveTo(b))
                    | (PathEl::LineTo(a), PathEl::LineTo(b)) => a.approx_eq(b, epsilon),
                    (PathEl::QuadTo(a0, a1), PathEl::QuadTo(b0, b1)) => {
                        a0.approx_eq(b0, epsilon) && a1.approx_eq(b1, epsilon)
                    }
                    (PathEl::CubicTo(a0, a1, a2), PathEl::CubicTo(b0, b1, b2)) => {
                        a0.approx_eq(b0, epsilon)
                            && a1.approx_eq(b1, epsilon)
                            && a2.approx_eq(b2, epsilon)
                    }
                    (PathEl::ArcTo(a), PathEl::ArcTo(b)) => a.approx_eq(&b, epsilon),
                    (PathEl::Close, PathEl::Close) => true,
                    _ => false,
                })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::svg::write_path(self, f)
    }
}

/// Iterator over the elements of a [`Path`].
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    commands: std::slice::Iter<'a, Command>,
    points: &'a [f64],
}

impl Iterator for Segments<'_> {
    type Item = PathEl;

    fn next(&mut self) -> Option<PathEl> {
        let command = *self.commands.next()?;
        let (args, rest) = self.points.split_at(command.arity());
        self.points = rest;
        let p = |i: usize| Point::new(args[i], args[i + 1]);
        Some(match command {
            Command::MoveTo => PathEl::MoveTo(p(0)),
            Command::LineTo => PathEl::LineTo(p(0)),
            Command::QuadTo => PathEl::QuadTo(p(0), p(2)),
            Command::CubicTo => PathEl::CubicTo(p(0), p(2), p(4)),
            Command::ArcTo => PathEl::ArcTo(Arc {
                center: p(0),
                rx: args[2],
                ry: args[3],
                start: args[4],
                delta: args[5],
            }),
            Command::Close => PathEl::Close,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.commands.size_hint()
    }
}

impl ExactSizeIterator for Segments<'_> {}
