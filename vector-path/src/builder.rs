//! Incremental path construction.

use crate::path::{Arc, Command, Path, Point};

// relative distance below which an arc is considered to start at the current point
const ARC_JOIN_EPSILON: f64 = 1e-9;

/// Builds a [`Path`] one command at a time.
///
/// A drawing command issued before any `move_to` starts the path at the
/// origin.
///
/// # Example
///
/// ```
/// use vector_path::PathBuilder;
///
/// let mut builder = PathBuilder::new();
/// builder.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 10.0).close();
/// assert_eq!(builder.build().to_string(), "M0 0L10 0L10 10z");
/// ```
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    path: Path,
    start: Point,
    current: Point,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The point where the next command starts.
    pub fn current_point(&self) -> Point {
        self.current
    }

    /// The start of the current subpath.
    pub fn start_point(&self) -> Point {
        self.start
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.path.push(Command::MoveTo, &[x, y]);
        self.start = Point::new(x, y);
        self.current = self.start;
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.ensure_started();
        self.path.push(Command::LineTo, &[x, y]);
        self.current = Point::new(x, y);
        self
    }

    pub fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) -> &mut Self {
        self.ensure_started();
        self.path.push(Command::QuadTo, &[cx0, cy0, x, y]);
        self.current = Point::new(x, y);
        self
    }

    pub fn cubic_to(
        &mut self,
        cx0: f64,
        cy0: f64,
        cx1: f64,
        cy1: f64,
        x: f64,
        y: f64,
    ) -> &mut Self {
        self.ensure_started();
        self.path.push(Command::CubicTo, &[cx0, cy0, cx1, cy1, x, y]);
        self.current = Point::new(x, y);
        self
    }

    /// Add an elliptical arc around `(cx, cy)` from angle `start` sweeping
    /// through `delta` radians.
    ///
    /// If the arc does not begin at the current point, a line to its start
    /// is inserted first. On an empty path the arc start becomes the first
    /// point instead.
    pub fn arc_to(
        &mut self,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        start: f64,
        delta: f64,
    ) -> &mut Self {
        let arc = Arc {
            center: Point::new(cx, cy),
            rx,
            ry,
            start,
            delta,
        };
        let from = arc.start_point();
        if self.path.is_empty() {
            self.move_to(from.x, from.y);
        } else {
            let scale = from.x.abs().max(from.y.abs()).max(1.0);
            if !from.approx_eq(self.current, ARC_JOIN_EPSILON * scale) {
                self.line_to(from.x, from.y);
            }
        }
        self.path
            .push(Command::ArcTo, &[cx, cy, rx, ry, start, delta]);
        self.current = arc.end_point();
        self
    }

    /// Close the current subpath; the current point returns to its start.
    pub fn close(&mut self) -> &mut Self {
        if self.path.is_empty() {
            return self;
        }
        self.path.push(Command::Close, &[]);
        self.current = self.start;
        self
    }

    /// Consume the builder, returning the path.
    pub fn build(self) -> Path {
        self.path
    }

    fn ensure_started(&mut self) {
        if self.path.is_empty() {
            self.move_to(0.0, 0.0);
        }
    }
}

impl From<PathBuilder> for Path {
    fn from(builder: PathBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn implicit_move_to_origin() {
        let mut builder = PathBuilder::new();
        builder.line_to(5.0, 0.0);
        let path = builder.build();
        assert_eq!(path.commands(), &[Command::MoveTo, Command::LineTo]);
        assert_eq!(path.points(), &[0.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn close_returns_to_start() {
        let mut builder = PathBuilder::new();
        builder.move_to(1.0, 1.0).line_to(4.0, 1.0).close();
        assert_eq!(builder.current_point(), Point::new(1.0, 1.0));
        // closing an empty path is a no-op
        let mut empty = PathBuilder::new();
        empty.close();
        assert!(empty.is_empty());
    }

    #[test]
    fn arc_joins_current_point() {
        let mut builder = PathBuilder::new();
        builder.move_to(2.0, 0.0).arc_to(0.0, 0.0, 2.0, 2.0, 0.0, PI);
        assert_eq!(builder.path.commands(), &[Command::MoveTo, Command::ArcTo]);
        assert!(builder.current_point().approx_eq(Point::new(-2.0, 0.0), 1e-12));

        // a disjoint arc gets a connecting line
        builder.arc_to(10.0, 0.0, 1.0, 1.0, 0.0, PI);
        assert_eq!(
            builder.path.commands(),
            &[
                Command::MoveTo,
                Command::ArcTo,
                Command::LineTo,
                Command::ArcTo
            ]
        );
    }

    #[test]
    fn arc_on_empty_path_moves() {
        let mut builder = PathBuilder::new();
        builder.arc_to(0.0, 0.0, 3.0, 3.0, PI / 2.0, PI);
        let path = builder.build();
        assert_eq!(path.commands(), &[Command::MoveTo, Command::ArcTo]);
        assert!((path.points()[1] - 3.0).abs() < 1e-12);
    }
}
