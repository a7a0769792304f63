//! Reducing paths to straight segments.

use sfnt_types::BoundingBox;

use crate::{
    matrix::Matrix,
    path::{Path, PathEl, Point},
    tracer::{tolerance, trace_arc, trace_cubic, trace_quad},
};

/// Interface for accepting a path made only of straight segments.
///
/// This is the seam between geometry and rendering backends: rasterizers,
/// strokers and vector writers implement it to receive flattened paths.
pub trait Flattener {
    /// Begin a new subpath at (x, y).
    fn move_to(&mut self, x: f64, y: f64);

    /// Draw a line from the current point to (x, y).
    fn line_to(&mut self, x: f64, y: f64);

    /// Mark the current point as a join between two explicit lines.
    fn line_join(&mut self);

    /// The current subpath was closed.
    fn close(&mut self);

    /// The current subpath is finished; stroke caps may be drawn.
    fn end(&mut self);
}

impl<T: Flattener + ?Sized> Flattener for &mut T {
    fn move_to(&mut self, x: f64, y: f64) {
        (**self).move_to(x, y)
    }

    fn line_to(&mut self, x: f64, y: f64) {
        (**self).line_to(x, y)
    }

    fn line_join(&mut self) {
        (**self).line_join()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn end(&mut self) {
        (**self).end()
    }
}

/// Convert the curves of `path` into straight segments and feed them to
/// `flattener`.
///
/// `scale` is the factor from path units to device pixels; curves are
/// approximated to within half a device pixel. A scale that is not a
/// positive finite number is treated as 1.
///
/// Every curve, arc and close is followed by a `line_to` its exact end
/// point, and `end` is called once at the end of the stream.
pub fn flatten<F: Flattener + ?Sized>(path: &Path, flattener: &mut F, scale: f64) {
    let tolerance = tolerance(scale);
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;
    for (i, el) in path.segments().enumerate() {
        match el {
            PathEl::MoveTo(p) => {
                if i != 0 {
                    flattener.end();
                }
                start = p;
                current = p;
                flattener.move_to(p.x, p.y);
            }
            PathEl::LineTo(p) => {
                flattener.line_to(p.x, p.y);
                flattener.line_join();
                current = p;
            }
            PathEl::QuadTo(c0, p) => {
                trace_quad(flattener, [current, c0, p], tolerance);
                flattener.line_to(p.x, p.y);
                current = p;
            }
            PathEl::CubicTo(c0, c1, p) => {
                trace_cubic(flattener, [current, c0, c1, p], tolerance);
                flattener.line_to(p.x, p.y);
                current = p;
            }
            PathEl::ArcTo(arc) => {
                let end = trace_arc(flattener, &arc, tolerance);
                flattener.line_to(end.x, end.y);
                current = end;
            }
            PathEl::Close => {
                flattener.line_to(start.x, start.y);
                flattener.close();
                current = start;
            }
        }
    }
    log::trace!("flattened {} commands, ending at {current:?}", path.len());
    flattener.end();
}

/// A flattener event, for recording the output of [`flatten`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlattenEvent {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    LineJoin,
    Close,
    End,
}

impl Flattener for Vec<FlattenEvent> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.push(FlattenEvent::MoveTo(x, y))
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(FlattenEvent::LineTo(x, y))
    }

    fn line_join(&mut self) {
        self.push(FlattenEvent::LineJoin)
    }

    fn close(&mut self) {
        self.push(FlattenEvent::Close)
    }

    fn end(&mut self) {
        self.push(FlattenEvent::End)
    }
}

/// Collects the coordinates of every point, in order, into one buffer.
///
/// Subpath boundaries are not recorded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentedPath {
    pub points: Vec<f64>,
}

impl Flattener for SegmentedPath {
    fn move_to(&mut self, x: f64, y: f64) {
        self.points.extend_from_slice(&[x, y]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.points.extend_from_slice(&[x, y]);
    }

    fn line_join(&mut self) {}

    fn close(&mut self) {}

    fn end(&mut self) {}
}

/// Forwards every call to each of a list of flatteners, in order.
#[derive(Default)]
pub struct DemuxFlattener<'a> {
    flatteners: Vec<&'a mut dyn Flattener>,
}

impl<'a> DemuxFlattener<'a> {
    pub fn new(flatteners: Vec<&'a mut dyn Flattener>) -> Self {
        DemuxFlattener { flatteners }
    }

    pub fn push(&mut self, flattener: &'a mut dyn Flattener) {
        self.flatteners.push(flattener);
    }
}

impl Flattener for DemuxFlattener<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        for flattener in self.flatteners.iter_mut() {
            flattener.move_to(x, y);
        }
    }

    fn line_to(&mut self, x: f64, y: f64) {
        for flattener in self.flatteners.iter_mut() {
            flattener.line_to(x, y);
        }
    }

    fn line_join(&mut self) {
        for flattener in self.flatteners.iter_mut() {
            flattener.line_join();
        }
    }

    fn close(&mut self) {
        for flattener in self.flatteners.iter_mut() {
            flattener.close();
        }
    }

    fn end(&mut self) {
        for flattener in self.flatteners.iter_mut() {
            flattener.end();
        }
    }
}

/// A flattener that transforms coordinates using a [`Matrix`] before
/// passing them on.
pub struct Transformer<'a, T: Flattener + ?Sized> {
    inner: &'a mut T,
    matrix: Matrix,
}

impl<'a, T: Flattener + ?Sized> Transformer<'a, T> {
    pub fn new(inner: &'a mut T, matrix: Matrix) -> Self {
        Transformer { inner, matrix }
    }
}

impl<T: Flattener + ?Sized> Flattener for Transformer<'_, T> {
    fn move_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.matrix.transform(x, y);
        self.inner.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.matrix.transform(x, y);
        self.inner.line_to(x, y);
    }

    fn line_join(&mut self) {
        self.inner.line_join();
    }

    fn close(&mut self) {
        self.inner.close();
    }

    fn end(&mut self) {
        self.inner.end();
    }
}

/// Accumulates the bounding box of every point it receives.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundsFlattener {
    bounds: Option<BoundingBox<f64>>,
}

impl BoundsFlattener {
    /// The bounds of the points seen so far.
    pub fn bounds(&self) -> Option<BoundingBox<f64>> {
        self.bounds
    }

    fn add(&mut self, x: f64, y: f64) {
        match self.bounds.as_mut() {
            Some(bounds) => bounds.add_point(x, y),
            None => self.bounds = Some(BoundingBox::from_point(x, y)),
        }
    }
}

impl Flattener for BoundsFlattener {
    fn move_to(&mut self, x: f64, y: f64) {
        self.add(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.add(x, y);
    }

    fn line_join(&mut self) {}

    fn close(&mut self) {}

    fn end(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathBuilder;
    use pretty_assertions::assert_eq;
    use std::f64::consts::PI;

    use FlattenEvent::*;

    fn events(path: &Path, scale: f64) -> Vec<FlattenEvent> {
        let mut events = Vec::new();
        flatten(path, &mut events, scale);
        events
    }

    #[test]
    fn lines_and_close() {
        let path: Path = "M1 1L4 1L4 5zM10 10L11 10".parse().unwrap();
        assert_eq!(
            events(&path, 1.0),
            [
                MoveTo(1.0, 1.0),
                LineTo(4.0, 1.0),
                LineJoin,
                LineTo(4.0, 5.0),
                LineJoin,
                LineTo(1.0, 1.0),
                Close,
                End,
                MoveTo(10.0, 10.0),
                LineTo(11.0, 10.0),
                LineJoin,
                End,
            ]
        );
    }

    #[test]
    fn empty_path_only_ends() {
        assert_eq!(events(&Path::new(), 1.0), [End]);
    }

    #[test]
    fn curves_end_exactly() {
        let mut builder = PathBuilder::new();
        builder
            .move_to(0.0, 0.0)
            .quad_to(50.0, 100.0, 100.0, 0.3)
            .cubic_to(120.0, 50.0, 150.0, -50.0, 170.7, 0.1)
            .arc_to(200.0, 0.1, 29.3, 15.0, PI, -PI * 0.75);
        let path = builder.build();
        let events = events(&path, 2.0);
        let arc_end = path.current_point().unwrap();
        let line_ends: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                LineTo(x, y) => Some((*x, *y)),
                _ => None,
            })
            .collect();
        assert!(line_ends.contains(&(100.0, 0.3)));
        assert!(line_ends.contains(&(170.7, 0.1)));
        assert_eq!(line_ends.last(), Some(&(arc_end.x, arc_end.y)));
        assert_eq!(events.last(), Some(&End));
        assert_eq!(events.iter().filter(|e| **e == End).count(), 1);
    }

    #[test]
    fn deterministic() {
        let path = crate::shapes::rounded_rectangle(30.0, 20.0, 5.0);
        assert_eq!(events(&path, 3.0), events(&path, 3.0));
    }

    #[test]
    fn closed_path_returns_to_move_to() {
        let path = crate::shapes::circle(10.0);
        let events = events(&path, 1.0);
        let close = events.iter().position(|e| *e == Close).unwrap();
        assert_eq!(events[close - 1], LineTo(10.0, 0.0));
    }

    #[test]
    fn demux_forwards_in_order() {
        let path = crate::shapes::star_polygon(5, 10.0, 4.0, true);
        let mut first = Vec::new();
        let mut second = SegmentedPath::default();
        let mut bounds = BoundsFlattener::default();
        let mut demux = DemuxFlattener::new(vec![&mut first as &mut dyn Flattener, &mut second]);
        demux.push(&mut bounds);
        flatten(&path, &mut demux, 1.0);
        drop(demux);

        assert_eq!(first, events(&path, 1.0));
        let mut direct = SegmentedPath::default();
        flatten(&path, &mut direct, 1.0);
        assert_eq!(second, direct);
        let bounds = bounds.bounds().unwrap();
        assert!((bounds.y_max - 10.0).abs() < 1e-9);
    }

    #[test]
    fn transformer_maps_points() {
        let path: Path = "M1 0L2 0".parse().unwrap();
        let mut inner = Vec::new();
        let mut transformer =
            Transformer::new(&mut inner, Matrix::translation(10.0, 5.0).then_scale(2.0, 2.0));
        flatten(&path, &mut transformer, 1.0);
        assert_eq!(
            inner,
            [MoveTo(22.0, 10.0), LineTo(24.0, 10.0), LineJoin, End]
        );
    }

    #[test]
    fn segmented_path_collects_coordinates() {
        let path: Path = "M0 0L1 2L3 4z".parse().unwrap();
        let mut collected = SegmentedPath::default();
        flatten(&path, &mut collected, 1.0);
        assert_eq!(collected.points, [0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 0.0]);
    }

    #[test]
    fn dyn_flattener() {
        let path: Path = "M0 0L1 1".parse().unwrap();
        let mut collected = SegmentedPath::default();
        let flattener: &mut dyn Flattener = &mut collected;
        flatten(&path, flattener, 1.0);
        assert_eq!(collected.points.len(), 4);
    }
}
