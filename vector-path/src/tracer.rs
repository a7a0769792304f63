//! Approximating curves and arcs with line segments.
//!
//! The tracers emit the intermediate points of the approximation as
//! `line_to` calls; the final end point is left to the caller.

use crate::{
    flatten::Flattener,
    path::{Arc, Point},
};

/// Maximum number of times a bezier is halved on any branch.
pub const MAX_SUBDIVISIONS: usize = 16;

/// Maximum number of segments used for a single arc.
pub const MAX_ARC_STEPS: usize = 4096;

// half a device pixel
const DEVICE_TOLERANCE: f64 = 0.5;

/// The flattening tolerance, in path units, for the given device scale.
///
/// A scale that is not a positive finite number is treated as 1.
pub fn tolerance(scale: f64) -> f64 {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    DEVICE_TOLERANCE / scale
}

/// Emit the intermediate points of a quadratic bezier.
///
/// `points` are the start, control and end points.
pub fn trace_quad<F: Flattener + ?Sized>(flattener: &mut F, points: [Point; 3], tolerance: f64) {
    trace_bezier(flattener, points, tolerance)
}

/// Emit the intermediate points of a cubic bezier.
///
/// `points` are the start, both control points and the end point.
pub fn trace_cubic<F: Flattener + ?Sized>(flattener: &mut F, points: [Point; 4], tolerance: f64) {
    trace_bezier(flattener, points, tolerance)
}

// De Casteljau halving until every control point is within tolerance of the
// chord. Pieces are visited left to right, so the last accepted piece is the
// one that ends on the curve's end point.
fn trace_bezier<F: Flattener + ?Sized, const N: usize>(
    flattener: &mut F,
    curve: [Point; N],
    tolerance: f64,
) {
    if curve.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return;
    }
    // at most one pending right half per level
    let mut stack = Vec::with_capacity(MAX_SUBDIVISIONS + 1);
    stack.push((curve, 0));
    while let Some((curve, depth)) = stack.pop() {
        if depth >= MAX_SUBDIVISIONS || is_flat(&curve, tolerance) {
            if !stack.is_empty() {
                let end = curve[N - 1];
                flattener.line_to(end.x, end.y);
            }
            continue;
        }
        let (left, right) = subdivide(curve);
        stack.push((right, depth + 1));
        stack.push((left, depth + 1));
    }
}

fn subdivide<const N: usize>(curve: [Point; N]) -> ([Point; N], [Point; N]) {
    let mut left = curve;
    let mut right = curve;
    let mut work = curve;
    for level in 1..N {
        for i in 0..N - level {
            work[i] = work[i].midpoint(work[i + 1]);
        }
        left[level] = work[0];
        right[N - 1 - level] = work[N - 1 - level];
    }
    (left, right)
}

fn is_flat<const N: usize>(curve: &[Point; N], tolerance: f64) -> bool {
    let (from, to) = (curve[0], curve[N - 1]);
    curve[1..N - 1]
        .iter()
        .all(|p| segment_distance(*p, from, to) <= tolerance)
}

fn segment_distance(p: Point, from: Point, to: Point) -> f64 {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance(from);
    }
    let t = (((p.x - from.x) * dx + (p.y - from.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(from.x + t * dx, from.y + t * dy))
}

/// Emit the intermediate points of an elliptical arc and return its exact
/// end point.
///
/// The arc is divided into equal angular steps, each the largest angle whose
/// sagitta on the mean radius stays within `tolerance`.
pub fn trace_arc<F: Flattener + ?Sized>(flattener: &mut F, arc: &Arc, tolerance: f64) -> Point {
    let end = arc.end_point();
    let radius = (arc.rx.abs() + arc.ry.abs()) * 0.5;
    if !(radius > 0.0 && radius.is_finite() && arc.delta.is_finite()) {
        return end;
    }
    let step = 2.0 * (1.0 - tolerance / radius).max(-1.0).acos();
    let steps = if step > 0.0 {
        ((arc.delta.abs() / step).ceil() as usize).clamp(1, MAX_ARC_STEPS)
    } else {
        MAX_ARC_STEPS
    };
    for i in 1..steps {
        let angle = arc.start + arc.delta * (i as f64 / steps as f64);
        let p = arc.point_at(angle);
        flattener.line_to(p.x, p.y);
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlattenEvent;
    use kurbo::{CubicBez, ParamCurve, ParamCurveNearest, QuadBez};
    use std::f64::consts::{PI, TAU};

    fn traced(f: impl FnOnce(&mut Vec<FlattenEvent>)) -> Vec<Point> {
        let mut events = Vec::new();
        f(&mut events);
        events
            .into_iter()
            .map(|event| match event {
                FlattenEvent::LineTo(x, y) => Point::new(x, y),
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    fn polyline_distance(p: Point, polyline: &[Point]) -> f64 {
        polyline
            .windows(2)
            .map(|pair| segment_distance(p, pair[0], pair[1]))
            .fold(f64::INFINITY, f64::min)
    }

    fn to_kurbo(p: Point) -> kurbo::Point {
        kurbo::Point::new(p.x, p.y)
    }

    fn from_kurbo(p: kurbo::Point) -> Point {
        Point::new(p.x, p.y)
    }

    #[test]
    fn scale_to_tolerance() {
        assert_eq!(tolerance(1.0), 0.5);
        assert_eq!(tolerance(4.0), 0.125);
        assert_eq!(tolerance(0.0), 0.5);
        assert_eq!(tolerance(-2.0), 0.5);
        assert_eq!(tolerance(f64::NAN), 0.5);
        assert_eq!(tolerance(f64::INFINITY), 0.5);
    }

    #[test]
    fn subdivide_cubic() {
        let curve = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 8.0),
            Point::new(8.0, 8.0),
            Point::new(8.0, 0.0),
        ];
        let (left, right) = subdivide(curve);
        assert_eq!(left[0], curve[0]);
        assert_eq!(right[3], curve[3]);
        assert_eq!(left[3], right[0]);
        assert_eq!(left[3], Point::new(4.0, 6.0));
    }

    #[test]
    fn quad_within_tolerance() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 100.0),
            Point::new(100.0, 0.0),
        ];
        let quad = QuadBez::new(to_kurbo(points[0]), to_kurbo(points[1]), to_kurbo(points[2]));
        for tolerance in [0.5, 0.1, 0.01] {
            let inner = traced(|f| trace_quad(f, points, tolerance));
            assert!(!inner.is_empty());
            for p in &inner {
                assert!(quad.nearest(to_kurbo(*p), 1e-9).distance_sq < 1e-12);
            }
            let mut polyline = vec![points[0]];
            polyline.extend(inner);
            polyline.push(points[2]);
            for i in 0..=200 {
                let on_curve = from_kurbo(quad.eval(i as f64 / 200.0));
                assert!(polyline_distance(on_curve, &polyline) <= tolerance + 1e-9);
            }
        }
    }

    #[test]
    fn cubic_within_tolerance() {
        let points = [
            Point::new(10.0, 10.0),
            Point::new(10.0, 200.0),
            Point::new(300.0, -100.0),
            Point::new(300.0, 90.0),
        ];
        let cubic = CubicBez::new(
            to_kurbo(points[0]),
            to_kurbo(points[1]),
            to_kurbo(points[2]),
            to_kurbo(points[3]),
        );
        let tolerance = 0.25;
        let inner = traced(|f| trace_cubic(f, points, tolerance));
        for p in &inner {
            assert!(cubic.nearest(to_kurbo(*p), 1e-9).distance_sq < 1e-12);
        }
        let mut polyline = vec![points[0]];
        polyline.extend(inner);
        polyline.push(points[3]);
        for i in 0..=500 {
            let on_curve = from_kurbo(cubic.eval(i as f64 / 500.0));
            assert!(polyline_distance(on_curve, &polyline) <= tolerance + 1e-9);
        }
    }

    #[test]
    fn degenerate_curves_terminate() {
        let p = Point::new(3.0, 4.0);
        assert!(traced(|f| trace_cubic(f, [p; 4], 0.0)).is_empty());
        let collinear = [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)];
        assert!(traced(|f| trace_quad(f, collinear, 0.0)).is_empty());
        let nan = [Point::new(0.0, 0.0), Point::new(f64::NAN, 0.0), Point::new(1.0, 0.0)];
        assert!(traced(|f| trace_quad(f, nan, 0.5)).is_empty());
    }

    #[test]
    fn depth_is_capped() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 100.0),
            Point::new(100.0, 0.0),
        ];
        let inner = traced(|f| trace_quad(f, points, 0.0));
        assert_eq!(inner.len(), (1 << MAX_SUBDIVISIONS) - 1);
    }

    #[test]
    fn arc_sagitta_within_tolerance() {
        let arc = Arc {
            center: Point::new(5.0, -5.0),
            rx: 100.0,
            ry: 100.0,
            start: 0.0,
            delta: TAU,
        };
        let tolerance = 0.5;
        let mut events = Vec::new();
        let end = trace_arc(&mut events, &arc, tolerance);
        assert_eq!(end, arc.end_point());
        let mut points = vec![arc.start_point()];
        points.extend(traced(|f| {
            trace_arc(f, &arc, tolerance);
        }));
        points.push(end);
        assert!(points.len() > 10);
        for pair in points.windows(2) {
            let mid = pair[0].midpoint(pair[1]);
            let sagitta = 100.0 - mid.distance(arc.center);
            assert!(sagitta <= tolerance + 1e-9, "{sagitta}");
        }
        for p in &points {
            assert!((p.distance(arc.center) - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn negative_sweep() {
        let arc = Arc {
            center: Point::ZERO,
            rx: 20.0,
            ry: 10.0,
            start: 0.0,
            delta: -PI,
        };
        let inner = traced(|f| {
            trace_arc(f, &arc, 0.1);
        });
        assert!(!inner.is_empty());
        assert!(inner.iter().all(|p| p.y < 0.0));
        // points stay on the ellipse
        for p in &inner {
            let on = (p.x / 20.0).powi(2) + (p.y / 10.0).powi(2);
            assert!((on - 1.0).abs() < 1e-9);
        }
        let xs: Vec<_> = inner.iter().map(|p| p.x).collect();
        assert!(xs.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn zero_radius_arc() {
        let arc = Arc {
            center: Point::new(7.0, 8.0),
            rx: 0.0,
            ry: 0.0,
            start: 1.0,
            delta: 2.0,
        };
        let mut events = Vec::new();
        assert_eq!(trace_arc(&mut events, &arc, 0.5), Point::new(7.0, 8.0));
        assert!(events.is_empty());
    }

    #[test]
    fn arc_steps_are_capped() {
        let arc = Arc {
            center: Point::ZERO,
            rx: 1e6,
            ry: 1e6,
            start: 0.0,
            delta: TAU,
        };
        let inner = traced(|f| {
            trace_arc(f, &arc, 1e-12);
        });
        assert_eq!(inner.len(), MAX_ARC_STEPS - 1);
    }
}
