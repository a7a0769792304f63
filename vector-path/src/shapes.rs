//! Paths for common shapes.
//!
//! Shapes are positioned at the origin: rectangles extend into the positive
//! quadrant, round shapes and polygons are centered on it. Degenerate
//! arguments (a zero dimension, fewer than three sides) produce an empty
//! path.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::{builder::PathBuilder, path::Path};

/// A `width` by `height` rectangle.
pub fn rectangle(width: f64, height: f64) -> Path {
    if width == 0.0 || height == 0.0 {
        return Path::new();
    }
    let mut builder = PathBuilder::new();
    builder
        .move_to(0.0, 0.0)
        .line_to(width, 0.0)
        .line_to(width, height)
        .line_to(0.0, height)
        .close();
    builder.build()
}

/// A rectangle with circular corners of `radius`.
///
/// A negative radius cuts concave corners instead. The radius is limited to
/// half the smaller side.
pub fn rounded_rectangle(width: f64, height: f64, radius: f64) -> Path {
    if width == 0.0 || height == 0.0 {
        return Path::new();
    }
    if radius == 0.0 {
        return rectangle(width, height);
    }
    let r = radius.abs().min(width.abs() / 2.0).min(height.abs() / 2.0);
    let (w, h) = (width, height);
    let mut builder = PathBuilder::new();
    builder.move_to(0.0, r);
    if radius > 0.0 {
        builder
            .arc_to(r, r, r, r, PI, FRAC_PI_2)
            .line_to(w - r, 0.0)
            .arc_to(w - r, r, r, r, -FRAC_PI_2, FRAC_PI_2)
            .line_to(w, h - r)
            .arc_to(w - r, h - r, r, r, 0.0, FRAC_PI_2)
            .line_to(r, h)
            .arc_to(r, h - r, r, r, FRAC_PI_2, FRAC_PI_2);
    } else {
        builder
            .arc_to(0.0, 0.0, r, r, FRAC_PI_2, -FRAC_PI_2)
            .line_to(w - r, 0.0)
            .arc_to(w, 0.0, r, r, PI, -FRAC_PI_2)
            .line_to(w, h - r)
            .arc_to(w, h, r, r, -FRAC_PI_2, -FRAC_PI_2)
            .line_to(r, h)
            .arc_to(0.0, h, r, r, 0.0, -FRAC_PI_2);
    }
    builder.close();
    builder.build()
}

/// A rectangle with its corners cut off diagonally at `radius` from each
/// corner.
pub fn beveled_rectangle(width: f64, height: f64, radius: f64) -> Path {
    if width == 0.0 || height == 0.0 {
        return Path::new();
    }
    if radius == 0.0 {
        return rectangle(width, height);
    }
    let r = radius.abs().min(width.abs() / 2.0).min(height.abs() / 2.0);
    let (w, h) = (width, height);
    let mut builder = PathBuilder::new();
    builder
        .move_to(0.0, r)
        .line_to(r, 0.0)
        .line_to(w - r, 0.0)
        .line_to(w, r)
        .line_to(w, h - r)
        .line_to(w - r, h)
        .line_to(r, h)
        .line_to(0.0, h - r)
        .close();
    builder.build()
}

/// A circle of `radius` around the origin.
pub fn circle(radius: f64) -> Path {
    ellipse(radius, radius)
}

/// An ellipse with radii `rx` and `ry` around the origin, drawn as two half
/// arcs starting at `(rx, 0)`.
pub fn ellipse(rx: f64, ry: f64) -> Path {
    if rx == 0.0 || ry == 0.0 {
        return Path::new();
    }
    let (rx, ry) = (rx.abs(), ry.abs());
    let mut builder = PathBuilder::new();
    builder
        .move_to(rx, 0.0)
        .arc_to(0.0, 0.0, rx, ry, 0.0, PI)
        .arc_to(0.0, 0.0, rx, ry, PI, PI)
        .close();
    builder.build()
}

/// A regular polygon with `n` vertices at distance `radius` from the origin.
///
/// With `up` a vertex points up the y axis, otherwise an edge is
/// perpendicular to it.
pub fn regular_polygon(n: usize, radius: f64, up: bool) -> Path {
    if n < 3 || radius == 0.0 {
        return Path::new();
    }
    polygon((0..n).map(|i| {
        let angle = first_angle(n, up) + TAU * i as f64 / n as f64;
        (radius, angle)
    }))
}

/// A star with `n` points at distance `outer` from the origin, alternating
/// with `n` inner vertices at distance `inner`.
pub fn star_polygon(n: usize, outer: f64, inner: f64, up: bool) -> Path {
    if n < 3 || outer == 0.0 {
        return Path::new();
    }
    polygon((0..2 * n).map(|i| {
        let angle = first_angle(n, up) + PI * i as f64 / n as f64;
        let radius = if i % 2 == 0 { outer } else { inner };
        (radius, angle)
    }))
}

/// The star polygon `{n/d}`: every `d`-th of `n` points on a circle of
/// `radius` connected, with the overlapping edges removed.
pub fn regular_star_polygon(n: usize, d: usize, radius: f64, up: bool) -> Path {
    if n < 3 || d == 0 || n <= 2 * d || radius == 0.0 {
        return Path::new();
    }
    let (n_f, d_f) = (n as f64, d as f64);
    let inner = radius * (PI * d_f / n_f).cos() / (PI * (d_f - 1.0) / n_f).cos();
    star_polygon(n, radius, inner, up)
}

fn first_angle(n: usize, up: bool) -> f64 {
    if up {
        FRAC_PI_2
    } else {
        FRAC_PI_2 + PI / n as f64
    }
}

// vertices in polar coordinates
fn polygon(vertices: impl Iterator<Item = (f64, f64)>) -> Path {
    let mut builder = PathBuilder::new();
    for (radius, angle) in vertices {
        let (sin, cos) = angle.sin_cos();
        let (x, y) = (radius * cos, radius * sin);
        if builder.is_empty() {
            builder.move_to(x, y);
        } else {
            builder.line_to(x, y);
        }
    }
    builder.close();
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{PathEl, Point};

    const EPSILON: f64 = 0.01;

    fn assert_shape(actual: Path, expected: &str) {
        let expected = Path::from_svg(expected).unwrap();
        assert!(
            actual.approx_eq(&expected, EPSILON),
            "\n  actual: {actual}\nexpected: {expected}"
        );
    }

    #[test]
    fn rectangles() {
        assert!(rectangle(0.0, 10.0).is_empty());
        assert_shape(rectangle(5.0, 10.0), "H5V10H0z");
        assert!(rounded_rectangle(0.0, 10.0, 0.0).is_empty());
        assert_shape(rounded_rectangle(5.0, 10.0, 0.0), "H5V10H0z");
        assert_shape(
            rounded_rectangle(5.0, 10.0, 2.0),
            "M0 2A2 2 0 0 1 2 0L3 0A2 2 0 0 1 5 2L5 8A2 2 0 0 1 3 10L2 10A2 2 0 0 1 0 8z",
        );
        assert_shape(
            rounded_rectangle(5.0, 10.0, -2.0),
            "M0 2A2 2 0 0 0 2 0L3 0A2 2 0 0 0 5 2L5 8A2 2 0 0 0 3 10L2 10A2 2 0 0 0 0 8z",
        );
        assert!(beveled_rectangle(0.0, 10.0, 0.0).is_empty());
        assert_shape(beveled_rectangle(5.0, 10.0, 0.0), "H5V10H0z");
        assert_shape(
            beveled_rectangle(5.0, 10.0, 2.0),
            "M0 2 2 0 3 0 5 2 5 8 3 10 2 10 0 8z",
        );
    }

    #[test]
    fn circles() {
        assert!(circle(0.0).is_empty());
        assert_eq!(circle(2.0).to_svg(), "M2 0A2 2 0 0 1 -2 0A2 2 0 0 1 2 0z");
        assert_shape(circle(2.0), "M2 0A2 2 0 0 1 -2 0A2 2 0 0 1 2 0z");
        assert!(ellipse(3.0, 0.0).is_empty());
        assert_shape(ellipse(3.0, 1.0), "M3 0A3 1 0 0 1 -3 0A3 1 0 0 1 3 0z");
    }

    #[test]
    fn polygons() {
        assert!(regular_polygon(2, 2.0, true).is_empty());
        assert!(regular_polygon(4, 0.0, true).is_empty());
        assert_shape(regular_polygon(4, 2.0, true), "M0 2 -2 0 0 -2 2 0z");
        assert_shape(regular_polygon(3, 2.0, false), "M-1.7321 1L0 -2L1.7321 1z");
    }

    #[test]
    fn stars() {
        assert!(star_polygon(2, 4.0, 2.0, true).is_empty());
        assert_shape(
            star_polygon(4, 4.0, 2.0, true),
            "M0 4 -1.41 1.41 -4 0 -1.41 -1.41 0 -4 1.41 -1.41 4 0 1.41 1.41z",
        );
        assert_shape(
            star_polygon(3, 4.0, 2.0, false),
            "M-3.4641 2L-1.7321 -1L0 -4L1.7321 -1L3.4641 2L0 2z",
        );
    }

    #[test]
    fn regular_stars() {
        assert!(regular_star_polygon(5, 0, 1.0, true).is_empty());
        assert!(regular_star_polygon(4, 2, 1.0, true).is_empty());
        let pentagram = regular_star_polygon(5, 2, 1.0, true);
        assert_eq!(pentagram.len(), 11);
        let inner: Vec<_> = pentagram
            .segments()
            .filter_map(|el| match el {
                PathEl::LineTo(p) => Some(p),
                _ => None,
            })
            .step_by(2)
            .collect();
        // (cos 72 / cos 36)
        for p in inner {
            assert!((p.distance(Point::ZERO) - 0.381966).abs() < 1e-6);
        }
        // {n/1} is the regular polygon with its edge midpoints as vertices
        assert_shape(
            regular_star_polygon(4, 1, 2.0, true),
            "M0 2 -1 1 -2 0 -1 -1 0 -2 1 -1 2 0 1 1z",
        );
    }
}
