//! Paths made of straight segments only.

use crate::{
    builder::PathBuilder,
    flatten::{flatten, Flattener},
    path::{Path, Point},
};

/// How the inside of a self intersecting shape is determined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
    /// Inside where the winding number is not zero.
    #[default]
    NonZero,
    /// Inside where the winding number is odd.
    EvenOdd,
}

/// An open or closed sequence of points joined by lines.
///
/// The polyline is closed when its first and last points coincide.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    coords: Vec<Point>,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The polyline through the flattened points of `path`.
    ///
    /// All subpaths are concatenated.
    pub fn from_path(path: &Path, scale: f64) -> Self {
        let mut polyline = Polyline::new();
        flatten(path, &mut polyline, scale);
        polyline
    }

    /// Append a point.
    pub fn add(&mut self, x: f64, y: f64) -> &mut Self {
        self.coords.push(Point::new(x, y));
        self
    }

    pub fn coords(&self) -> &[Point] {
        &self.coords
    }

    pub fn is_closed(&self) -> bool {
        self.coords.len() >= 3 && self.coords.first() == self.coords.last()
    }

    /// Convert to a path, ending with a close if the polyline is closed.
    ///
    /// Fewer than two points produce an empty path.
    pub fn to_path(&self) -> Path {
        let [first, rest @ ..] = self.coords.as_slice() else {
            return Path::new();
        };
        if rest.is_empty() {
            return Path::new();
        }
        let closed = self.is_closed();
        let rest = if closed {
            &rest[..rest.len() - 1]
        } else {
            rest
        };
        let mut builder = PathBuilder::new();
        builder.move_to(first.x, first.y);
        for p in rest {
            builder.line_to(p.x, p.y);
        }
        if closed {
            builder.close();
        }
        builder.build()
    }

    /// Returns `true` if `(x, y)` is inside the polygon formed by the points,
    /// closing it if needed.
    pub fn interior(&self, x: f64, y: f64, fill_rule: FillRule) -> bool {
        let winding = self.winding(Point::new(x, y));
        match fill_rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }

    fn winding(&self, p: Point) -> i32 {
        let Some(&last) = self.coords.last() else {
            return 0;
        };
        let mut winding = 0;
        let mut from = last;
        for &to in &self.coords {
            let side = (to.x - from.x) * (p.y - from.y) - (p.x - from.x) * (to.y - from.y);
            if from.y <= p.y {
                if to.y > p.y && side > 0.0 {
                    winding += 1;
                }
            } else if to.y <= p.y && side < 0.0 {
                winding -= 1;
            }
            from = to;
        }
        winding
    }
}

impl Flattener for Polyline {
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

impl FromIterator<Point> for Polyline {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        Polyline {
            coords: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn triangle() -> Polyline {
        let mut polyline = Polyline::new();
        polyline.add(10.0, 0.0).add(20.0, 10.0).add(10.0, 10.0).add(10.0, 0.0);
        polyline
    }

    #[test]
    fn coords() {
        let mut polyline = Polyline::new();
        polyline.add(10.0, 0.0).add(20.0, 10.0);
        assert_eq!(
            polyline.coords(),
            &[Point::new(10.0, 0.0), Point::new(20.0, 10.0)]
        );
    }

    #[test]
    fn to_path() {
        assert!(Polyline::new().to_path().is_empty());
        assert!(Polyline::new().add(10.0, 0.0).to_path().is_empty());
        assert_eq!(
            Polyline::new().add(10.0, 0.0).add(20.0, 10.0).to_path().to_svg(),
            "M10 0L20 10"
        );
        assert_eq!(
            Polyline::new()
                .add(10.0, 0.0)
                .add(20.0, 10.0)
                .add(10.0, 0.0)
                .to_path()
                .to_svg(),
            "M10 0L20 10z"
        );
    }

    #[rstest]
    #[case::non_zero(FillRule::NonZero)]
    #[case::even_odd(FillRule::EvenOdd)]
    fn interior(#[case] fill_rule: FillRule) {
        let triangle = triangle();
        assert!(triangle.interior(12.0, 5.0, fill_rule));
        assert!(!triangle.interior(5.0, 5.0, fill_rule));
        assert!(!Polyline::new().interior(0.0, 0.0, fill_rule));
    }

    #[test]
    fn fill_rules_differ_on_overlap() {
        // a square traced twice winds twice around its inside
        let mut polyline = Polyline::new();
        for _ in 0..2 {
            polyline.add(0.0, 0.0).add(10.0, 0.0).add(10.0, 10.0).add(0.0, 10.0);
        }
        assert!(polyline.interior(5.0, 5.0, FillRule::NonZero));
        assert!(!polyline.interior(5.0, 5.0, FillRule::EvenOdd));
    }

    #[test]
    fn from_path() {
        let path = crate::shapes::rectangle(4.0, 2.0);
        let polyline = Polyline::from_path(&path, 1.0);
        assert!(polyline.is_closed());
        assert_eq!(polyline.coords().len(), 5);
        assert_eq!(polyline.to_path(), path);

        let circle = Polyline::from_path(&crate::shapes::circle(10.0), 1.0);
        assert!(circle.is_closed());
        assert!(circle.interior(0.0, 0.0, FillRule::NonZero));
        assert!(!circle.interior(9.0, 9.0, FillRule::NonZero));
    }
}
