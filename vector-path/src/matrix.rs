//! 2D affine transformations.

use crate::path::Point;

/// A 2D affine transformation.
///
/// The coefficients `[a, b, c, d, e, f]` map a point by
/// `x' = a * x + c * y + e` and `y' = b * x + d * y + f`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix([f64; 6]);

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub const fn new(coeffs: [f64; 6]) -> Self {
        Matrix(coeffs)
    }

    pub const fn coeffs(&self) -> [f64; 6] {
        self.0
    }

    pub const fn translation(dx: f64, dy: f64) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, dx, dy])
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Matrix([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    /// A rotation by `angle` radians.
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Matrix([cos, sin, -sin, cos, 0.0, 0.0])
    }

    /// The transformation that applies `self` and then `other`.
    pub fn then(self, other: Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a2 * a + c2 * b,
            b2 * a + d2 * b,
            a2 * c + c2 * d,
            b2 * c + d2 * d,
            a2 * e + c2 * f + e2,
            b2 * e + d2 * f + f2,
        ])
    }

    pub fn then_translate(self, dx: f64, dy: f64) -> Matrix {
        self.then(Matrix::translation(dx, dy))
    }

    pub fn then_scale(self, sx: f64, sy: f64) -> Matrix {
        self.then(Matrix::scale(sx, sy))
    }

    pub fn then_rotate(self, angle: f64) -> Matrix {
        self.then(Matrix::rotation(angle))
    }

    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    pub fn transform_point(&self, p: Point) -> Point {
        let (x, y) = self.transform(p.x, p.y);
        Point::new(x, y)
    }

    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, ..] = self.0;
        a * d - b * c
    }

    /// The inverse transformation, or `None` if this one is singular.
    pub fn inverse(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let [a, b, c, d, e, f] = self.0;
        let inv = 1.0 / det;
        Some(Matrix([
            d * inv,
            -b * inv,
            -c * inv,
            a * inv,
            (c * f - d * e) * inv,
            (b * e - a * f) * inv,
        ]))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}
