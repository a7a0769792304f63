/// Minimum and maximum extents of a rectangular region.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    pub x_min: T,
    /// The bottom edge in the y-up space used by fonts.
    pub y_min: T,
    pub x_max: T,
    /// The top edge in the y-up space used by fonts.
    pub y_max: T,
}

impl<T: Copy + PartialOrd> BoundingBox<T> {
    /// A box covering the single point `(x, y)`.
    pub fn from_point(x: T, y: T) -> Self {
        BoundingBox {
            x_min: x,
            y_min: y,
            x_max: x,
            y_max: y,
        }
    }

    /// Grow the box so that it covers `(x, y)`.
    pub fn add_point(&mut self, x: T, y: T) {
        if x < self.x_min {
            self.x_min = x;
        }
        if x > self.x_max {
            self.x_max = x;
        }
        if y < self.y_min {
            self.y_min = y;
        }
        if y > self.y_max {
            self.y_max = y;
        }
    }

    /// The smallest box covering both `self` and `other`.
    pub fn union(mut self, other: Self) -> Self {
        self.add_point(other.x_min, other.y_min);
        self.add_point(other.x_max, other.y_max);
        self
    }
}

impl BoundingBox<i16> {
    /// Widen to floating point.
    pub fn to_f64(self) -> BoundingBox<f64> {
        BoundingBox {
            x_min: self.x_min.into(),
            y_min: self.y_min.into(),
            x_max: self.x_max.into(),
            y_max: self.y_max.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow() {
        let mut bbox = BoundingBox::from_point(1.0, 1.0);
        bbox.add_point(-2.0, 3.0);
        bbox.add_point(0.0, -1.0);
        assert_eq!(
            bbox,
            BoundingBox {
                x_min: -2.0,
                y_min: -1.0,
                x_max: 1.0,
                y_max: 3.0
            }
        );
        let other = BoundingBox::from_point(5.0, 0.0);
        assert_eq!(bbox.union(other).x_max, 5.0);
    }
}
