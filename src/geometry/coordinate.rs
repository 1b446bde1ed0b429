use std::fmt;

use nalgebra::Point2;
use static_assertions::const_assert;

/// A single point with two spatial ordinates, an optional third spatial ordinate and an optional
/// measure value. Absent ordinates are stored as NaN, so a freshly created 2D coordinate reports
/// NaN for both `z` and `m`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub m: f64,
}

// The bulk materialization paths assume a coordinate is four plain f64 values
const_assert!(std::mem::size_of::<Coordinate>() == 4 * std::mem::size_of::<f64>());

impl Coordinate {
    /// The coordinate with all four ordinates set to NaN. This is what sequence materialization
    /// starts from before filling in the ordinates the sequence actually stores
    pub const NAN: Coordinate = Coordinate {
        x: f64::NAN,
        y: f64::NAN,
        z: f64::NAN,
        m: f64::NAN,
    };

    /// Creates a 2D coordinate. `z` and `m` are NaN
    /// ```
    /// # use coordseq::geometry::Coordinate;
    /// let coordinate = Coordinate::new(1.0, 2.0);
    /// assert_eq!(1.0, coordinate.x);
    /// assert!(coordinate.z.is_nan());
    /// ```
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: f64::NAN,
            m: f64::NAN,
        }
    }

    /// Creates a 3D coordinate. `m` is NaN
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            m: f64::NAN,
        }
    }

    /// Creates a 2D coordinate with a measure value. `z` is NaN
    pub fn with_m(x: f64, y: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: f64::NAN,
            m,
        }
    }

    /// Creates a coordinate with all four ordinates
    pub fn with_z_and_m(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self { x, y, z, m }
    }

    /// Returns true if this coordinate carries a third spatial ordinate
    pub fn has_z(&self) -> bool {
        !self.z.is_nan()
    }

    /// Returns true if this coordinate carries a measure value
    pub fn has_m(&self) -> bool {
        !self.m.is_nan()
    }

    /// The spatial x/y part of this coordinate
    /// ```
    /// # use coordseq::geometry::Coordinate;
    /// let coordinate = Coordinate::with_z(1.0, 2.0, 3.0);
    /// assert_eq!(nalgebra::Point2::new(1.0, 2.0), coordinate.xy());
    /// ```
    pub fn xy(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}", self.x, self.y)?;
        if self.has_z() {
            write!(f, ", {}", self.z)?;
        }
        if self.has_m() {
            write!(f, ", m={}", self.m)?;
        }
        write!(f, ")")
    }
}

impl From<Point2<f64>> for Coordinate {
    fn from(point: Point2<f64>) -> Self {
        Self::new(point.x, point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_ordinates_are_nan() {
        let coordinate = Coordinate::new(1.0, 2.0);
        assert!(!coordinate.has_z());
        assert!(!coordinate.has_m());

        let coordinate = Coordinate::with_m(1.0, 2.0, 42.0);
        assert!(!coordinate.has_z());
        assert!(coordinate.has_m());
    }

    #[test]
    fn display_skips_absent_ordinates() {
        assert_eq!("(1, 2)", Coordinate::new(1.0, 2.0).to_string());
        assert_eq!("(1, 2, 3)", Coordinate::with_z(1.0, 2.0, 3.0).to_string());
        assert_eq!(
            "(1, 2, 3, m=4)",
            Coordinate::with_z_and_m(1.0, 2.0, 3.0, 4.0).to_string()
        );
    }
}
