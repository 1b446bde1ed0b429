use crate::geometry::{Coordinate, Envelope};

/// Capability contract for coordinate sequences.
///
/// A coordinate sequence is a logical table of `len` points with `dimension` ordinate values
/// each; external algorithms consume any sequence through this trait, no matter which physical
/// storage layout the implementation chose. The trailing `measures` ordinates of each point are
/// attribute values rather than spatial coordinates.
///
/// The bulk operations [`expand_envelope`](CoordinateSequence::expand_envelope) and
/// [`to_coordinates`](CoordinateSequence::to_coordinates) have default implementations built on
/// per-ordinate access. Implementations with raw access to their storage are expected to
/// override them with strided walks; the defaults exist so that a minimal implementation is
/// already complete.
pub trait CoordinateSequence {
    /// The number of points in this sequence
    fn len(&self) -> usize;

    /// Returns true if this sequence holds no points
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of ordinates per point. At least 2, since every point carries at least x and y
    fn dimension(&self) -> usize;

    /// The number of trailing ordinates per point that carry measure values
    fn measures(&self) -> usize;

    /// The number of leading ordinates per point that carry spatial coordinates
    fn spatial_dimension(&self) -> usize {
        self.dimension() - self.measures()
    }

    /// Returns true if the points of this sequence carry a third spatial ordinate
    fn has_z(&self) -> bool {
        self.spatial_dimension() > 2
    }

    /// Returns true if the points of this sequence carry measure values
    fn has_m(&self) -> bool {
        self.measures() > 0
    }

    /// The value of ordinate `ordinate` of the point at `index`
    ///
    /// # Panics
    ///
    /// Panics if `ordinate >= self.dimension()`. May panic if `index` is out of bounds.
    fn ordinate(&self, index: usize, ordinate: usize) -> f64;

    /// Overwrites ordinate `ordinate` of the point at `index`. No other slot of the sequence is
    /// affected
    ///
    /// # Panics
    ///
    /// Panics if `ordinate >= self.dimension()`. May panic if `index` is out of bounds.
    fn set_ordinate(&mut self, index: usize, ordinate: usize, value: f64);

    /// The x value of the point at `index`
    fn x(&self, index: usize) -> f64 {
        self.ordinate(index, 0)
    }

    /// The y value of the point at `index`
    fn y(&self, index: usize) -> f64 {
        self.ordinate(index, 1)
    }

    /// Creates the coordinate object that materialization fills for each point. The default is
    /// the all-NaN coordinate, so ordinates the sequence does not store stay NaN
    fn create_coordinate(&self) -> Coordinate {
        Coordinate::NAN
    }

    /// Creates a deep copy of this sequence. The copy owns fresh storage, so mutating either
    /// sequence never affects the other
    fn copy(&self) -> Box<dyn CoordinateSequence>;

    /// Creates a deep copy of this sequence with the point order reversed
    fn reversed(&self) -> Box<dyn CoordinateSequence>;

    /// Grows `envelope` to include the x/y values of every point in this sequence. Ordinates
    /// beyond y are ignored, no matter how many the sequence stores
    fn expand_envelope(&self, envelope: &mut Envelope) {
        for index in 0..self.len() {
            envelope.expand_to_include(self.x(index), self.y(index));
        }
    }

    /// Materializes one [`Coordinate`] per point. A coordinate holds at most x, y, z and one
    /// measure; sequences with more ordinates than that have the excess ordinates skipped
    fn to_coordinates(&self) -> Vec<Coordinate> {
        let spatial = self.spatial_dimension();
        let mut coordinates = Vec::with_capacity(self.len());
        for index in 0..self.len() {
            let mut coordinate = self.create_coordinate();
            for ordinate in 0..self.dimension() {
                assign_ordinate(
                    &mut coordinate,
                    ordinate,
                    spatial,
                    self.ordinate(index, ordinate),
                );
            }
            coordinates.push(coordinate);
        }
        coordinates
    }
}

/// Writes `value` into the field of `coordinate` that logical ordinate `ordinate` corresponds
/// to, for a sequence with `spatial` leading spatial ordinates. Ordinates a [`Coordinate`]
/// cannot represent (spatial ordinates past z, measures past the first) are dropped.
pub(crate) fn assign_ordinate(
    coordinate: &mut Coordinate,
    ordinate: usize,
    spatial: usize,
    value: f64,
) {
    match ordinate {
        0 => coordinate.x = value,
        1 => coordinate.y = value,
        2 if spatial > 2 => coordinate.z = value,
        _ if ordinate == spatial => coordinate.m = value,
        _ => {}
    }
}
