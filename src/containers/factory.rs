use anyhow::Result;

use crate::layout::DimensionMap;

use super::{OrdinateStore, PackedCoordinateSequence, VectorStore};

/// How a [`PackedSequenceFactory`] lays out the ordinates of the sequences it creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedLayout {
    /// One store interleaving all ordinates per point: `x0 y0 z0 x1 y1 z1 ...`
    Interleaved,
    /// One store per ordinate: `x0 x1 ...`, `y0 y1 ...`, `z0 z1 ...`
    Separated,
}

/// Creates packed coordinate sequences with freshly allocated, zero-filled storage in one of the
/// two canonical layouts, plus no-copy wrappers around buffers a producer already filled.
///
/// # Example
///
/// ```
/// use coordseq::containers::{CoordinateSequence, PackedLayout, PackedSequenceFactory};
///
/// let factory = PackedSequenceFactory::new(PackedLayout::Separated);
/// let mut sequence = factory.create(4, 3, 0).unwrap();
/// sequence.set_ordinate(2, 1, 42.0);
/// assert_eq!(42.0, sequence.ordinate(2, 1));
/// assert_eq!(0.0, sequence.ordinate(3, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedSequenceFactory {
    layout: PackedLayout,
}

impl PackedSequenceFactory {
    /// Creates a factory producing sequences in the given layout
    pub fn new(layout: PackedLayout) -> Self {
        Self { layout }
    }

    /// The layout this factory allocates
    pub fn layout(&self) -> PackedLayout {
        self.layout
    }

    /// Creates a zero-filled sequence of `count` points with `dimension` ordinates each, the
    /// trailing `measures` of which are measure values
    ///
    /// # Errors
    ///
    /// Fails if `dimension < 2` or if fewer than two ordinates would be spatial
    pub fn create(
        &self,
        count: usize,
        dimension: usize,
        measures: usize,
    ) -> Result<PackedCoordinateSequence<'static>> {
        let (stores, map): (Vec<Box<dyn OrdinateStore>>, _) = match self.layout {
            PackedLayout::Interleaved => (
                vec![Box::new(VectorStore::zeroed(count * dimension))],
                DimensionMap::interleaved(dimension),
            ),
            PackedLayout::Separated => (
                (0..dimension)
                    .map(|_| Box::new(VectorStore::zeroed(count)) as Box<dyn OrdinateStore>)
                    .collect(),
                DimensionMap::separated(dimension),
            ),
        };
        PackedCoordinateSequence::new(stores, map, measures)
    }

    /// Wraps a producer-filled interleaved buffer without copying. `values` holds all
    /// `dimension` ordinates of point 0, then all of point 1, and so on
    ///
    /// # Errors
    ///
    /// Fails if `values.len()` is not a multiple of `dimension`, or for the same dimension and
    /// measure bounds as [`create`](PackedSequenceFactory::create)
    pub fn from_interleaved(
        values: Vec<f64>,
        dimension: usize,
        measures: usize,
    ) -> Result<PackedCoordinateSequence<'static>> {
        PackedCoordinateSequence::new(
            vec![Box::new(VectorStore::from(values))],
            DimensionMap::interleaved(dimension),
            measures,
        )
    }

    /// Wraps producer-filled per-ordinate buffers without copying. `columns[k]` holds ordinate
    /// `k` for every point, and the dimension is the number of columns
    ///
    /// # Errors
    ///
    /// Fails if the columns differ in length, or for the same dimension and measure bounds as
    /// [`create`](PackedSequenceFactory::create)
    pub fn from_separated(
        columns: Vec<Vec<f64>>,
        measures: usize,
    ) -> Result<PackedCoordinateSequence<'static>> {
        let dimension = columns.len();
        let stores = columns
            .into_iter()
            .map(|column| Box::new(VectorStore::from(column)) as Box<dyn OrdinateStore>)
            .collect();
        PackedCoordinateSequence::new(stores, DimensionMap::separated(dimension), measures)
    }
}

impl Default for PackedSequenceFactory {
    fn default() -> Self {
        Self::new(PackedLayout::Interleaved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::CoordinateSequence;

    #[test]
    fn both_layouts_produce_the_same_logical_sequence() {
        let interleaved = PackedSequenceFactory::new(PackedLayout::Interleaved)
            .create(5, 3, 1)
            .unwrap();
        let separated = PackedSequenceFactory::new(PackedLayout::Separated)
            .create(5, 3, 1)
            .unwrap();
        assert_eq!(interleaved.len(), separated.len());
        assert_eq!(interleaved.dimension(), separated.dimension());
        assert_eq!(interleaved.measures(), separated.measures());
        for index in 0..interleaved.len() {
            for ordinate in 0..interleaved.dimension() {
                assert_eq!(0.0, interleaved.ordinate(index, ordinate));
                assert_eq!(0.0, separated.ordinate(index, ordinate));
            }
        }
        assert_eq!(1, interleaved.store_count());
        assert_eq!(3, separated.store_count());
    }

    #[test]
    fn from_interleaved_wraps_producer_data() {
        let sequence =
            PackedSequenceFactory::from_interleaved(vec![1.0, 10.0, 2.0, 20.0], 2, 0).unwrap();
        assert_eq!(2, sequence.len());
        assert_eq!(20.0, sequence.ordinate(1, 1));
    }

    #[test]
    fn from_separated_wraps_producer_data() {
        let sequence = PackedSequenceFactory::from_separated(
            vec![vec![1.0, 2.0], vec![10.0, 20.0], vec![7.0, 8.0]],
            1,
        )
        .unwrap();
        assert_eq!(2, sequence.len());
        assert_eq!(3, sequence.dimension());
        assert_eq!(8.0, sequence.ordinate(1, 2));
        assert!(sequence.has_m());
    }

    #[test]
    fn from_separated_rejects_ragged_columns() {
        let err = PackedSequenceFactory::from_separated(vec![vec![1.0, 2.0], vec![10.0]], 0)
            .unwrap_err();
        assert!(err.to_string().contains("inconsistent point count"));
    }

    #[test]
    fn from_interleaved_rejects_partial_points() {
        let err = PackedSequenceFactory::from_interleaved(vec![1.0, 2.0, 3.0], 2, 0).unwrap_err();
        assert!(err.to_string().contains("inconsistent buffer length"));
    }
}
