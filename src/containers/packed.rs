use anyhow::{bail, Result};
use itertools::izip;

use crate::geometry::{Coordinate, Envelope};
use crate::layout::{DimensionMap, SequenceShape};

use super::{
    assign_ordinate, CoordinateSequence, OrdinateStore, RawOrdinateView, RawOrdinateViewMut,
    VectorStore,
};

/// A coordinate sequence whose ordinate values live in an arbitrary number of flat `f64` stores,
/// in any interleaving the producer chose.
///
/// The [`DimensionMap`] describes where each logical ordinate is stored: its entry for ordinate
/// `k` names a store and one of that store's interleaved per-point slots. Construction validates
/// that the map is a bijection onto the slots implied by the store lengths and derives the point
/// count and per-store strides once; after that, every access resolves through the map in
/// constant time. Only ordinate *values* can change over the sequence's life, never its shape.
///
/// Stores may borrow externally owned memory (see
/// [`SliceStore`](crate::containers::SliceStore)), in which case the sequence aliases that
/// memory instead of copying it. [`copy`](CoordinateSequence::copy) is the one operation that
/// produces storage independence.
///
/// # Example
///
/// ```
/// use coordseq::containers::{CoordinateSequence, PackedCoordinateSequence, VectorStore};
/// use coordseq::layout::{DimensionMap, SlotRef};
///
/// // x/y interleaved in one store, z in another
/// let xy = VectorStore::from(vec![1.0, 10.0, 2.0, 20.0]);
/// let z = VectorStore::from(vec![100.0, 200.0]);
/// let map = DimensionMap::new(vec![
///     SlotRef::new(0, 0),
///     SlotRef::new(0, 1),
///     SlotRef::new(1, 0),
/// ]);
/// let sequence =
///     PackedCoordinateSequence::new(vec![Box::new(xy), Box::new(z)], map, 0).unwrap();
/// assert_eq!(2, sequence.len());
/// assert_eq!(200.0, sequence.ordinate(1, 2));
/// ```
pub struct PackedCoordinateSequence<'a> {
    stores: Vec<Box<dyn OrdinateStore + 'a>>,
    map: DimensionMap,
    shape: SequenceShape,
    measures: usize,
}

impl std::fmt::Debug for PackedCoordinateSequence<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackedCoordinateSequence")
            .field("map", &self.map)
            .field("shape", &self.shape)
            .field("measures", &self.measures)
            .finish_non_exhaustive()
    }
}

impl<'a> PackedCoordinateSequence<'a> {
    /// Creates a packed sequence over the given stores. Entry `k` of `map` names the store and
    /// intra-store slot holding ordinate `k`; `measures` is the number of trailing ordinates
    /// that carry measure values.
    ///
    /// # Errors
    ///
    /// Fails if the map names fewer than two ordinates, if fewer than two of them are spatial,
    /// or if the stores and the map do not describe a consistent layout (see
    /// [`SequenceShape::derive`] for the individual conditions).
    pub fn new(
        stores: Vec<Box<dyn OrdinateStore + 'a>>,
        map: DimensionMap,
        measures: usize,
    ) -> Result<Self> {
        let dimension = map.len();
        if dimension < 2 {
            bail!(
                "a coordinate sequence requires at least two ordinates per point, but the dimension map names {}",
                dimension
            );
        }
        if measures > dimension - 2 {
            bail!(
                "{} of {} ordinates are measures, which leaves fewer than two spatial ordinates",
                measures,
                dimension
            );
        }
        let store_lens: Vec<usize> = stores.iter().map(|store| store.len()).collect();
        let shape = SequenceShape::derive(&store_lens, &map)?;
        Ok(Self {
            stores,
            map,
            shape,
            measures,
        })
    }

    /// The dimension map of this sequence
    pub fn map(&self) -> &DimensionMap {
        &self.map
    }

    /// The number of backing stores of this sequence
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Resolves a logical ordinate index to its storage slot: store index, element offset of
    /// point 0, and the per-point stride within that store
    fn resolve(&self, ordinate: usize) -> (usize, usize, usize) {
        assert!(
            ordinate < self.map.len(),
            "ordinate index {} is out of range for a sequence with dimension {}",
            ordinate,
            self.map.len()
        );
        let entry = self.map.entry(ordinate);
        let stride = self.shape.dims_of_buffer(entry.buffer());
        (entry.buffer(), entry.slot(), stride)
    }

    /// Direct strided access to the backing storage of one ordinate. This is the extension
    /// point for consumers that want to walk an ordinate without per-element dispatch; the bulk
    /// operations of this sequence are built on it as well
    ///
    /// # Panics
    ///
    /// Panics if `ordinate >= self.dimension()`
    pub fn raw_ordinate(&self, ordinate: usize) -> RawOrdinateView<'_> {
        let (store, offset, stride) = self.resolve(ordinate);
        RawOrdinateView::new(self.stores[store].as_ref(), offset, stride)
    }

    /// Like [`raw_ordinate`](PackedCoordinateSequence::raw_ordinate), but mutable
    ///
    /// # Panics
    ///
    /// Panics if `ordinate >= self.dimension()`
    pub fn raw_ordinate_mut(&mut self, ordinate: usize) -> RawOrdinateViewMut<'_> {
        let (store, offset, stride) = self.resolve(ordinate);
        RawOrdinateViewMut::new(self.stores[store].as_mut(), offset, stride)
    }

    /// Deep copy with freshly owned storage and the same map, shape and measures
    pub fn copy_packed(&self) -> PackedCoordinateSequence<'static> {
        let stores = self
            .stores
            .iter()
            .map(|store| Box::new(VectorStore::from(store.to_vec())) as Box<dyn OrdinateStore>)
            .collect();
        PackedCoordinateSequence {
            stores,
            map: self.map.clone(),
            shape: self.shape.clone(),
            measures: self.measures,
        }
    }

    /// Deep copy with the point order reversed.
    ///
    /// Reversal is two composable steps on the copy: every store's flat contents are reversed
    /// in place, which reverses the point order but also the slot order within each per-point
    /// group, and the map's intra-store slot indices are then mirrored to undo the latter.
    pub fn reversed_packed(&self) -> PackedCoordinateSequence<'static> {
        let mut reversed = self.copy_packed();
        for store in &mut reversed.stores {
            store.reverse();
        }
        reversed.map.mirror_slots(reversed.shape.dims_per_buffer());
        reversed
    }

    /// Fast-path materialization: every store is contiguous, so each ordinate is walked as a
    /// raw slice plus cursor, advancing by its stride per point
    fn to_coordinates_contiguous(&self, views: &[RawOrdinateView], slices: &[&[f64]]) -> Vec<Coordinate> {
        let spatial = self.spatial_dimension();
        let mut cursors = vec![0usize; views.len()];
        let mut coordinates = Vec::with_capacity(self.len());
        for _ in 0..self.len() {
            let mut coordinate = self.create_coordinate();
            coordinate.x = slices[0][cursors[0]];
            coordinate.y = slices[1][cursors[1]];
            for ordinate in 2..views.len() {
                assign_ordinate(
                    &mut coordinate,
                    ordinate,
                    spatial,
                    slices[ordinate][cursors[ordinate]],
                );
            }
            for (cursor, view) in cursors.iter_mut().zip(views) {
                *cursor += view.stride();
            }
            coordinates.push(coordinate);
        }
        coordinates
    }

    /// General materialization for stores without a contiguous view, going through the strided
    /// views element by element
    fn to_coordinates_general(&self, views: &[RawOrdinateView]) -> Vec<Coordinate> {
        let spatial = self.spatial_dimension();
        let mut coordinates = Vec::with_capacity(self.len());
        for index in 0..self.len() {
            let mut coordinate = self.create_coordinate();
            coordinate.x = views[0].get(index);
            coordinate.y = views[1].get(index);
            for (ordinate, view) in views.iter().enumerate().skip(2) {
                assign_ordinate(&mut coordinate, ordinate, spatial, view.get(index));
            }
            coordinates.push(coordinate);
        }
        coordinates
    }
}

impl<'a> CoordinateSequence for PackedCoordinateSequence<'a> {
    fn len(&self) -> usize {
        self.shape.len()
    }

    fn dimension(&self) -> usize {
        self.map.len()
    }

    fn measures(&self) -> usize {
        self.measures
    }

    fn ordinate(&self, index: usize, ordinate: usize) -> f64 {
        let (store, offset, stride) = self.resolve(ordinate);
        self.stores[store].get(offset + index * stride)
    }

    fn set_ordinate(&mut self, index: usize, ordinate: usize, value: f64) {
        let (store, offset, stride) = self.resolve(ordinate);
        self.stores[store].set(offset + index * stride, value);
    }

    fn copy(&self) -> Box<dyn CoordinateSequence> {
        Box::new(self.copy_packed())
    }

    fn reversed(&self) -> Box<dyn CoordinateSequence> {
        Box::new(self.reversed_packed())
    }

    fn expand_envelope(&self, envelope: &mut Envelope) {
        let xs = self.raw_ordinate(0);
        let ys = self.raw_ordinate(1);
        match (xs.as_contiguous(), ys.as_contiguous()) {
            (Some(raw_xs), Some(raw_ys)) => {
                let x_values = raw_xs.iter().step_by(xs.stride());
                let y_values = raw_ys.iter().step_by(ys.stride());
                for (&x, &y) in izip!(x_values, y_values).take(self.len()) {
                    envelope.expand_to_include(x, y);
                }
            }
            _ => {
                for index in 0..self.len() {
                    envelope.expand_to_include(xs.get(index), ys.get(index));
                }
            }
        }
    }

    fn to_coordinates(&self) -> Vec<Coordinate> {
        let views: Vec<RawOrdinateView> = (0..self.dimension())
            .map(|ordinate| self.raw_ordinate(ordinate))
            .collect();
        // Only take the raw-slice path if every ordinate's store is directly addressable
        let slices: Option<Vec<&[f64]>> = views.iter().map(|view| view.as_contiguous()).collect();
        match slices {
            Some(slices) => self.to_coordinates_contiguous(&views, &slices),
            None => self.to_coordinates_general(&views),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{SegmentedStore, SliceStore};
    use crate::layout::SlotRef;

    use rand::{thread_rng, Rng};

    /// x/y/z/m spread over three stores: m alone, x/y interleaved, z alone. The map lists the
    /// ordinates in logical order x, y, z, m.
    fn mixed_sequence() -> PackedCoordinateSequence<'static> {
        let m = VectorStore::from(vec![-1.0, -2.0, -3.0]);
        let xy = VectorStore::from(vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0]);
        let z = VectorStore::from(vec![100.0, 200.0, 300.0]);
        let map = DimensionMap::new(vec![
            SlotRef::new(1, 0),
            SlotRef::new(1, 1),
            SlotRef::new(2, 0),
            SlotRef::new(0, 0),
        ]);
        PackedCoordinateSequence::new(vec![Box::new(m), Box::new(xy), Box::new(z)], map, 1)
            .unwrap()
    }

    /// The same logical content as [`mixed_sequence`], but with every store segmented so that no
    /// contiguous fast path is available
    fn mixed_sequence_segmented() -> PackedCoordinateSequence<'static> {
        let m = SegmentedStore::from_vec(vec![-1.0, -2.0, -3.0], 2);
        let xy = SegmentedStore::from_vec(vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0], 4);
        let z = SegmentedStore::from_vec(vec![100.0, 200.0, 300.0], 1);
        let map = DimensionMap::new(vec![
            SlotRef::new(1, 0),
            SlotRef::new(1, 1),
            SlotRef::new(2, 0),
            SlotRef::new(0, 0),
        ]);
        PackedCoordinateSequence::new(vec![Box::new(m), Box::new(xy), Box::new(z)], map, 1)
            .unwrap()
    }

    #[test]
    fn shape_is_derived_from_stores_and_map() {
        let sequence = mixed_sequence();
        assert_eq!(3, sequence.len());
        assert_eq!(4, sequence.dimension());
        assert_eq!(1, sequence.measures());
        assert_eq!(3, sequence.spatial_dimension());
        assert!(sequence.has_z());
        assert!(sequence.has_m());
    }

    #[test]
    fn ordinates_resolve_through_the_map() {
        let sequence = mixed_sequence();
        assert_eq!(2.0, sequence.ordinate(1, 0));
        assert_eq!(20.0, sequence.ordinate(1, 1));
        assert_eq!(200.0, sequence.ordinate(1, 2));
        assert_eq!(-2.0, sequence.ordinate(1, 3));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn ordinate_index_beyond_dimension_panics() {
        let sequence = mixed_sequence();
        sequence.ordinate(0, 4);
    }

    #[test]
    fn set_then_get_round_trips_without_disturbing_neighbors() {
        let mut rng = thread_rng();
        let mut sequence = mixed_sequence();
        let before: Vec<Vec<f64>> = (0..sequence.len())
            .map(|index| {
                (0..sequence.dimension())
                    .map(|ordinate| sequence.ordinate(index, ordinate))
                    .collect()
            })
            .collect();

        for index in 0..sequence.len() {
            for ordinate in 0..sequence.dimension() {
                let value: f64 = rng.gen();
                sequence.set_ordinate(index, ordinate, value);
                assert_eq!(value, sequence.ordinate(index, ordinate));

                // every other slot is untouched
                for other_index in 0..sequence.len() {
                    for other_ordinate in 0..sequence.dimension() {
                        if (other_index, other_ordinate) == (index, ordinate) {
                            continue;
                        }
                        if other_index > index
                            || (other_index == index && other_ordinate > ordinate)
                        {
                            assert_eq!(
                                before[other_index][other_ordinate],
                                sequence.ordinate(other_index, other_ordinate)
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn every_slot_is_reachable_exactly_once() {
        // writing a unique value through every (index, ordinate) pair must fill all physical
        // storage without collisions
        let mut sequence = mixed_sequence();
        let mut next = 0.0;
        for index in 0..sequence.len() {
            for ordinate in 0..sequence.dimension() {
                sequence.set_ordinate(index, ordinate, next);
                next += 1.0;
            }
        }
        let mut seen: Vec<f64> = Vec::new();
        for index in 0..sequence.len() {
            for ordinate in 0..sequence.dimension() {
                seen.push(sequence.ordinate(index, ordinate));
            }
        }
        let mut expected: Vec<f64> = (0..12).map(|value| value as f64).collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(expected, seen);
    }

    #[test]
    fn copy_is_independent_in_both_directions() {
        let mut original = mixed_sequence();
        let mut copy = original.copy_packed();
        for index in 0..original.len() {
            for ordinate in 0..original.dimension() {
                assert_eq!(
                    original.ordinate(index, ordinate),
                    copy.ordinate(index, ordinate)
                );
            }
        }

        copy.set_ordinate(0, 0, 9999.0);
        assert_eq!(1.0, original.ordinate(0, 0));

        original.set_ordinate(1, 2, -9999.0);
        assert_eq!(200.0, copy.ordinate(1, 2));
    }

    #[test]
    fn reversed_flips_the_point_order() {
        let original = mixed_sequence();
        let reversed = original.reversed_packed();
        for index in 0..original.len() {
            for ordinate in 0..original.dimension() {
                assert_eq!(
                    original.ordinate(original.len() - 1 - index, ordinate),
                    reversed.ordinate(index, ordinate),
                    "point {} ordinate {}",
                    index,
                    ordinate
                );
            }
        }
    }

    #[test]
    fn reversing_twice_restores_the_original() {
        let original = mixed_sequence();
        let round_trip = original.reversed_packed().reversed_packed();
        for index in 0..original.len() {
            for ordinate in 0..original.dimension() {
                assert_eq!(
                    original.ordinate(index, ordinate),
                    round_trip.ordinate(index, ordinate)
                );
            }
        }
    }

    #[test]
    fn reversed_of_interleaved_sequence() {
        let store = VectorStore::from(vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0]);
        let sequence =
            PackedCoordinateSequence::new(vec![Box::new(store)], DimensionMap::interleaved(2), 0)
                .unwrap();
        let reversed = sequence.reversed_packed();
        assert_eq!(3.0, reversed.ordinate(0, 0));
        assert_eq!(30.0, reversed.ordinate(0, 1));
        assert_eq!(1.0, reversed.ordinate(2, 0));
    }

    #[test]
    fn expand_envelope_covers_x_and_y_only() {
        let store = VectorStore::from(vec![0.0, 0.0, 999.0, 5.0, -2.0, 999.0, 3.0, 7.0, 999.0]);
        let sequence =
            PackedCoordinateSequence::new(vec![Box::new(store)], DimensionMap::interleaved(3), 0)
                .unwrap();
        let mut envelope = Envelope::null();
        sequence.expand_envelope(&mut envelope);
        assert_eq!(nalgebra::Point2::new(0.0, -2.0), envelope.min());
        assert_eq!(nalgebra::Point2::new(5.0, 7.0), envelope.max());
    }

    #[test]
    fn expand_envelope_fast_and_general_paths_agree() {
        let mut fast = Envelope::null();
        mixed_sequence().expand_envelope(&mut fast);
        let mut general = Envelope::null();
        mixed_sequence_segmented().expand_envelope(&mut general);
        assert_eq!(fast, general);
        assert_eq!(nalgebra::Point2::new(1.0, 10.0), fast.min());
        assert_eq!(nalgebra::Point2::new(3.0, 30.0), fast.max());
    }

    #[test]
    fn to_coordinates_matches_per_ordinate_access() {
        let sequence = mixed_sequence();
        let coordinates = sequence.to_coordinates();
        assert_eq!(sequence.len(), coordinates.len());
        for (index, coordinate) in coordinates.iter().enumerate() {
            assert_eq!(sequence.ordinate(index, 0), coordinate.x);
            assert_eq!(sequence.ordinate(index, 1), coordinate.y);
            assert_eq!(sequence.ordinate(index, 2), coordinate.z);
            assert_eq!(sequence.ordinate(index, 3), coordinate.m);
        }
    }

    #[test]
    fn both_materialization_paths_produce_identical_coordinates() {
        let fast = mixed_sequence().to_coordinates();
        let general = mixed_sequence_segmented().to_coordinates();
        assert_eq!(fast, general);
    }

    #[test]
    fn one_segmented_store_forces_the_general_path() {
        // x/y contiguous, z segmented: materialization must still be correct
        let xy = VectorStore::from(vec![1.0, 10.0, 2.0, 20.0]);
        let z = SegmentedStore::from_vec(vec![100.0, 200.0], 1);
        let map = DimensionMap::new(vec![
            SlotRef::new(0, 0),
            SlotRef::new(0, 1),
            SlotRef::new(1, 0),
        ]);
        let sequence =
            PackedCoordinateSequence::new(vec![Box::new(xy), Box::new(z)], map, 0).unwrap();
        let coordinates = sequence.to_coordinates();
        assert_eq!(2, coordinates.len());
        for (index, coordinate) in coordinates.iter().enumerate() {
            assert_eq!(sequence.ordinate(index, 0), coordinate.x);
            assert_eq!(sequence.ordinate(index, 1), coordinate.y);
            assert_eq!(sequence.ordinate(index, 2), coordinate.z);
            assert!(!coordinate.has_m());
        }
    }

    #[test]
    fn raw_ordinate_reports_stride_and_offset() {
        let sequence = mixed_sequence();
        let ys = sequence.raw_ordinate(1);
        assert_eq!(2, ys.stride());
        assert_eq!(1, ys.offset());
        let ms = sequence.raw_ordinate(3);
        assert_eq!(1, ms.stride());
        assert_eq!(0, ms.offset());
    }

    #[test]
    fn raw_ordinate_mut_writes_through_to_the_sequence() {
        let mut sequence = mixed_sequence();
        {
            let mut zs = sequence.raw_ordinate_mut(2);
            zs.set(1, 222.0);
        }
        assert_eq!(222.0, sequence.ordinate(1, 2));
    }

    #[test]
    fn sequence_over_external_memory_aliases_it() {
        let mut xs = vec![1.0, 2.0, 3.0];
        let mut ys = vec![10.0, 20.0, 30.0];
        {
            let stores: Vec<Box<dyn OrdinateStore>> = vec![
                Box::new(SliceStore::new(&mut xs)),
                Box::new(SliceStore::new(&mut ys)),
            ];
            let mut sequence =
                PackedCoordinateSequence::new(stores, DimensionMap::separated(2), 0).unwrap();
            sequence.set_ordinate(2, 1, 99.0);
        }
        // no defensive copy: the write is visible in the caller's buffer
        assert_eq!(vec![10.0, 20.0, 99.0], ys);
    }

    #[test]
    fn trait_object_access_works() {
        let sequence = mixed_sequence();
        let copy: Box<dyn CoordinateSequence> = sequence.copy();
        assert_eq!(sequence.len(), copy.len());
        let reversed = copy.reversed();
        assert_eq!(sequence.ordinate(2, 0), reversed.ordinate(0, 0));
    }

    #[test]
    fn construction_rejects_inconsistent_point_counts() {
        let a = VectorStore::from(vec![0.0; 10]);
        let b = VectorStore::from(vec![0.0; 15]);
        let map = DimensionMap::separated(2);
        let err = PackedCoordinateSequence::new(vec![Box::new(a), Box::new(b)], map, 0)
            .unwrap_err();
        assert!(err.to_string().contains("inconsistent point count"));
    }

    #[test]
    fn construction_rejects_fewer_than_two_ordinates() {
        let store = VectorStore::from(vec![0.0; 4]);
        let err = PackedCoordinateSequence::new(
            vec![Box::new(store)],
            DimensionMap::interleaved(1),
            0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least two ordinates"));
    }

    #[test]
    fn construction_rejects_too_many_measures() {
        let store = VectorStore::from(vec![0.0; 6]);
        let err = PackedCoordinateSequence::new(
            vec![Box::new(store)],
            DimensionMap::interleaved(3),
            2,
        )
        .unwrap_err();
        assert!(err.to_string().contains("measures"));
    }

    #[test]
    fn empty_sequence_bulk_operations() {
        let sequence = PackedCoordinateSequence::new(
            vec![
                Box::new(VectorStore::default()) as Box<dyn OrdinateStore>,
                Box::new(VectorStore::default()),
            ],
            DimensionMap::separated(2),
            0,
        )
        .unwrap();
        assert!(sequence.is_empty());
        assert!(sequence.to_coordinates().is_empty());
        let mut envelope = Envelope::null();
        sequence.expand_envelope(&mut envelope);
        assert!(envelope.is_null());
        assert_eq!(0, sequence.reversed_packed().len());
    }
}
