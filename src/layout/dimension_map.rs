/// Identifies one physical storage slot within a packed coordinate sequence: a buffer in the
/// sequence's buffer list, together with one of the interleaved slots of that buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotRef {
    buffer: usize,
    slot: usize,
}

impl SlotRef {
    /// Creates a new `SlotRef` referencing the given `slot` within the buffer at index `buffer`
    pub fn new(buffer: usize, slot: usize) -> Self {
        Self { buffer, slot }
    }

    /// Index of the referenced buffer within the sequence's buffer list
    pub fn buffer(&self) -> usize {
        self.buffer
    }

    /// Index of the referenced slot within that buffer's interleaved per-point group
    pub fn slot(&self) -> usize {
        self.slot
    }
}

/// The mapping from logical ordinate index to physical storage slot.
///
/// Entry `k` names the buffer and intra-buffer slot that holds ordinate `k` for every point of a
/// sequence. A valid map is a bijection onto the set of all slots implied by the sequence's
/// buffers: every slot is referenced exactly once. That property is not enforced here but by the
/// sequence constructor, which derives the buffer shapes the map has to cover (see
/// [`SequenceShape`](crate::layout::SequenceShape)).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionMap {
    entries: Vec<SlotRef>,
}

impl DimensionMap {
    /// Creates a dimension map from the given entries. Entry `k` describes where ordinate `k`
    /// is stored
    pub fn new(entries: Vec<SlotRef>) -> Self {
        Self { entries }
    }

    /// The map for a single buffer that interleaves all `dimension` ordinates per point
    /// (`x0 y0 x1 y1 ...` for `dimension == 2`)
    /// ```
    /// # use coordseq::layout::{DimensionMap, SlotRef};
    /// let map = DimensionMap::interleaved(3);
    /// assert_eq!(SlotRef::new(0, 2), map.entry(2));
    /// ```
    pub fn interleaved(dimension: usize) -> Self {
        Self {
            entries: (0..dimension).map(|slot| SlotRef::new(0, slot)).collect(),
        }
    }

    /// The map for one buffer per ordinate (`x0 x1 ...` in buffer 0, `y0 y1 ...` in buffer 1,
    /// and so on)
    /// ```
    /// # use coordseq::layout::{DimensionMap, SlotRef};
    /// let map = DimensionMap::separated(3);
    /// assert_eq!(SlotRef::new(2, 0), map.entry(2));
    /// ```
    pub fn separated(dimension: usize) -> Self {
        Self {
            entries: (0..dimension).map(|buffer| SlotRef::new(buffer, 0)).collect(),
        }
    }

    /// The number of logical ordinates this map describes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if this map describes no ordinates at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The storage slot of ordinate `ordinate`
    ///
    /// # Panics
    ///
    /// Panics if `ordinate` is not less than `self.len()`
    pub fn entry(&self, ordinate: usize) -> SlotRef {
        self.entries[ordinate]
    }

    /// All entries of this map, in logical ordinate order
    pub fn entries(&self) -> &[SlotRef] {
        &self.entries
    }

    /// Mirrors every entry's intra-buffer slot index: an entry with slot `s` into a buffer that
    /// interleaves `d` ordinates becomes slot `d - s - 1`.
    ///
    /// Reversing a flat buffer of fixed-size per-point groups reverses both the group order and
    /// the slot order within each group. The group-order reversal is what sequence reversal
    /// wants; this mirror undoes the unwanted within-group reversal. `dims_per_buffer[b]` must
    /// be the number of interleaved ordinates of buffer `b`.
    pub(crate) fn mirror_slots(&mut self, dims_per_buffer: &[usize]) {
        for entry in &mut self.entries {
            entry.slot = dims_per_buffer[entry.buffer] - entry.slot - 1;
        }
    }
}
