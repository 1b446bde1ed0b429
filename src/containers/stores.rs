/// A flat store of `f64` ordinate values backing part of a coordinate sequence.
///
/// A packed sequence never assumes anything about where its values live beyond this trait: the
/// store may own its memory, borrow it from the caller, or keep it in non-contiguous pieces.
/// Stores that can expose their whole content as a single slice advertise that through
/// [`as_contiguous`](OrdinateStore::as_contiguous); the bulk operations of a sequence probe this
/// capability and take a faster path when every involved store supports it.
pub trait OrdinateStore {
    /// The number of values in this store
    fn len(&self) -> usize;

    /// Returns true if this store holds no values
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds
    fn get(&self, index: usize) -> f64;

    /// Overwrites the value at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds
    fn set(&mut self, index: usize, value: f64);

    /// Reverses the order of all values in this store
    fn reverse(&mut self);

    /// Copies the contents of this store into a freshly allocated vector
    fn to_vec(&self) -> Vec<f64>;

    /// The whole store as one contiguous slice, if this store is directly addressable. The
    /// default implementation reports no such capability
    fn as_contiguous(&self) -> Option<&[f64]> {
        None
    }

    /// Like [`as_contiguous`](OrdinateStore::as_contiguous), but mutable
    fn as_contiguous_mut(&mut self) -> Option<&mut [f64]> {
        None
    }
}

/// An ordinate store that owns its values in a `Vec<f64>`. This is what [`copy`] operations
/// allocate, and the store the sequence factory uses for fresh sequences.
///
/// [`copy`]: crate::containers::CoordinateSequence::copy
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorStore {
    storage: Vec<f64>,
}

impl VectorStore {
    /// Creates a zero-filled store of the given length
    pub fn zeroed(len: usize) -> Self {
        Self {
            storage: vec![0.0; len],
        }
    }
}

impl From<Vec<f64>> for VectorStore {
    fn from(storage: Vec<f64>) -> Self {
        Self { storage }
    }
}

impl OrdinateStore for VectorStore {
    fn len(&self) -> usize {
        self.storage.len()
    }

    fn get(&self, index: usize) -> f64 {
        self.storage[index]
    }

    fn set(&mut self, index: usize, value: f64) {
        self.storage[index] = value;
    }

    fn reverse(&mut self) {
        self.storage.reverse();
    }

    fn to_vec(&self) -> Vec<f64> {
        self.storage.clone()
    }

    fn as_contiguous(&self) -> Option<&[f64]> {
        Some(&self.storage)
    }

    fn as_contiguous_mut(&mut self) -> Option<&mut [f64]> {
        Some(&mut self.storage)
    }
}

/// An ordinate store over externally owned memory. The sequence performs no defensive copy, so
/// writes through the sequence are visible to whoever owns the memory once the sequence is gone,
/// and the borrow checker keeps the owner from touching it in between.
#[derive(Debug)]
pub struct SliceStore<'a> {
    storage: &'a mut [f64],
}

impl<'a> SliceStore<'a> {
    /// Creates a store over the given external memory
    pub fn new(storage: &'a mut [f64]) -> Self {
        Self { storage }
    }
}

impl<'a> OrdinateStore for SliceStore<'a> {
    fn len(&self) -> usize {
        self.storage.len()
    }

    fn get(&self, index: usize) -> f64 {
        self.storage[index]
    }

    fn set(&mut self, index: usize, value: f64) {
        self.storage[index] = value;
    }

    fn reverse(&mut self) {
        self.storage.reverse();
    }

    fn to_vec(&self) -> Vec<f64> {
        self.storage.to_vec()
    }

    fn as_contiguous(&self) -> Option<&[f64]> {
        Some(&self.storage[..])
    }

    fn as_contiguous_mut(&mut self) -> Option<&mut [f64]> {
        Some(&mut self.storage[..])
    }
}

/// An ordinate store that keeps its values in fixed-size segments instead of one contiguous
/// allocation. It reports no contiguous view, so sequences backed by it always take the general
/// per-element bulk paths.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedStore {
    segments: Vec<Vec<f64>>,
    segment_len: usize,
    length: usize,
}

impl SegmentedStore {
    /// Creates a segmented store holding the given values, split into segments of at most
    /// `segment_len` values each
    ///
    /// # Panics
    ///
    /// Panics if `segment_len` is zero
    pub fn from_vec(values: Vec<f64>, segment_len: usize) -> Self {
        assert!(segment_len > 0, "segment_len must not be zero");
        let length = values.len();
        let mut segments = Vec::with_capacity((length + segment_len - 1) / segment_len);
        let mut values = values;
        while values.len() > segment_len {
            let rest = values.split_off(segment_len);
            segments.push(values);
            values = rest;
        }
        if !values.is_empty() {
            segments.push(values);
        }
        Self {
            segments,
            segment_len,
            length,
        }
    }
}

impl OrdinateStore for SegmentedStore {
    fn len(&self) -> usize {
        self.length
    }

    fn get(&self, index: usize) -> f64 {
        assert!(index < self.length, "index {} is out of bounds", index);
        self.segments[index / self.segment_len][index % self.segment_len]
    }

    fn set(&mut self, index: usize, value: f64) {
        assert!(index < self.length, "index {} is out of bounds", index);
        self.segments[index / self.segment_len][index % self.segment_len] = value;
    }

    fn reverse(&mut self) {
        for front in 0..self.length / 2 {
            let back = self.length - front - 1;
            let front_value = self.get(front);
            let back_value = self.get(back);
            self.set(front, back_value);
            self.set(back, front_value);
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.length);
        for segment in &self.segments {
            values.extend_from_slice(segment);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{thread_rng, Rng};

    #[test]
    fn segmented_store_matches_vector_store() {
        let mut rng = thread_rng();
        let values: Vec<f64> = (0..37).map(|_| rng.gen()).collect();

        let vector = VectorStore::from(values.clone());
        let segmented = SegmentedStore::from_vec(values, 8);

        assert_eq!(vector.len(), segmented.len());
        for index in 0..vector.len() {
            assert_eq!(vector.get(index), segmented.get(index));
        }
        assert_eq!(vector.to_vec(), segmented.to_vec());
    }

    #[test]
    fn segmented_store_reverses_like_a_flat_buffer() {
        let values: Vec<f64> = (0..23).map(|value| value as f64).collect();
        let mut expected = values.clone();
        expected.reverse();

        let mut segmented = SegmentedStore::from_vec(values, 4);
        segmented.reverse();
        assert_eq!(expected, segmented.to_vec());
    }

    #[test]
    fn segmented_store_set_hits_the_right_segment() {
        let mut segmented = SegmentedStore::from_vec(vec![0.0; 10], 3);
        segmented.set(9, 42.0);
        assert_eq!(42.0, segmented.get(9));
        assert_eq!(0.0, segmented.get(8));
    }

    #[test]
    fn contiguity_capability() {
        let mut vector = VectorStore::from(vec![1.0, 2.0]);
        assert!(vector.as_contiguous().is_some());
        assert!(vector.as_contiguous_mut().is_some());

        let mut segmented = SegmentedStore::from_vec(vec![1.0, 2.0], 1);
        assert!(segmented.as_contiguous().is_none());
        assert!(segmented.as_contiguous_mut().is_none());
    }

    #[test]
    fn slice_store_aliases_the_callers_memory() {
        let mut memory = vec![1.0, 2.0, 3.0];
        {
            let mut store = SliceStore::new(&mut memory);
            store.set(1, 42.0);
        }
        assert_eq!(vec![1.0, 42.0, 3.0], memory);
    }
}
