use super::OrdinateStore;

/// A view over the backing storage of a single ordinate of a packed sequence.
///
/// The values of the ordinate for consecutive points sit `stride` elements apart in the backing
/// store, starting at `offset`. Walking a view is more efficient than calling
/// [`ordinate`](crate::containers::CoordinateSequence::ordinate) repeatedly, since the map and
/// shape lookups happen once instead of per element, and consumers that need even more speed can
/// probe [`as_contiguous`](RawOrdinateView::as_contiguous) and walk the raw slice themselves.
pub struct RawOrdinateView<'a> {
    store: &'a dyn OrdinateStore,
    offset: usize,
    stride: usize,
}

impl<'a> RawOrdinateView<'a> {
    pub(crate) fn new(store: &'a dyn OrdinateStore, offset: usize, stride: usize) -> Self {
        debug_assert!(stride > 0);
        debug_assert!(offset < stride);
        Self {
            store,
            offset,
            stride,
        }
    }

    /// The number of elements between this ordinate's values for consecutive points
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The position of this ordinate's value for point 0 within the backing store
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The number of points this view covers
    pub fn len(&self) -> usize {
        self.store.len() / self.stride
    }

    /// Is this view empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// This ordinate's value for the point at `index`
    ///
    /// # Panics
    ///
    /// May panic if `index` is out of bounds
    pub fn get(&self, index: usize) -> f64 {
        self.store.get(self.offset + index * self.stride)
    }

    /// The backing store's contents from this view's offset onwards, as one contiguous slice,
    /// if the store is directly addressable. The first element is the value for point 0 and
    /// every following value for this ordinate is [`stride`](RawOrdinateView::stride) elements
    /// further along
    pub fn as_contiguous(&self) -> Option<&'a [f64]> {
        self.store
            .as_contiguous()
            .map(|storage| &storage[self.offset..])
    }

    /// Iterates over this ordinate's values in point order
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |index| self.get(index))
    }
}

/// Like [`RawOrdinateView`], but for mutable access
pub struct RawOrdinateViewMut<'a> {
    store: &'a mut dyn OrdinateStore,
    offset: usize,
    stride: usize,
}

impl<'a> RawOrdinateViewMut<'a> {
    pub(crate) fn new(store: &'a mut dyn OrdinateStore, offset: usize, stride: usize) -> Self {
        debug_assert!(stride > 0);
        debug_assert!(offset < stride);
        Self {
            store,
            offset,
            stride,
        }
    }

    /// The number of elements between this ordinate's values for consecutive points
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The number of points this view covers
    pub fn len(&self) -> usize {
        self.store.len() / self.stride
    }

    /// Is this view empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// This ordinate's value for the point at `index`
    ///
    /// # Panics
    ///
    /// May panic if `index` is out of bounds
    pub fn get(&self, index: usize) -> f64 {
        self.store.get(self.offset + index * self.stride)
    }

    /// Overwrites this ordinate's value for the point at `index`
    ///
    /// # Panics
    ///
    /// May panic if `index` is out of bounds
    pub fn set(&mut self, index: usize, value: f64) {
        self.store.set(self.offset + index * self.stride, value);
    }
}
