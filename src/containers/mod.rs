//! Coordinate sequences and their backing storage.
//!
//! # The storage model
//!
//! A coordinate sequence is a logical table: `len` points with `dimension` ordinate values each.
//! This module separates that logical view from the physical one along two axes:
//!
//! 1) Where do the ordinate values live? Every flat run of values is an
//!    [`OrdinateStore`]: owned memory ([`VectorStore`]), externally borrowed memory
//!    ([`SliceStore`]), or memory without a single contiguous allocation ([`SegmentedStore`]).
//! 2) How are the values arranged? A store interleaves some subset of the ordinates point by
//!    point, and a [`DimensionMap`](crate::layout::DimensionMap) records which ordinate sits in
//!    which store and slot. Classic layouts are single-store interleaved (`x0 y0 x1 y1 ...`) and
//!    one-store-per-ordinate, but any mixture is allowed, e.g. an interleaved xy store next to a
//!    separate z store.
//!
//! [`PackedCoordinateSequence`] combines stores and map into a sequence and implements the
//! [`CoordinateSequence`] capability trait that external algorithms consume. Bulk operations
//! probe [`OrdinateStore::as_contiguous`] and switch between a raw-slice fast path and a general
//! per-element path, so a sequence over unusual storage is slower but never wrong.
//!
//! [`PackedSequenceFactory`] creates sequences in the two canonical layouts when the caller
//! wants the library to allocate instead of adopting producer buffers.

mod stores;
pub use self::stores::*;

mod traits;
pub use self::traits::*;

mod raw_ordinate_view;
pub use self::raw_ordinate_view::*;

mod packed;
pub use self::packed::*;

mod factory;
pub use self::factory::*;
