#![warn(clippy::all)]

//! Packed multi-buffer coordinate sequences.
//!
//! `coordseq` lets a geometry system consume coordinate data that some external producer has
//! already laid out in memory (separate x/y/z arrays, a single interleaved xyzm array, or any
//! mixture of the two) without copying. The central type is
//! [`PackedCoordinateSequence`](crate::containers::PackedCoordinateSequence), which presents a
//! logical table of points behind the
//! [`CoordinateSequence`](crate::containers::CoordinateSequence) capability trait while the
//! physical ordinate values stay in whatever buffers the producer supplied. The mapping from
//! logical ordinate index to physical storage slot is described by a
//! [`DimensionMap`](crate::layout::DimensionMap) and validated once at construction time.
//!
//! To get started, look at the [`containers`] module and at
//! [`PackedSequenceFactory`](crate::containers::PackedSequenceFactory), which builds sequences
//! for the common interleaved and separated layouts.

pub extern crate nalgebra;

/// Coordinate sequences, their backing ordinate stores, and the sequence factory
pub mod containers;
/// Geometric value types consumed and produced by coordinate sequences
pub mod geometry;
/// Defines the mapping between logical ordinates and physical buffer slots
pub mod layout;
