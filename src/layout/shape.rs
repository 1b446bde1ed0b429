use anyhow::{bail, Result};

use super::DimensionMap;

/// The point count and per-buffer dimension counts of a packed coordinate sequence, derived from
/// the lengths of the sequence's buffers and its [`DimensionMap`].
///
/// Deriving a `SequenceShape` is the construction-time validation of a packed sequence: it fails
/// for every configuration in which the map is not a bijection onto the slots implied by the
/// buffers, so a sequence that holds a shape is known to be consistent for its entire life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceShape {
    len: usize,
    dims_per_buffer: Vec<usize>,
}

impl SequenceShape {
    /// Derives the shape implied by buffers of the given lengths under the given map, or fails
    /// if the configuration is inconsistent.
    ///
    /// The number of ordinates each buffer interleaves per point equals the number of map
    /// entries referencing that buffer; the point count is each referenced buffer's length
    /// divided by that number, and all referenced buffers must agree on it. On top of that, the
    /// map must claim every slot of every buffer exactly once.
    ///
    /// # Errors
    ///
    /// - the map is empty
    /// - a map entry references a buffer or slot that does not exist
    /// - a buffer's length is not a multiple of its per-point stride
    /// - two buffers imply different point counts
    /// - a buffer holds data that no map entry references
    /// - two map entries claim the same slot
    pub fn derive(buffer_lens: &[usize], map: &DimensionMap) -> Result<Self> {
        if map.is_empty() {
            bail!("dimension map must not be empty");
        }

        let mut claims = vec![0usize; buffer_lens.len()];
        for (ordinate, entry) in map.entries().iter().enumerate() {
            if entry.buffer() >= buffer_lens.len() {
                bail!(
                    "map index out of range: ordinate {} references buffer {}, but the sequence has {} buffers",
                    ordinate,
                    entry.buffer(),
                    buffer_lens.len()
                );
            }
            claims[entry.buffer()] += 1;
        }

        let mut len: Option<usize> = None;
        for (buffer, (&buffer_len, &claimed)) in buffer_lens.iter().zip(&claims).enumerate() {
            if claimed == 0 {
                continue;
            }
            if buffer_len % claimed != 0 {
                bail!(
                    "inconsistent buffer length: buffer {} holds {} values, which is not a multiple of its {} mapped ordinates",
                    buffer,
                    buffer_len,
                    claimed
                );
            }
            let candidate = buffer_len / claimed;
            match len {
                None => len = Some(candidate),
                Some(previous) if previous != candidate => {
                    bail!(
                        "inconsistent point count: buffer {} implies {} points, but earlier buffers imply {}",
                        buffer,
                        candidate,
                        previous
                    );
                }
                Some(_) => {}
            }
        }
        let len = len.unwrap_or(0);

        // Physical slot count per buffer. A buffer the map never references may not hold data,
        // since its slots could never be claimed.
        let mut dims_per_buffer = Vec::with_capacity(buffer_lens.len());
        let mut total_slots = 0usize;
        for (buffer, (&buffer_len, &claimed)) in buffer_lens.iter().zip(&claims).enumerate() {
            let dims = if len > 0 {
                if buffer_len % len != 0 {
                    bail!(
                        "inconsistent buffer length: buffer {} holds {} values, which is not a multiple of the point count {}",
                        buffer,
                        buffer_len,
                        len
                    );
                }
                buffer_len / len
            } else if buffer_len > 0 {
                bail!(
                    "buffer {} holds {} values but is not referenced by the dimension map",
                    buffer,
                    buffer_len
                );
            } else {
                claimed
            };
            dims_per_buffer.push(dims);
            total_slots += dims;
        }
        if total_slots != map.len() {
            bail!(
                "dimension mismatch: the buffers hold {} interleaved slots per point, but the dimension map names {} ordinates; every slot must be claimed by exactly one ordinate",
                total_slots,
                map.len()
            );
        }

        // Occupancy pass: together with the slot-count check above this establishes that the map
        // is a bijection onto the buffers' slots
        let mut slot_base = Vec::with_capacity(dims_per_buffer.len());
        let mut base = 0usize;
        for &dims in &dims_per_buffer {
            slot_base.push(base);
            base += dims;
        }
        let mut occupied = vec![false; total_slots];
        for (ordinate, entry) in map.entries().iter().enumerate() {
            let dims = dims_per_buffer[entry.buffer()];
            if entry.slot() >= dims {
                bail!(
                    "map index out of range: ordinate {} references slot {} of buffer {}, which interleaves only {} ordinates",
                    ordinate,
                    entry.slot(),
                    entry.buffer(),
                    dims
                );
            }
            let slot = slot_base[entry.buffer()] + entry.slot();
            if occupied[slot] {
                bail!(
                    "duplicate slot: ordinate {} maps to slot {} of buffer {}, which an earlier ordinate already claims",
                    ordinate,
                    entry.slot(),
                    entry.buffer()
                );
            }
            occupied[slot] = true;
        }

        Ok(Self {
            len,
            dims_per_buffer,
        })
    }

    /// The number of points in the sequence
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the sequence holds no points
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of ordinates each buffer interleaves per point. This is also the stride
    /// between consecutive points of any ordinate stored in that buffer
    pub fn dims_per_buffer(&self) -> &[usize] {
        &self.dims_per_buffer
    }

    /// The per-point stride of the buffer at index `buffer`
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is not a valid buffer index
    pub fn dims_of_buffer(&self, buffer: usize) -> usize {
        self.dims_per_buffer[buffer]
    }
}
