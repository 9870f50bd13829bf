//! Capacity growth for [`crate::Array`].
//!
//! Grows aggressively while the block is small and tapers off as it gets
//! large:
//!
//! ```text
//!   current block bytes      factor
//!   ────────────────────     ──────
//!        0 ..=  64_000        x3
//!   64_001 ..= 400_000        x2
//!  400_001 ..                 x1.5
//! ```
//!
//! The result is never below [`MINIMAL_SIZE`] nor below the requested
//! capacity.

/// Smallest capacity a regrown array ends up with.
pub const MINIMAL_SIZE: usize = 8;

const TRIPLE_LIMIT_BYTES: usize = 64_000;
const DOUBLE_LIMIT_BYTES: usize = 400_000;

/// Capacity to grow to when `capacity` slots of `elem_size` bytes are not
/// enough to hold `requested` elements.
///
/// Only meaningful for regrowth: a first reservation allocates exactly what
/// was requested and never consults this function.
pub fn next_capacity(
  capacity: usize,
  elem_size: usize,
  requested: usize,
) -> usize {
  let old_bytes = capacity.saturating_mul(elem_size);

  let candidate = if old_bytes > DOUBLE_LIMIT_BYTES {
    capacity.saturating_mul(3) >> 1
  } else if old_bytes > TRIPLE_LIMIT_BYTES {
    capacity.saturating_mul(2)
  } else {
    capacity.saturating_mul(3)
  };

  candidate.max(MINIMAL_SIZE).max(requested)
}
