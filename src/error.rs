use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArrayError>;

/// Failures reported by the `try_*` surface of [`crate::Array`] and by
/// [`crate::AlignedBlock::try_new`].
///
/// The panicking methods treat the same conditions as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
  #[error("failed to allocate {size} bytes aligned to {alignment}")]
  AllocFailed { size: usize, alignment: usize },

  #[error("capacity overflow")]
  CapacityOverflow,

  #[error("index {index} out of bounds for length {len}")]
  IndexOutOfBounds { index: usize, len: usize },

  #[error("invalid range: {count} elements from {start} in array of length {len}")]
  InvalidRange { start: usize, count: usize, len: usize },

  #[error("array is empty")]
  Empty,
}
