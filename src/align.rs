/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be a non-zero power of two.
///
/// # Examples
///
/// ```rust
/// use rarray::align_to;
///
/// assert_eq!(align_to!(13usize, 8), 16);
/// assert_eq!(align_to!(16usize, 16), 16);
/// assert_eq!(align_to!(17usize, 64), 64);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $alignment:expr) => {
    ($value + $alignment - 1) & !($alignment - 1)
  };
}

/// Checks whether `value` is a multiple of `alignment`.
///
/// ```rust
/// use rarray::is_aligned;
///
/// assert!(is_aligned!(64usize, 32));
/// assert!(!is_aligned!(65usize, 32));
/// ```
#[macro_export]
macro_rules! is_aligned {
  ($value:expr, $alignment:expr) => {
    ($value & ($alignment - 1)) == 0
  };
}
