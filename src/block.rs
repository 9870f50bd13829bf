use std::{alloc, ptr, ptr::NonNull};

use libc::{c_void, free, malloc};

use crate::{
  align_to,
  error::{ArrayError, Result},
  header::{HEADER_ALIGN, HEADER_SIZE, Header},
  is_aligned,
};

fn trace_alloc(
  size: usize,
  alignment: usize,
  addr: *const u8,
) {
  log::trace!(
    "allocated {} bytes aligned to {}, address = {:?}",
    size,
    alignment,
    addr
  );
}

/// Allocates `size` usable bytes starting at an address that is a multiple
/// of `alignment`. Returns null when the heap is exhausted or the padded
/// request does not fit in `usize`.
///
/// ```text
///   raw (malloc)
///   ▼
///   ┌─────────┬──────────────┬──────────────────────────────┐
///   │ padding │ Header       │ size usable bytes            │
///   │         │ size │ raw   │                              │
///   └─────────┴──────────────┴──────────────────────────────┘
///                            ▲
///                            └── returned, aligned
/// ```
///
/// # Safety
///
/// `alignment` must be a non-zero power of two, and the result must be
/// released with exactly one call to [`deallocate`].
pub(crate) unsafe fn allocate(
  size: usize,
  alignment: usize,
) -> *mut u8 {
  debug_assert!(alignment.is_power_of_two());
  let alignment = alignment.max(HEADER_ALIGN);

  let total_size = match size
    .checked_add(alignment - 1)
    .and_then(|padded| padded.checked_add(HEADER_SIZE))
  {
    Some(total_size) => total_size,
    None => return ptr::null_mut(),
  };

  unsafe {
    let raw = malloc(total_size) as *mut u8;
    if raw.is_null() {
      return ptr::null_mut();
    }

    let start = raw as usize + HEADER_SIZE;
    let aligned = raw.add(align_to!(start, alignment) - raw as usize);
    debug_assert!(is_aligned!(aligned as usize, alignment));
    Header::locate(aligned).write(Header::new(size, raw));

    trace_alloc(size, alignment, aligned);
    aligned
  }
}

/// Releases a block obtained from [`allocate`].
///
/// # Safety
///
/// `aligned` must come from [`allocate`] and must not have been released.
pub(crate) unsafe fn deallocate(aligned: *mut u8) {
  assert!(!aligned.is_null(), "deallocate called with a null pointer");

  unsafe {
    let header = Header::locate(aligned).read();
    log::trace!("released {} bytes, address = {:?}", header.size, aligned);
    free(header.raw as *mut c_void);
  }
}

/// Size the caller asked for when `aligned` was allocated.
///
/// # Safety
///
/// `aligned` must be a live pointer returned by [`allocate`].
pub(crate) unsafe fn requested_size(aligned: *const u8) -> usize {
  unsafe { (*Header::locate(aligned as *mut u8)).size }
}

/// Exclusive owner of one aligned heap allocation.
///
/// The block is freed exactly once, when the handle is dropped.
pub struct AlignedBlock {
  ptr: NonNull<u8>,
  alignment: usize,
}

impl AlignedBlock {
  /// Allocates a block, aborting through [`alloc::handle_alloc_error`] when
  /// the heap cannot satisfy the request.
  ///
  /// # Panics
  ///
  /// Panics if `alignment` is not a power of two, or if the request is too
  /// large to describe as a [`alloc::Layout`].
  pub fn new(
    size: usize,
    alignment: usize,
  ) -> Self {
    match Self::try_new(size, alignment) {
      Ok(block) => block,
      Err(err) => match alloc::Layout::from_size_align(size, alignment) {
        Ok(layout) => alloc::handle_alloc_error(layout),
        Err(_) => panic!("{err}"),
      },
    }
  }

  /// Allocates a block, reporting exhaustion as
  /// [`ArrayError::AllocFailed`].
  ///
  /// # Panics
  ///
  /// Panics if `alignment` is not a power of two.
  pub fn try_new(
    size: usize,
    alignment: usize,
  ) -> Result<Self> {
    assert!(
      alignment.is_power_of_two(),
      "alignment {alignment} is not a power of two"
    );

    let ptr = unsafe { allocate(size, alignment) };
    match NonNull::new(ptr) {
      Some(ptr) => Ok(Self { ptr, alignment }),
      None => Err(ArrayError::AllocFailed { size, alignment }),
    }
  }

  #[inline]
  pub fn as_ptr(&self) -> *mut u8 {
    self.ptr.as_ptr()
  }

  /// Usable bytes, as requested at allocation time.
  #[inline]
  pub fn size(&self) -> usize {
    unsafe { requested_size(self.ptr.as_ptr()) }
  }

  #[inline]
  pub fn alignment(&self) -> usize {
    self.alignment
  }
}

impl Drop for AlignedBlock {
  fn drop(&mut self) {
    unsafe { deallocate(self.ptr.as_ptr()) }
  }
}

impl std::fmt::Debug for AlignedBlock {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> std::fmt::Result {
    f.debug_struct("AlignedBlock")
      .field("ptr", &self.ptr)
      .field("size", &self.size())
      .field("alignment", &self.alignment)
      .finish()
  }
}

// The block is plain memory with no shared interior state.
unsafe impl Send for AlignedBlock {}
unsafe impl Sync for AlignedBlock {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_allocate_respects_alignment() {
    for alignment in [1usize, 2, 4, 8, 16, 32, 64, 128, 4096] {
      for size in [0usize, 1, 7, 64, 1000] {
        unsafe {
          let addr = allocate(size, alignment);
          assert!(!addr.is_null());
          assert!(is_aligned!(addr as usize, alignment));
          assert_eq!(requested_size(addr), size);

          ptr::write_bytes(addr, 0xAB, size);
          for i in 0..size {
            assert_eq!(*addr.add(i), 0xAB);
          }

          deallocate(addr);
        }
      }
    }
  }

  #[test]
  fn test_blocks_do_not_overlap() {
    unsafe {
      let first = allocate(32, 16);
      let second = allocate(32, 16);

      ptr::write_bytes(first, 1, 32);
      ptr::write_bytes(second, 2, 32);

      assert_eq!(*first.add(31), 1);
      assert_eq!(*second, 2);
      assert_eq!(requested_size(first), 32);
      assert_eq!(requested_size(second), 32);

      deallocate(first);
      deallocate(second);
    }
  }

  #[test]
  fn test_overflowing_request_returns_null() {
    unsafe {
      assert!(allocate(usize::MAX, 64).is_null());
    }
  }

  #[test]
  fn test_aligned_block_handle() {
    let block = AlignedBlock::new(256, 64);

    assert!(is_aligned!(block.as_ptr() as usize, 64));
    assert_eq!(block.size(), 256);
    assert_eq!(block.alignment(), 64);

    unsafe { ptr::write_bytes(block.as_ptr(), 0xCD, 256) };
  }

  #[test]
  fn test_try_new_reports_exhaustion() {
    let err = AlignedBlock::try_new(usize::MAX - 8, 8).unwrap_err();
    assert_eq!(
      err,
      ArrayError::AllocFailed {
        size: usize::MAX - 8,
        alignment: 8
      }
    );
  }

  #[test]
  #[should_panic(expected = "not a power of two")]
  fn test_rejects_bad_alignment() {
    let _ = AlignedBlock::try_new(16, 24);
  }
}
