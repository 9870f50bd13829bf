use std::mem;

/// Bookkeeping written immediately before every aligned address handed out
/// by [`crate::block`]. Never visible outside the crate.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Header {
  pub size: usize,
  pub raw: *mut u8,
}

pub const HEADER_SIZE: usize = mem::size_of::<Header>();
pub const HEADER_ALIGN: usize = mem::align_of::<Header>();

impl Header {
  pub fn new(
    size: usize,
    raw: *mut u8,
  ) -> Self {
    Self { size, raw }
  }

  /// Location of the header belonging to `aligned`.
  ///
  /// # Safety
  ///
  /// `aligned` must have been returned by [`crate::block::allocate`].
  pub unsafe fn locate(aligned: *mut u8) -> *mut Header {
    unsafe { aligned.sub(HEADER_SIZE) as *mut Header }
  }
}
