//! A growable array backed by a single [`AlignedBlock`].
//!
//! ```text
//!   Array<T, ALIGN>
//!   ┌──────────┬──────────┬───────────┐
//!   │ block    │ size = 3 │ capacity=8│
//!   └────┬─────┴──────────┴───────────┘
//!        ▼
//!   ┌────┬────┬────┬────┬────┬────┬────┬────┐
//!   │ a0 │ a1 │ a2 │    │    │    │    │    │
//!   └────┴────┴────┴────┴────┴────┴────┴────┘
//!    ◄── live ────► ◄──────── raw ──────────►
//! ```
//!
//! Slots `[0, size)` always hold initialized elements, slots
//! `[size, capacity)` are never read or dropped. An element is built once
//! when it enters the live range and dropped once when it leaves it;
//! relocation during growth moves the bits and runs no user code.
//!
//! Every fallible operation has a `try_*` form returning
//! [`ArrayError`]; the plain form treats the same condition as a fatal
//! programming error and panics (or aborts on heap exhaustion).

use std::{
  alloc, fmt,
  iter::FusedIterator,
  marker::PhantomData,
  mem,
  ops::{Deref, DerefMut, Index, IndexMut},
  ptr::{self, NonNull},
  slice::{self, SliceIndex},
};

use crate::{
  block::AlignedBlock,
  error::{ArrayError, Result},
  growth,
};

/// Default block alignment: one machine word.
pub const WORD_ALIGNMENT: usize = mem::size_of::<usize>();

pub struct Array<T, const ALIGN: usize = { WORD_ALIGNMENT }> {
  block: Option<AlignedBlock>,
  size: usize,
  capacity: usize,
  _marker: PhantomData<T>,
}

#[track_caller]
fn fatal(err: ArrayError) -> ! {
  match err {
    ArrayError::AllocFailed { size, alignment } => {
      match alloc::Layout::from_size_align(size, alignment) {
        Ok(layout) => alloc::handle_alloc_error(layout),
        Err(_) => panic!("{}", ArrayError::CapacityOverflow),
      }
    }
    err => panic!("{err}"),
  }
}

#[track_caller]
#[inline]
fn or_fatal<R>(result: Result<R>) -> R {
  match result {
    Ok(value) => value,
    Err(err) => fatal(err),
  }
}

impl<T, const ALIGN: usize> Array<T, ALIGN> {
  const BLOCK_ALIGN: usize = {
    assert!(ALIGN.is_power_of_two(), "ALIGN must be a power of two");
    if ALIGN > mem::align_of::<T>() {
      ALIGN
    } else {
      mem::align_of::<T>()
    }
  };

  /// Creates an empty array. Nothing is allocated until the first
  /// reservation.
  pub fn new() -> Self {
    Self {
      block: None,
      size: 0,
      capacity: 0,
      _marker: PhantomData,
    }
  }

  /// Creates an empty array whose capacity is exactly `capacity`.
  #[track_caller]
  pub fn with_capacity(capacity: usize) -> Self {
    or_fatal(Self::try_with_capacity(capacity))
  }

  pub fn try_with_capacity(capacity: usize) -> Result<Self> {
    let mut array = Self::new();
    array.try_reserve(capacity)?;
    Ok(array)
  }

  /// Creates an array holding clones of `values`, with no spare capacity.
  pub fn from_slice(values: &[T]) -> Self
  where
    T: Clone,
  {
    let mut array = Self::with_capacity(values.len());
    array.insert_slice(0, values);
    array
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.size
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.size == 0
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Address of the first slot. Dangling (but aligned) while nothing is
  /// allocated.
  #[inline]
  pub fn as_ptr(&self) -> *const T {
    self.data()
  }

  #[inline]
  pub fn as_mut_ptr(&mut self) -> *mut T {
    self.data()
  }

  #[inline]
  pub fn as_slice(&self) -> &[T] {
    unsafe { slice::from_raw_parts(self.data(), self.size) }
  }

  #[inline]
  pub fn as_mut_slice(&mut self) -> &mut [T] {
    unsafe { slice::from_raw_parts_mut(self.data(), self.size) }
  }

  #[inline]
  fn data(&self) -> *mut T {
    match &self.block {
      Some(block) => block.as_ptr() as *mut T,
      None => NonNull::dangling().as_ptr(),
    }
  }

  /// Moves the live elements into a fresh block of `new_capacity` slots and
  /// frees the old one.
  fn try_relocate(
    &mut self,
    new_capacity: usize,
  ) -> Result<()> {
    debug_assert!(new_capacity >= self.size);

    let bytes = new_capacity
      .checked_mul(mem::size_of::<T>())
      .filter(|bytes| *bytes <= isize::MAX as usize)
      .ok_or(ArrayError::CapacityOverflow)?;
    let block = AlignedBlock::try_new(bytes, Self::BLOCK_ALIGN)?;

    unsafe {
      ptr::copy_nonoverlapping(self.data(), block.as_ptr() as *mut T, self.size);
    }

    log::debug!(
      "array relocated: capacity {} -> {}, {} live elements of {} bytes",
      self.capacity,
      new_capacity,
      self.size,
      mem::size_of::<T>()
    );

    // The old block goes away here; its contents were moved, not cloned.
    self.block = Some(block);
    self.capacity = new_capacity;
    Ok(())
  }

  /// Makes sure at least `capacity` slots are available.
  ///
  /// The first reservation allocates exactly `capacity` slots; later ones
  /// follow [`growth::next_capacity`]. Never shrinks.
  #[track_caller]
  pub fn reserve(
    &mut self,
    capacity: usize,
  ) {
    or_fatal(self.try_reserve(capacity))
  }

  pub fn try_reserve(
    &mut self,
    capacity: usize,
  ) -> Result<()> {
    if capacity <= self.capacity {
      return Ok(());
    }

    let new_capacity = if self.capacity == 0 {
      capacity
    } else {
      growth::next_capacity(self.capacity, mem::size_of::<T>(), capacity)
    };
    self.try_relocate(new_capacity)
  }

  /// Shrinks the capacity to the current length. An empty array releases
  /// its block entirely.
  #[track_caller]
  pub fn trim(&mut self) {
    or_fatal(self.try_trim())
  }

  pub fn try_trim(&mut self) -> Result<()> {
    if self.capacity == self.size {
      return Ok(());
    }
    if self.size == 0 {
      log::debug!("array trimmed: released capacity {}", self.capacity);
      self.block = None;
      self.capacity = 0;
      return Ok(());
    }
    self.try_relocate(self.size)
  }

  /// Drops every element and frees the block. Capacity returns to zero.
  pub fn clear(&mut self) {
    self.truncate(0);
    if self.block.take().is_some() {
      log::debug!("array cleared: released capacity {}", self.capacity);
    }
    self.capacity = 0;
  }

  /// Drops the elements past `len`. Capacity is left alone.
  pub fn truncate(
    &mut self,
    len: usize,
  ) {
    if len >= self.size {
      return;
    }

    let tail = ptr::slice_from_raw_parts_mut(unsafe { self.data().add(len) }, self.size - len);
    self.size = len;
    unsafe { ptr::drop_in_place(tail) };
  }

  /// Sets the length to `new_len`, filling new slots with clones of
  /// `value`.
  #[track_caller]
  pub fn resize(
    &mut self,
    new_len: usize,
    value: T,
  ) where
    T: Clone,
  {
    self.resize_with(new_len, || value.clone())
  }

  /// Sets the length to `new_len`, filling new slots with `T::default()`.
  #[track_caller]
  pub fn resize_default(
    &mut self,
    new_len: usize,
  ) where
    T: Default,
  {
    self.resize_with(new_len, T::default)
  }

  #[track_caller]
  pub fn resize_with<F>(
    &mut self,
    new_len: usize,
    f: F,
  ) where
    F: FnMut() -> T,
  {
    or_fatal(self.try_resize_with(new_len, f))
  }

  pub fn try_resize_with<F>(
    &mut self,
    new_len: usize,
    mut f: F,
  ) -> Result<()>
  where
    F: FnMut() -> T,
  {
    if new_len <= self.size {
      self.truncate(new_len);
      return Ok(());
    }

    self.try_reserve(new_len)?;
    while self.size < new_len {
      unsafe { self.data().add(self.size).write(f()) };
      self.size += 1;
    }
    Ok(())
  }

  /// Appends `value`.
  #[track_caller]
  pub fn push(
    &mut self,
    value: T,
  ) {
    or_fatal(self.try_push(value))
  }

  /// Appends `value`, or drops it and reports why it could not be stored.
  pub fn try_push(
    &mut self,
    value: T,
  ) -> Result<()> {
    if self.size == self.capacity {
      let needed = self.size.checked_add(1).ok_or(ArrayError::CapacityOverflow)?;
      self.try_reserve(needed)?;
    }

    unsafe { self.data().add(self.size).write(value) };
    self.size += 1;
    Ok(())
  }

  /// Appends a clone of the element at `src`.
  ///
  /// The clone is taken before the array grows, so the source slot may be
  /// freed by the reallocation without harm.
  #[track_caller]
  pub fn push_from_within(
    &mut self,
    src: usize,
  ) where
    T: Clone,
  {
    or_fatal(self.try_push_from_within(src))
  }

  pub fn try_push_from_within(
    &mut self,
    src: usize,
  ) -> Result<()>
  where
    T: Clone,
  {
    let value = self.checked(src)?.clone();
    self.try_push(value)
  }

  /// Removes and returns the last element.
  pub fn pop(&mut self) -> Option<T> {
    if self.size == 0 {
      return None;
    }
    self.size -= 1;
    Some(unsafe { self.data().add(self.size).read() })
  }

  /// Removes the last element.
  ///
  /// # Panics
  ///
  /// Panics if the array is empty.
  #[track_caller]
  pub fn pop_back(&mut self) -> T {
    or_fatal(self.try_pop_back())
  }

  pub fn try_pop_back(&mut self) -> Result<T> {
    self.pop().ok_or(ArrayError::Empty)
  }

  /// Inserts `value` at `idx`, shifting the tail one slot right.
  ///
  /// # Panics
  ///
  /// Panics if `idx > len`.
  #[track_caller]
  pub fn insert(
    &mut self,
    idx: usize,
    value: T,
  ) {
    or_fatal(self.try_insert(idx, value))
  }

  pub fn try_insert(
    &mut self,
    idx: usize,
    value: T,
  ) -> Result<()> {
    self.check_insert_index(idx)?;
    let new_len = self.size.checked_add(1).ok_or(ArrayError::CapacityOverflow)?;
    self.try_reserve(new_len)?;

    unsafe {
      let slot = self.data().add(idx);
      ptr::copy(slot, slot.add(1), self.size - idx);
      slot.write(value);
    }
    self.size = new_len;
    Ok(())
  }

  /// Inserts a clone of the element at `src` so that it ends up at `idx`.
  ///
  /// `idx` is interpreted against the array before insertion.
  #[track_caller]
  pub fn insert_from_within(
    &mut self,
    src: usize,
    idx: usize,
  ) where
    T: Clone,
  {
    or_fatal(self.try_insert_from_within(src, idx))
  }

  pub fn try_insert_from_within(
    &mut self,
    src: usize,
    idx: usize,
  ) -> Result<()>
  where
    T: Clone,
  {
    self.check_insert_index(idx)?;
    let value = self.checked(src)?.clone();
    self.try_insert(idx, value)
  }

  /// Inserts `count` clones of `value` starting at `idx`.
  #[track_caller]
  pub fn insert_n(
    &mut self,
    idx: usize,
    count: usize,
    value: T,
  ) where
    T: Clone,
  {
    or_fatal(self.try_insert_n(idx, count, value))
  }

  pub fn try_insert_n(
    &mut self,
    idx: usize,
    count: usize,
    value: T,
  ) -> Result<()>
  where
    T: Clone,
  {
    self.try_insert_with(idx, count, |_| value.clone())
  }

  /// Inserts clones of `values` starting at `idx`.
  #[track_caller]
  pub fn insert_slice(
    &mut self,
    idx: usize,
    values: &[T],
  ) where
    T: Clone,
  {
    or_fatal(self.try_insert_slice(idx, values))
  }

  pub fn try_insert_slice(
    &mut self,
    idx: usize,
    values: &[T],
  ) -> Result<()>
  where
    T: Clone,
  {
    self.try_insert_with(idx, values.len(), |i| values[i].clone())
  }

  /// Opens a gap of `count` slots at `idx` and fills it with `f(0..count)`.
  ///
  /// While the gap is being filled the shifted tail is not counted in
  /// `size`: if `f` panics the tail leaks but nothing is dropped twice.
  fn try_insert_with<F>(
    &mut self,
    idx: usize,
    count: usize,
    mut f: F,
  ) -> Result<()>
  where
    F: FnMut(usize) -> T,
  {
    self.check_insert_index(idx)?;
    if count == 0 {
      return Ok(());
    }

    let old_len = self.size;
    let new_len = old_len.checked_add(count).ok_or(ArrayError::CapacityOverflow)?;
    self.try_reserve(new_len)?;

    unsafe {
      let gap = self.data().add(idx);
      ptr::copy(gap, gap.add(count), old_len - idx);

      self.size = idx;
      for i in 0..count {
        gap.add(i).write(f(i));
        self.size += 1;
      }
    }
    self.size = new_len;
    Ok(())
  }

  /// Removes the element at `idx`, shifting the tail one slot left.
  #[track_caller]
  pub fn remove(
    &mut self,
    idx: usize,
  ) -> T {
    or_fatal(self.try_remove(idx))
  }

  pub fn try_remove(
    &mut self,
    idx: usize,
  ) -> Result<T> {
    self.checked(idx)?;

    unsafe {
      let slot = self.data().add(idx);
      let value = slot.read();
      ptr::copy(slot.add(1), slot, self.size - idx - 1);
      self.size -= 1;
      Ok(value)
    }
  }

  /// Drops `count` elements starting at `idx` and closes the gap.
  ///
  /// # Panics
  ///
  /// Panics if `count` is zero or the range runs past the end.
  #[track_caller]
  pub fn remove_range(
    &mut self,
    idx: usize,
    count: usize,
  ) {
    or_fatal(self.try_remove_range(idx, count))
  }

  pub fn try_remove_range(
    &mut self,
    idx: usize,
    count: usize,
  ) -> Result<()> {
    let in_bounds = idx.checked_add(count).is_some_and(|end| end <= self.size);
    if count == 0 || !in_bounds {
      return Err(ArrayError::InvalidRange {
        start: idx,
        count,
        len: self.size,
      });
    }

    let old_len = self.size;
    unsafe {
      let start = self.data().add(idx);
      self.size = idx;
      ptr::drop_in_place(ptr::slice_from_raw_parts_mut(start, count));
      ptr::copy(start.add(count), start, old_len - idx - count);
    }
    self.size = old_len - count;
    Ok(())
  }

  /// Removes the element at `idx` and moves the last element into its slot.
  /// O(1), does not preserve order.
  #[track_caller]
  pub fn unsorted_remove(
    &mut self,
    idx: usize,
  ) -> T {
    or_fatal(self.try_unsorted_remove(idx))
  }

  pub fn try_unsorted_remove(
    &mut self,
    idx: usize,
  ) -> Result<T> {
    self.checked(idx)?;

    let last = self.size - 1;
    unsafe {
      let slot = self.data().add(idx);
      let value = slot.read();
      if idx != last {
        ptr::copy_nonoverlapping(self.data().add(last), slot, 1);
      }
      self.size = last;
      Ok(value)
    }
  }

  fn checked(
    &self,
    idx: usize,
  ) -> Result<&T> {
    self
      .as_slice()
      .get(idx)
      .ok_or(ArrayError::IndexOutOfBounds {
        index: idx,
        len: self.size,
      })
  }

  fn check_insert_index(
    &self,
    idx: usize,
  ) -> Result<()> {
    if idx > self.size {
      return Err(ArrayError::IndexOutOfBounds {
        index: idx,
        len: self.size,
      });
    }
    Ok(())
  }
}

impl<T, const ALIGN: usize> Drop for Array<T, ALIGN> {
  fn drop(&mut self) {
    unsafe { ptr::drop_in_place(self.as_mut_slice()) }
  }
}

impl<T, const ALIGN: usize> Default for Array<T, ALIGN> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Clone, const ALIGN: usize> Clone for Array<T, ALIGN> {
  fn clone(&self) -> Self {
    let mut array = Self::with_capacity(self.size);
    for value in self.iter() {
      array.push(value.clone());
    }
    array
  }

  /// Reuses the existing elements through `T::clone_from` where both arrays
  /// overlap.
  fn clone_from(
    &mut self,
    source: &Self,
  ) {
    self.truncate(source.size);

    let (head, tail) = source.as_slice().split_at(self.size);
    for (dst, src) in self.iter_mut().zip(head) {
      dst.clone_from(src);
    }

    self.reserve(source.size);
    for value in tail {
      self.push(value.clone());
    }
  }
}

impl<T, const ALIGN: usize> Deref for Array<T, ALIGN> {
  type Target = [T];

  fn deref(&self) -> &[T] {
    self.as_slice()
  }
}

impl<T, const ALIGN: usize> DerefMut for Array<T, ALIGN> {
  fn deref_mut(&mut self) -> &mut [T] {
    self.as_mut_slice()
  }
}

impl<T, const ALIGN: usize> AsRef<[T]> for Array<T, ALIGN> {
  fn as_ref(&self) -> &[T] {
    self.as_slice()
  }
}

impl<T, I: SliceIndex<[T]>, const ALIGN: usize> Index<I> for Array<T, ALIGN> {
  type Output = I::Output;

  #[inline]
  fn index(
    &self,
    index: I,
  ) -> &Self::Output {
    Index::index(self.as_slice(), index)
  }
}

impl<T, I: SliceIndex<[T]>, const ALIGN: usize> IndexMut<I> for Array<T, ALIGN> {
  #[inline]
  fn index_mut(
    &mut self,
    index: I,
  ) -> &mut Self::Output {
    IndexMut::index_mut(self.as_mut_slice(), index)
  }
}

impl<T: fmt::Debug, const ALIGN: usize> fmt::Debug for Array<T, ALIGN> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<T: PartialEq, const ALIGN: usize> PartialEq for Array<T, ALIGN> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl<T: Eq, const ALIGN: usize> Eq for Array<T, ALIGN> {}

impl<T: PartialEq, const ALIGN: usize> PartialEq<[T]> for Array<T, ALIGN> {
  fn eq(
    &self,
    other: &[T],
  ) -> bool {
    self.as_slice() == other
  }
}

impl<T, const ALIGN: usize> Extend<T> for Array<T, ALIGN> {
  fn extend<I: IntoIterator<Item = T>>(
    &mut self,
    iter: I,
  ) {
    let iter = iter.into_iter();
    let (lower, _) = iter.size_hint();
    self.reserve(self.size.saturating_add(lower));
    for value in iter {
      self.push(value);
    }
  }
}

impl<T, const ALIGN: usize> FromIterator<T> for Array<T, ALIGN> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut array = Self::new();
    array.extend(iter);
    array
  }
}

impl<'a, T, const ALIGN: usize> IntoIterator for &'a Array<T, ALIGN> {
  type Item = &'a T;
  type IntoIter = slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'a, T, const ALIGN: usize> IntoIterator for &'a mut Array<T, ALIGN> {
  type Item = &'a mut T;
  type IntoIter = slice::IterMut<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter_mut()
  }
}

impl<T, const ALIGN: usize> IntoIterator for Array<T, ALIGN> {
  type Item = T;
  type IntoIter = IntoIter<T>;

  fn into_iter(mut self) -> Self::IntoIter {
    let end = self.size;
    self.size = 0;
    self.capacity = 0;
    IntoIter {
      block: self.block.take(),
      start: 0,
      end,
      _marker: PhantomData,
    }
  }
}

/// Owning iterator over the elements of an [`Array`].
///
/// Elements not yielded are dropped together with the iterator.
pub struct IntoIter<T> {
  block: Option<AlignedBlock>,
  start: usize,
  end: usize,
  _marker: PhantomData<T>,
}

impl<T> IntoIter<T> {
  fn data(&self) -> *mut T {
    match &self.block {
      Some(block) => block.as_ptr() as *mut T,
      None => NonNull::dangling().as_ptr(),
    }
  }

  /// Elements not yet yielded.
  pub fn as_slice(&self) -> &[T] {
    unsafe { slice::from_raw_parts(self.data().add(self.start), self.end - self.start) }
  }
}

impl<T> Iterator for IntoIter<T> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    if self.start == self.end {
      return None;
    }
    let value = unsafe { self.data().add(self.start).read() };
    self.start += 1;
    Some(value)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = self.end - self.start;
    (remaining, Some(remaining))
  }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
  fn next_back(&mut self) -> Option<T> {
    if self.start == self.end {
      return None;
    }
    self.end -= 1;
    Some(unsafe { self.data().add(self.end).read() })
  }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
  fn drop(&mut self) {
    let remaining = ptr::slice_from_raw_parts_mut(
      unsafe { self.data().add(self.start) },
      self.end - self.start,
    );
    self.start = self.end;
    unsafe { ptr::drop_in_place(remaining) };
  }
}
