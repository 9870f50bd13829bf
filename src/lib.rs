//! # rarray - An Aligned Growable Array Library
//!
//! This crate provides [`Array`], a generic growable array that manages its
//! own aligned heap blocks, along with the small [`Time`]/[`Timer`] pair
//! used to measure elapsed time.
//!
//! ## Overview
//!
//! An array owns at most one heap block at a time. The block is split into
//! live slots, holding constructed elements, and raw slots waiting to be
//! filled:
//!
//! ```text
//!   Array<T, ALIGN>:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         ALIGNED BLOCK                                │
//!   │                                                                      │
//!   │   ┌─────┬─────┬─────┬─────┬───────────────────────────────────────┐  │
//!   │   │ T0  │ T1  │ T2  │ T3  │          raw, uninitialized           │  │
//!   │   └─────┴─────┴─────┴─────┴───────────────────────────────────────┘  │
//!   │   ▲                       ▲                                     ▲    │
//!   │   │                       │                                     │    │
//!   │  data                   size                               capacity  │
//!   │  (ALIGN)                                                             │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rarray
//!   ├── align      - Alignment macros (align_to!, is_aligned!)
//!   ├── header     - Hidden per-block bookkeeping (internal)
//!   ├── block      - AlignedBlock over libc malloc/free
//!   ├── growth     - Tiered capacity growth policy
//!   ├── array      - Array<T, ALIGN> and its owning iterator
//!   ├── error      - ArrayError for the try_* surface
//!   ├── time       - Time, a signed microsecond span
//!   └── timer      - Timer over the monotonic clock
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rarray::Array;
//!
//! let mut array: Array<i32> = Array::new();
//! for i in 0..10 {
//!   array.push(i);
//! }
//!
//! assert_eq!(array[3], 3);
//! array.remove(2);
//! assert_eq!(array.as_slice(), &[0, 1, 3, 4, 5, 6, 7, 8, 9]);
//!
//! // Duplicating one of the array's own elements is safe even when it
//! // forces the block to move.
//! array.push_from_within(0);
//! assert_eq!(array[9], 0);
//! ```
//!
//! ## How It Works
//!
//! Each block is requested from `malloc` with enough slack to slide the
//! start up to the requested alignment, plus room for a small header that
//! remembers the original pointer:
//!
//! ```text
//!   Single Block:
//!   ┌─────────┬───────────────────────┬────────────────────────────────┐
//!   │ padding │    Block Header       │         Element Slots          │
//!   │         │  ┌─────────────────┐  │                                │
//!   │         │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │         │  │ raw: malloc ptr │  │  │     N bytes usable       │  │
//!   │         │  └─────────────────┘  │  └──────────────────────────┘  │
//!   └─────────┴───────────────────────┴────────────────────────────────┘
//!                                     ▲
//!                                     └── aligned pointer used by Array
//! ```
//!
//! When an array runs out of room it allocates a bigger block, moves the
//! live elements across bit for bit and frees the old block. The new
//! capacity depends on how big the block already is:
//!
//! ```text
//!   block bytes        growth
//!   ≤ 64 000           x3
//!   ≤ 400 000          x2
//!   larger             x1.5
//! ```
//!
//! ## Errors
//!
//! Out of bounds indices, popping an empty array and malformed ranges are
//! programming errors: the plain methods panic. Every such method has a
//! `try_*` twin returning [`ArrayError`] for callers that cannot afford to
//! unwind. Heap exhaustion aborts through [`std::alloc::handle_alloc_error`]
//! unless the `try_*` form is used.
//!
//! ## Logging
//!
//! Block allocations are reported at `trace` level and array reallocations
//! at `debug` level through the [`log`] facade.
//!
//! ## Limitations
//!
//! - **Not synchronized**: an array may be sent or shared like a `Vec`, but
//!   mutation needs `&mut` access
//! - **No implicit shrink**: capacity only drops on [`Array::trim`] and
//!   [`Array::clear`]
//! - **Unix clock**: [`Timer`] reads `CLOCK_MONOTONIC` on unix and falls
//!   back to `std::time::Instant` elsewhere

pub mod align;
mod array;
mod block;
mod error;
pub mod growth;
mod header;
pub mod time;
mod timer;

pub use array::{Array, IntoIter, WORD_ALIGNMENT};
pub use block::AlignedBlock;
pub use error::{ArrayError, Result};
pub use time::Time;
pub use timer::Timer;
