use std::io::Read;

use rarray::{AlignedBlock, Array, Timer, is_aligned};

/// Waits until the user presses ENTER when the demo runs with `--step`.
/// Handy for watching the process with `pmap` or `gdb` between stages.
fn block_until_enter_pressed(step: bool) {
  if !step {
    return;
  }
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn print_array<T, const ALIGN: usize>(
  label: &str,
  array: &Array<T, ALIGN>,
) {
  println!(
    "[{}] size = {}, capacity = {}, data = {:?}",
    label,
    array.len(),
    array.capacity(),
    array.as_ptr(),
  );
}

fn main() {
  // RUST_LOG=trace shows every block allocation, debug every reallocation.
  env_logger::init();

  let step = std::env::args().any(|arg| arg == "--step");
  let timer = Timer::new();

  // --------------------------------------------------------------------
  // 1) A raw aligned block, the building unit of every array.
  // --------------------------------------------------------------------
  let block = AlignedBlock::new(100, 64);
  println!("\n[1] Allocate 100 bytes aligned to 64");
  println!(
    "[1] Allocated {} bytes, alignment = {}, address = {:?}",
    block.size(),
    block.alignment(),
    block.as_ptr(),
  );
  println!(
    "[1] Address aligned to 64? {}",
    is_aligned!(block.as_ptr() as usize, 64)
  );
  drop(block);

  block_until_enter_pressed(step);

  // --------------------------------------------------------------------
  // 2) Push values one at a time and watch the capacity tiers.
  // --------------------------------------------------------------------
  let mut numbers: Array<u32> = Array::new();
  let mut capacity = numbers.capacity();
  println!("\n[2] Push 0..100_000");
  for i in 0..100_000 {
    numbers.push(i);
    if numbers.capacity() != capacity {
      capacity = numbers.capacity();
      print_array("2", &numbers);
    }
  }

  block_until_enter_pressed(step);

  // --------------------------------------------------------------------
  // 3) Insert and remove in the middle.
  // --------------------------------------------------------------------
  let mut small: Array<i32, 32> = (0..10).collect();
  print_array("3", &small);
  small.insert(2, 42);
  small.insert_n(0, 3, -1);
  small.remove(5);
  small.remove_range(8, 2);
  small.unsorted_remove(0);
  println!("[3] {:?}", small);

  block_until_enter_pressed(step);

  // --------------------------------------------------------------------
  // 4) Duplicate an element while the array is full.
  //    The clone is taken before the block moves.
  // --------------------------------------------------------------------
  let mut full: Array<String> = Array::with_capacity(2);
  full.push("five".to_string());
  full.push("seven".to_string());
  print_array("4", &full);
  full.push_from_within(0);
  print_array("4", &full);
  println!("[4] {:?}", full);

  block_until_enter_pressed(step);

  // --------------------------------------------------------------------
  // 5) Give memory back.
  // --------------------------------------------------------------------
  numbers.truncate(10);
  print_array("5 truncate", &numbers);
  numbers.trim();
  print_array("5 trim", &numbers);
  numbers.clear();
  print_array("5 clear", &numbers);

  println!("\n[6] End of example, took {}.", timer.elapsed());
}
