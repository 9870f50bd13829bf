use crate::time::{self, Time};

/// Measures elapsed time against a monotonic clock. Starts running as soon
/// as it is constructed.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
  start: Time,
}

impl Timer {
  pub fn new() -> Self {
    Self {
      start: current_time(),
    }
  }

  /// Time since construction or the last [`Timer::restart`].
  pub fn elapsed(&self) -> Time {
    current_time() - self.start
  }

  /// Restarts the timer and returns the time elapsed until now.
  pub fn restart(&mut self) -> Time {
    let now = current_time();
    let elapsed = now - self.start;
    self.start = now;
    elapsed
  }
}

impl Default for Timer {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(unix)]
fn current_time() -> Time {
  let mut now = libc::timespec {
    tv_sec: 0,
    tv_nsec: 0,
  };

  // CLOCK_MONOTONIC always exists and `now` is a valid out pointer, so the
  // call cannot fail.
  let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut now) };
  debug_assert_eq!(rc, 0);

  time::microseconds(now.tv_sec as i64 * 1_000_000 + now.tv_nsec as i64 / 1_000)
}

#[cfg(not(unix))]
fn current_time() -> Time {
  use std::{sync::OnceLock, time::Instant};

  static EPOCH: OnceLock<Instant> = OnceLock::new();
  Time::from(EPOCH.get_or_init(Instant::now).elapsed())
}

#[cfg(test)]
mod tests {
  use std::{thread, time::Duration};

  use super::*;

  #[test]
  fn test_elapsed_is_monotonic() {
    let timer = Timer::new();
    let first = timer.elapsed();
    let second = timer.elapsed();

    assert!(first >= Time::ZERO);
    assert!(second >= first);
  }

  #[test]
  fn test_elapsed_tracks_sleep() {
    let timer = Timer::new();
    thread::sleep(Duration::from_millis(20));
    assert!(timer.elapsed() >= time::milliseconds(20.0));
  }

  #[test]
  fn test_restart_resets_start() {
    let mut timer = Timer::new();
    thread::sleep(Duration::from_millis(10));

    let lap = timer.restart();
    assert!(lap >= time::milliseconds(10.0));
    assert!(timer.elapsed() < lap + time::seconds(5.0));
  }
}
