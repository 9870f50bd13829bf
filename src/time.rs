use std::{
  fmt,
  ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
  time::Duration,
};

/// A time span with microsecond precision. May be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
  microseconds: i64,
}

impl Time {
  pub const ZERO: Time = Time { microseconds: 0 };

  #[inline]
  pub fn as_seconds(self) -> f32 {
    self.microseconds as f32 / 1_000_000.0
  }

  #[inline]
  pub fn as_milliseconds(self) -> f32 {
    self.microseconds as f32 / 1_000.0
  }

  #[inline]
  pub fn as_microseconds(self) -> i64 {
    self.microseconds
  }
}

pub fn seconds(amount: f32) -> Time {
  Time {
    microseconds: (f64::from(amount) * 1_000_000.0) as i64,
  }
}

/// Fractions of a millisecond are truncated.
pub fn milliseconds(amount: f32) -> Time {
  Time {
    microseconds: (amount as i64) * 1_000,
  }
}

pub fn microseconds(amount: i64) -> Time {
  Time {
    microseconds: amount,
  }
}

impl From<Duration> for Time {
  /// Saturates at `i64::MAX` microseconds.
  fn from(duration: Duration) -> Self {
    microseconds(i64::try_from(duration.as_micros()).unwrap_or(i64::MAX))
  }
}

impl fmt::Display for Time {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "{}us", self.microseconds)
  }
}

impl Neg for Time {
  type Output = Time;

  fn neg(self) -> Time {
    microseconds(-self.microseconds)
  }
}

impl Add for Time {
  type Output = Time;

  fn add(
    self,
    rhs: Time,
  ) -> Time {
    microseconds(self.microseconds + rhs.microseconds)
  }
}

impl Sub for Time {
  type Output = Time;

  fn sub(
    self,
    rhs: Time,
  ) -> Time {
    microseconds(self.microseconds - rhs.microseconds)
  }
}

impl Mul<i64> for Time {
  type Output = Time;

  fn mul(
    self,
    rhs: i64,
  ) -> Time {
    microseconds(self.microseconds * rhs)
  }
}

impl Mul<f32> for Time {
  type Output = Time;

  fn mul(
    self,
    rhs: f32,
  ) -> Time {
    microseconds((self.microseconds as f64 * f64::from(rhs)) as i64)
  }
}

impl Mul<Time> for i64 {
  type Output = Time;

  fn mul(
    self,
    rhs: Time,
  ) -> Time {
    rhs * self
  }
}

impl Mul<Time> for f32 {
  type Output = Time;

  fn mul(
    self,
    rhs: Time,
  ) -> Time {
    rhs * self
  }
}

impl Div<i64> for Time {
  type Output = Time;

  fn div(
    self,
    rhs: i64,
  ) -> Time {
    microseconds(self.microseconds / rhs)
  }
}

impl Div<f32> for Time {
  type Output = Time;

  fn div(
    self,
    rhs: f32,
  ) -> Time {
    microseconds((self.microseconds as f64 / f64::from(rhs)) as i64)
  }
}

macro_rules! assign_op {
  ($trait:ident, $method:ident, $op:tt, $rhs:ty) => {
    impl $trait<$rhs> for Time {
      fn $method(
        &mut self,
        rhs: $rhs,
      ) {
        *self = *self $op rhs;
      }
    }
  };
}

assign_op!(AddAssign, add_assign, +, Time);
assign_op!(SubAssign, sub_assign, -, Time);
assign_op!(MulAssign, mul_assign, *, i64);
assign_op!(MulAssign, mul_assign, *, f32);
assign_op!(DivAssign, div_assign, /, i64);
assign_op!(DivAssign, div_assign, /, f32);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_conversions() {
    assert_eq!(seconds(1.5).as_microseconds(), 1_500_000);
    assert_eq!(milliseconds(2.0).as_microseconds(), 2_000);
    assert_eq!(milliseconds(2.9).as_microseconds(), 2_000);
    assert_eq!(microseconds(42).as_microseconds(), 42);

    assert_eq!(microseconds(250_000).as_seconds(), 0.25);
    assert_eq!(microseconds(1_500).as_milliseconds(), 1.5);
    assert_eq!(Time::default(), Time::ZERO);
  }

  #[test]
  fn test_arithmetic() {
    let a = milliseconds(10.0);
    let b = milliseconds(4.0);

    assert_eq!(a + b, milliseconds(14.0));
    assert_eq!(b - a, milliseconds(-6.0));
    assert_eq!(-a, microseconds(-10_000));
    assert_eq!(a * 3i64, milliseconds(30.0));
    assert_eq!(3i64 * a, milliseconds(30.0));
    assert_eq!(a * 0.5f32, milliseconds(5.0));
    assert_eq!(0.5f32 * a, milliseconds(5.0));
    assert_eq!(a / 2i64, milliseconds(5.0));
    assert_eq!(a / 4.0f32, microseconds(2_500));

    let mut t = a;
    t += b;
    t -= microseconds(1_000);
    t *= 2i64;
    t /= 13i64;
    assert_eq!(t, milliseconds(2.0));
  }

  #[test]
  fn test_ordering() {
    assert!(microseconds(-1) < Time::ZERO);
    assert!(seconds(1.0) > milliseconds(999.0));
    assert!(seconds(1.0) >= milliseconds(1000.0));
  }

  #[test]
  fn test_from_duration() {
    assert_eq!(Time::from(Duration::from_millis(3)), milliseconds(3.0));
    assert_eq!(Time::from(Duration::MAX).as_microseconds(), i64::MAX);
  }

  #[test]
  fn test_float_scaling_keeps_microseconds() {
    let long = microseconds(123_456_789);

    assert_eq!(long * 2.0f32, microseconds(246_913_578));
    assert_eq!(long / 0.5f32, microseconds(246_913_578));
    assert_eq!(long * 1.0f32, long);
  }
}
