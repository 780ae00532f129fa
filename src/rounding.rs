//! Numeric rounding policy shared by the engine and the 1RM estimator.

/// Round `value` to the nearest multiple of `increment`.
///
/// A non-positive or non-finite increment leaves the value untouched.
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
  if !(increment.is_finite() && increment > 0.0) {
    return value;
  }
  (value / increment).round() * increment
}

/// Round to one decimal place (0.1 kg resolution)
pub fn round_to_tenth(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

/// Round to the nearest whole number, halves going up for positive values
pub fn round_half_up(value: f64) -> u32 {
  if value <= 0.0 {
    return 0;
  }
  value.round() as u32
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_round_to_increment_nearest_multiple() {
    assert_eq!(round_to_increment(81.0, 2.5), 80.0);
    assert_eq!(round_to_increment(81.3, 2.5), 82.5);
    assert_eq!(round_to_increment(96.25, 1.25), 96.25);
    assert_eq!(round_to_increment(23.9, 2.0), 24.0);
  }

  #[test]
  fn test_round_to_increment_midpoint_rounds_up() {
    // 83.75 sits exactly between 82.5 and 85
    assert_eq!(round_to_increment(83.75, 2.5), 85.0);
  }

  #[test]
  fn test_non_positive_increment_is_noop() {
    assert_eq!(round_to_increment(81.3, 0.0), 81.3);
    assert_eq!(round_to_increment(81.3, -2.5), 81.3);
    assert_eq!(round_to_increment(81.3, f64::NAN), 81.3);
  }

  #[test]
  fn test_round_to_tenth() {
    assert_eq!(round_to_tenth(101.333_333), 101.3);
    assert_eq!(round_to_tenth(116.666_666), 116.7);
  }

  #[test]
  fn test_round_half_up() {
    assert_eq!(round_half_up(9.5), 10);
    assert_eq!(round_half_up(8.49), 8);
    assert_eq!(round_half_up(0.0), 0);
  }
}
