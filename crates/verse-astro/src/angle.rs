//! Degree-based angle helpers shared by the resolvers.

/// Wrap an angle into `[0, 360)`.
pub fn normalize_360(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wrap an angle into `(-180, 180]`.
pub fn normalize_180(degrees: f64) -> f64 {
    let wrapped = normalize_360(degrees);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Angle still to travel, in the direction of increasing time, to get from
/// `current` to `target`. Always in `[0, 360)`.
pub fn angular_distance_forward(current: f64, target: f64) -> f64 {
    normalize_360(target - current)
}

/// Fractional part in `[0, 1)`, also for negative inputs.
pub fn fract_positive(value: f64) -> f64 {
    let f = value.rem_euclid(1.0);
    if f >= 1.0 { 0.0 } else { f }
}

/// `asin` in degrees with the argument clamped to `[-1, 1]`.
pub(crate) fn asin_deg(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).asin().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_360_wraps_both_directions() {
        assert!((normalize_360(370.0) - 10.0).abs() < 1e-12);
        assert!((normalize_360(-10.0) - 350.0).abs() < 1e-12);
        assert_eq!(normalize_360(-1e-20), 0.0);
        assert_eq!(normalize_360(720.0), 0.0);
    }

    #[test]
    fn test_normalize_180_range() {
        assert!((normalize_180(190.0) + 170.0).abs() < 1e-12);
        assert!((normalize_180(-190.0) - 170.0).abs() < 1e-12);
        assert!((normalize_180(180.0) - 180.0).abs() < 1e-12);
        for i in -1000..1000 {
            let a = normalize_180(i as f64 * 1.37);
            assert!(a > -180.0 && a <= 180.0, "{a}");
        }
    }

    #[test]
    fn test_forward_distance_wraps_at_boundary() {
        assert!((angular_distance_forward(170.0, -170.0) - 20.0).abs() < 1e-12);
        assert!((angular_distance_forward(-170.0, 170.0) - 340.0).abs() < 1e-12);
        assert_eq!(angular_distance_forward(42.0, 42.0), 0.0);
    }

    #[test]
    fn test_fract_positive_for_negative_values() {
        assert!((fract_positive(-0.25) - 0.75).abs() < 1e-12);
        assert!((fract_positive(3.5) - 0.5).abs() < 1e-12);
    }
}
