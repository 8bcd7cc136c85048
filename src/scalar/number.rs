//! Finite-number check and range clamping.

/// Reject non-finite values and clamp the rest into `[min, max]`.
///
/// Either bound may be omitted. If `min > max`, `max` wins. NaN bounds are
/// ignored.
///
/// # Example
///
/// ```
/// use input_guard::clamp_finite;
///
/// assert_eq!(clamp_finite(Some(5.0), Some(10.0), Some(100.0)), Some(10.0));
/// assert_eq!(clamp_finite(Some(f64::INFINITY), None, None), None);
/// ```
pub fn clamp_finite(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> Option<f64> {
    let mut value = value.filter(|v| v.is_finite())?;

    if let Some(min) = min {
        if value < min {
            value = min;
        }
    }
    if let Some(max) = max {
        if value > max {
            value = max;
        }
    }

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_values_pass_unclamped_without_bounds() {
        assert_eq!(clamp_finite(Some(456.0), None, None), Some(456.0));
        assert_eq!(clamp_finite(Some(-0.5), None, None), Some(-0.5));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(clamp_finite(Some(f64::NAN), None, None), None);
        assert_eq!(clamp_finite(Some(f64::INFINITY), Some(0.0), Some(1.0)), None);
        assert_eq!(clamp_finite(Some(f64::NEG_INFINITY), None, None), None);
        assert_eq!(clamp_finite(None, Some(0.0), None), None);
    }

    #[test]
    fn clamps_into_inclusive_range() {
        assert_eq!(clamp_finite(Some(5.0), Some(10.0), Some(100.0)), Some(10.0));
        assert_eq!(clamp_finite(Some(150.0), Some(10.0), Some(100.0)), Some(100.0));
        assert_eq!(clamp_finite(Some(50.0), Some(10.0), Some(100.0)), Some(50.0));
        assert_eq!(clamp_finite(Some(10.0), Some(10.0), Some(100.0)), Some(10.0));
    }

    #[test]
    fn single_bounds() {
        assert_eq!(clamp_finite(Some(-3.0), Some(0.0), None), Some(0.0));
        assert_eq!(clamp_finite(Some(3.0), None, Some(1.0)), Some(1.0));
    }

    #[test]
    fn inverted_bounds_do_not_panic() {
        assert_eq!(clamp_finite(Some(5.0), Some(10.0), Some(1.0)), Some(1.0));
    }

    #[test]
    fn nan_bounds_are_ignored() {
        assert_eq!(clamp_finite(Some(5.0), Some(f64::NAN), Some(f64::NAN)), Some(5.0));
    }
}
