//! Progress arithmetic.

/// `position / duration` clamped to `[0, 1]`.
///
/// Returns 0 when the duration is missing, zero, negative or not finite,
/// and when the position is not finite.
pub fn progress_fraction(position: f64, duration: Option<f64>) -> f64 {
    let Some(duration) = duration else {
        return 0.0;
    };
    if !duration.is_finite() || duration <= 0.0 || !position.is_finite() {
        return 0.0;
    }
    (position / duration).clamp(0.0, 1.0)
}

/// Integer percentage in `[0, 100]`, rounded down like a seek bar.
pub fn to_percent(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division_guard() {
        assert_eq!(progress_fraction(10.0, None), 0.0);
        assert_eq!(progress_fraction(10.0, Some(0.0)), 0.0);
        assert_eq!(progress_fraction(10.0, Some(f64::NAN)), 0.0);
        assert_eq!(progress_fraction(f64::INFINITY, Some(10.0)), 0.0);
    }

    #[test]
    fn test_fraction_is_clamped() {
        assert_eq!(progress_fraction(60.0, Some(120.0)), 0.5);
        assert_eq!(progress_fraction(130.0, Some(120.0)), 1.0);
        assert_eq!(progress_fraction(-1.0, Some(120.0)), 0.0);
    }

    #[test]
    fn test_fraction_always_in_unit_range() {
        for position in [0.0, 0.1, 33.3, 59.99, 119.0, 120.0] {
            for duration in [0.5, 1.0, 60.0, 120.0, 7200.0] {
                if position <= duration {
                    let p = progress_fraction(position, Some(duration));
                    assert!((0.0..=1.0).contains(&p));
                }
            }
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(to_percent(0.0), 0);
        assert_eq!(to_percent(0.499), 49);
        assert_eq!(to_percent(1.0), 100);
        assert_eq!(to_percent(2.0), 100);
        assert_eq!(to_percent(f64::NAN), 0);
    }
}
