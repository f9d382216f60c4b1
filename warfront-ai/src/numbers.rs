//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the u32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).round();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Convert u32 to f64; exact for every u32.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    f64::from(value)
}

/// Ratio of two army counts as f64, treating a zero divisor as one.
#[must_use]
pub fn army_ratio(numerator: u32, divisor: u32) -> f64 {
    u32_to_f64(numerator) / u32_to_f64(divisor.max(1))
}

/// Convert a usize count to u32, saturating at `u32::MAX`.
#[must_use]
pub fn usize_to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f64_to_u32(1.6), 2);
        assert_eq!(round_f64_to_u32(5.4), 5);
        assert_eq!(round_f64_to_u32(f64::NAN), 0);
        assert_eq!(round_f64_to_u32(-3.0), 0);
        assert_eq!(round_f64_to_u32(f64::from(u32::MAX) * 2.0), u32::MAX);
    }

    #[test]
    fn army_ratio_guards_zero_divisor() {
        assert!((army_ratio(9, 3) - 3.0).abs() < f64::EPSILON);
        assert!((army_ratio(4, 0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn usize_conversion_saturates() {
        assert_eq!(usize_to_u32(7), 7);
        if usize::BITS > 32 {
            assert_eq!(usize_to_u32(usize::MAX), u32::MAX);
        }
    }
}
