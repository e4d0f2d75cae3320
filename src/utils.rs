//! Sample/time conversion helpers.

/// Converts a sample count into seconds at the given sample rate.
///
/// This is the exact quotient `samples / sample_rate`, so a buffer's duration
/// always equals its length divided by its rate.
///
/// # Examples
/// ```
/// use audio_buffer::samples_to_seconds;
///
/// assert_eq!(samples_to_seconds(441, 44_100.0), 0.01);
/// ```
#[inline]
pub fn samples_to_seconds(samples: usize, sample_rate: f64) -> f64 {
    samples as f64 / sample_rate
}

/// Relative distance from a whole number within which a sample count is
/// treated as that whole number.
const SAMPLE_SNAP_TOLERANCE: f64 = 1e-9;

/// Converts a duration in seconds into a whole number of samples, rounding down.
///
/// Products that land within a relative `1e-9` of a whole number snap to it,
/// so `0.29 s` at 100 Hz is 29 samples even though `0.29 * 100.0` is
/// `28.999999999999996`. Negative or non-finite products yield zero.
///
/// # Examples
/// ```
/// use audio_buffer::seconds_to_samples;
///
/// assert_eq!(seconds_to_samples(0.29, 100.0), 29);
/// assert_eq!(seconds_to_samples(0.295, 100.0), 29);
/// ```
pub fn seconds_to_samples(seconds: f64, sample_rate: f64) -> usize {
    let product = seconds * sample_rate;
    if !product.is_finite() || product <= 0.0 {
        return 0;
    }
    let nearest = product.round();
    let samples = if (product - nearest).abs() <= nearest.max(1.0) * SAMPLE_SNAP_TOLERANCE {
        nearest
    } else {
        product.floor()
    };
    samples as usize
}
