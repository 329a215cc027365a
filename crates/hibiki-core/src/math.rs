//! Small numeric helpers shared by the reverb primitives.
//!
//! Everything here is allocation-free and `no_std` friendly.
//!
//! - [`flush_denormal`] - zero out values that would decay into subnormals
//! - [`ms_to_samples`] - time conversion
//! - [`rt60_gain`] - feedback gain for a target decay time
//! - [`clamp_cutoff`] - keep filter cutoffs inside `(0, nyquist)`

use libm::powf;

/// Flush tiny values to zero.
///
/// Feedback networks decay toward zero forever; once a value reaches the
/// subnormal range most CPUs slow down by one or two orders of magnitude.
/// Anything below 1e-20 is replaced with an exact zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Convert milliseconds to samples at the given sample rate.
///
/// # Example
/// ```rust
/// use hibiki_core::ms_to_samples;
///
/// assert_eq!(ms_to_samples(10.0, 48000.0), 480.0);
/// ```
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * 0.001 * sample_rate
}

/// Feedback gain that makes a recirculating delay of `delay_seconds`
/// decay by 60 dB in `rt60_seconds`.
///
/// `g = 10^(-3 * delay / rt60)`. Non-positive decay times return `0.0`
/// (no recirculation).
///
/// # Example
/// ```rust
/// use hibiki_core::rt60_gain;
///
/// // A delay equal to the decay time loses exactly 60 dB per pass.
/// assert!((rt60_gain(1.0, 1.0) - 0.001).abs() < 1e-6);
/// ```
#[inline]
pub fn rt60_gain(delay_seconds: f32, rt60_seconds: f32) -> f32 {
    if rt60_seconds <= 0.0 {
        return 0.0;
    }
    powf(10.0, -3.0 * delay_seconds / rt60_seconds)
}

/// Clamp a filter cutoff to a usable range for the given sample rate.
///
/// Returns a value in `[0, 0.49 * sample_rate]`. NaN maps to `0.0`.
#[inline]
pub fn clamp_cutoff(freq_hz: f32, sample_rate: f32) -> f32 {
    if freq_hz.is_nan() {
        return 0.0;
    }
    freq_hz.clamp(0.0, sample_rate * 0.49)
}
