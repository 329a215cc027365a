//! One-pole (6 dB/oct) tone filters.
//!
//! ```text
//! lowpass:  y[n] = x[n] + c * (y[n-1] - x[n]),   c = exp(-2π f / fs)
//! highpass: y[n] = x[n] - lowpass(x)[n]
//! ```
//!
//! Used for the output low/high cuts of both engines and for the band
//! splits inside the late reverb's decay loops.
//!
//! # Reference
//!
//! Julius O. Smith III, "Introduction to Digital Filters with Audio Applications",
//! Section: One-Pole Filter.

use crate::math::{clamp_cutoff, flush_denormal};
use libm::expf;

/// One-pole lowpass filter.
///
/// A cutoff of 0 Hz holds the filter at its initial state (silence); the
/// cutoff is clamped below Nyquist.
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
}

impl OnePole {
    /// Create a lowpass at `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
        };
        filter.set_frequency(freq_hz);
        filter
    }

    /// Set the cutoff frequency in Hz.
    ///
    /// The cutoff is clamped below Nyquist for the filter's sample rate.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        let freq = clamp_cutoff(freq_hz, self.sample_rate);
        self.coeff = expf(-core::f32::consts::TAU * freq / self.sample_rate);
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Clear the filter memory.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

}

/// One-pole highpass built as the complement of [`OnePole`].
///
/// At 0 Hz the filter is transparent.
///
/// # Example
///
/// ```rust
/// use hibiki_core::OnePoleHighpass;
///
/// let mut hp = OnePoleHighpass::new(48000.0, 0.0);
/// assert_eq!(hp.process(0.25), 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct OnePoleHighpass {
    lowpass: OnePole,
}

impl OnePoleHighpass {
    /// Create a highpass at `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            lowpass: OnePole::new(sample_rate, freq_hz),
        }
    }

    /// Set the cutoff frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.lowpass.set_frequency(freq_hz);
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        input - self.lowpass.process(input)
    }

    /// Clear the filter memory.
    pub fn reset(&mut self) {
        self.lowpass.reset();
    }
}
