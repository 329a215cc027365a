//! Schroeder allpass diffuser.
//!
//! Smears transients into a dense cloud without colouring the long-term
//! spectrum. The early engine uses fixed diffusers; the late engine chains
//! four of them on its input and lets its slow LFOs wobble their lengths.

use crate::delay::InterpolatedDelay;
use crate::math::flush_denormal;

/// Schroeder allpass with an adjustable (and modulatable) loop length.
///
/// ```text
/// v[n] = x[n] + g * v[n-D]
/// y[n] = v[n-D] - g * v[n]
/// ```
///
/// With `|g| < 1` the section is unconditionally stable and has unit
/// magnitude response at every frequency.
///
/// # Example
///
/// ```rust
/// use hibiki_core::AllpassFilter;
///
/// let mut ap = AllpassFilter::new(64);
/// ap.set_feedback(0.5);
/// let first = ap.process(1.0, 0.0);
/// assert_eq!(first, -0.5);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: InterpolatedDelay,
    length: f32,
    feedback: f32,
}

impl AllpassFilter {
    /// Create a diffuser whose loop is `delay_samples` long.
    ///
    /// The line is allocated with headroom for modulation excursions of up
    /// to a quarter of the length.
    pub fn new(delay_samples: usize) -> Self {
        let length = delay_samples.max(1);
        let capacity = length + length / 4 + 4;
        Self {
            delay: InterpolatedDelay::new(capacity),
            length: length as f32,
            feedback: 0.5,
        }
    }

    /// Set the loop gain, clamped to `[-0.98, 0.98]`.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = if feedback.is_nan() {
            0.0
        } else {
            feedback.clamp(-0.98, 0.98)
        };
    }

    /// Current loop gain.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Nominal loop length in samples.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Process one sample, offsetting the loop length by `modulation`
    /// samples (pass `0.0` for a static diffuser).
    #[inline]
    pub fn process(&mut self, input: f32, modulation: f32) -> f32 {
        // read(d) is d samples behind the newest write, so a loop of D
        // samples reads at D - 1.
        let tap = (self.length - 1.0 + modulation).max(0.0);
        let delayed = self.delay.read(tap);
        let v = flush_denormal(input + self.feedback * delayed);
        self.delay.write(v);
        delayed - self.feedback * v
    }

    /// Zero the loop memory.
    pub fn clear(&mut self) {
        self.delay.clear();
    }
}
