//! Low-frequency oscillator for delay-length modulation.
//!
//! The late engine's "spin" and "wander" controls, and its two fixed
//! chorus LFOs, all run on [`Lfo`].

use core::f32::consts::TAU;
use libm::sinf;

/// Phase-accumulator sine LFO producing values in `[-1, 1]`.
///
/// # Example
///
/// ```rust
/// use hibiki_core::Lfo;
///
/// let mut lfo = Lfo::new(48000.0, 0.9);
/// lfo.set_phase(0.25);
/// assert!((lfo.next() - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Create a sine LFO at `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut lfo = Self {
            phase: 0.0,
            phase_inc: 0.0,
            sample_rate,
        };
        lfo.set_frequency(freq_hz);
        lfo
    }

    /// Set the rate in Hz. Negative or NaN rates stop the oscillator.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        let freq = if freq_hz.is_nan() { 0.0 } else { freq_hz.max(0.0) };
        self.phase_inc = (freq / self.sample_rate).min(0.5);
    }

    /// Jump to a phase in turns (`0.25` = 90°).
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase.rem_euclid(1.0);
    }

    /// Current phase in turns.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Produce the next value and advance.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let out = sinf(self.phase * TAU);
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }
}
