//! Stereo helpers shared by both engines.

use libm::tanf;

/// Freeverb-style width matrix.
///
/// ```text
/// wet1 = width / 2 + 0.5
/// wet2 = (1 - width) / 2
/// L' = L * wet1 + R * wet2
/// R' = R * wet1 + L * wet2
/// ```
///
/// `width = 1` leaves the image untouched, `0` collapses to mono, and
/// values above 1 push the sides outward.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WidthMatrix {
    wet1: f32,
    wet2: f32,
}

impl WidthMatrix {
    pub(crate) fn new(width: f32) -> Self {
        let width = if width.is_nan() { 1.0 } else { width.clamp(0.0, 2.0) };
        Self {
            wet1: width * 0.5 + 0.5,
            wet2: (1.0 - width) * 0.5,
        }
    }

    #[inline]
    pub(crate) fn apply(self, l: f32, r: f32) -> (f32, f32) {
        (l * self.wet1 + r * self.wet2, r * self.wet1 + l * self.wet2)
    }
}

/// First-order allpass used to decorrelate the cross-fed channel.
///
/// Unit gain at every frequency; the phase passes -90° at `freq_hz`.
#[derive(Debug, Clone)]
pub(crate) struct PhaseShifter {
    coeff: f32,
    x1: f32,
    y1: f32,
}

impl PhaseShifter {
    pub(crate) fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut s = Self {
            coeff: 0.0,
            x1: 0.0,
            y1: 0.0,
        };
        s.set_frequency(sample_rate, freq_hz);
        s
    }

    pub(crate) fn set_frequency(&mut self, sample_rate: f32, freq_hz: f32) {
        let freq = hibiki_core::clamp_cutoff(freq_hz, sample_rate);
        let t = tanf(core::f32::consts::PI * freq / sample_rate);
        self.coeff = (t - 1.0) / (t + 1.0);
    }

    #[inline]
    pub(crate) fn process(&mut self, x: f32) -> f32 {
        let y = hibiki_core::flush_denormal(self.coeff * x + self.x1 - self.coeff * self.y1);
        self.x1 = x;
        self.y1 = y;
        y
    }

    pub(crate) fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_width_is_identity() {
        let m = WidthMatrix::new(1.0);
        assert_eq!(m.apply(0.3, -0.2), (0.3, -0.2));
    }

    #[test]
    fn zero_width_is_mono() {
        let (l, r) = WidthMatrix::new(0.0).apply(1.0, 0.0);
        assert_eq!(l, r);
    }

    #[test]
    fn phase_shifter_passes_dc() {
        let mut ps = PhaseShifter::new(48000.0, 750.0);
        let mut y = 0.0;
        for _ in 0..10_000 {
            y = ps.process(1.0);
        }
        assert!((y - 1.0).abs() < 1e-4);
    }
}
