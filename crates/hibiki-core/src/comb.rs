//! Feedback comb with frequency-dependent decay.
//!
//! The recirculating signal is split into three bands by two one-pole
//! crossovers. Each band gets its own loop gain so low, mid and high
//! content can ring out for different times, which is what gives a hall
//! its warm low end and airy, quickly fading top.
//!
//! ```text
//! out  = line[n - D + m]
//! low  = LP(out, low_xover)
//! high = out - LP(out, high_xover)
//! mid  = out - low - high
//! line <- in + g_low * low + g_mid * mid + g_high * high
//! ```

use crate::delay::InterpolatedDelay;
use crate::math::flush_denormal;
use crate::one_pole::OnePole;

/// Per-band loop gains of a [`DecayComb`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandGains {
    /// Gain applied below the low crossover.
    pub low: f32,
    /// Gain applied between the crossovers.
    pub mid: f32,
    /// Gain applied above the high crossover.
    pub high: f32,
}

impl BandGains {
    /// Same gain in every band.
    pub const fn flat(gain: f32) -> Self {
        Self {
            low: gain,
            mid: gain,
            high: gain,
        }
    }

    fn clamped(self) -> Self {
        let c = |g: f32| if g.is_nan() { 0.0 } else { g.clamp(0.0, 0.999) };
        Self {
            low: c(self.low),
            mid: c(self.mid),
            high: c(self.high),
        }
    }
}

/// Comb filter with three-band decay and a modulatable loop length.
///
/// # Example
///
/// ```rust
/// use hibiki_core::{BandGains, DecayComb};
///
/// let mut comb = DecayComb::new(48000.0, 2048);
/// comb.set_length(1000.0);
/// comb.set_band_gains(BandGains { low: 0.95, mid: 0.9, high: 0.6 });
///
/// let out = comb.process(1.0, 0.0);
/// assert_eq!(out, 0.0); // nothing has travelled round the loop yet
/// ```
#[derive(Debug, Clone)]
pub struct DecayComb {
    delay: InterpolatedDelay,
    length: f32,
    low_split: OnePole,
    high_split: OnePole,
    gains: BandGains,
}

impl DecayComb {
    /// Create a comb whose loop can grow up to `capacity` samples.
    pub fn new(sample_rate: f32, capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            delay: InterpolatedDelay::new(capacity),
            length: (capacity / 2) as f32,
            low_split: OnePole::new(sample_rate, 500.0),
            high_split: OnePole::new(sample_rate, 5000.0),
            gains: BandGains::flat(0.5),
        }
    }

    /// Set the nominal loop length in samples, clamped to the capacity.
    pub fn set_length(&mut self, samples: f32) {
        let max = self.delay.capacity() as f32;
        self.length = if samples.is_nan() { max } else { samples.clamp(1.0, max) };
    }

    /// Nominal loop length in samples.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Set the two band-split frequencies in Hz.
    pub fn set_crossovers(&mut self, low_hz: f32, high_hz: f32) {
        self.low_split.set_frequency(low_hz);
        self.high_split.set_frequency(high_hz);
    }

    /// Set the per-band loop gains, each clamped to `[0, 0.999]`.
    pub fn set_band_gains(&mut self, gains: BandGains) {
        self.gains = gains.clamped();
    }

    /// Current per-band loop gains.
    pub fn band_gains(&self) -> BandGains {
        self.gains
    }

    /// Process one sample with the loop length offset by `modulation`
    /// samples.
    #[inline]
    pub fn process(&mut self, input: f32, modulation: f32) -> f32 {
        let tap = self.length - 1.0 + modulation;
        let out = self.delay.read(tap);

        let low = self.low_split.process(out);
        let high = out - self.high_split.process(out);
        let mid = out - low - high;
        let fed_back = self.gains.low * low + self.gains.mid * mid + self.gains.high * high;

        self.delay.write(flush_denormal(input + fed_back));
        out
    }

    /// Zero the loop and the crossover filters.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.low_split.reset();
        self.high_split.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_returns_after_one_loop() {
        let mut comb = DecayComb::new(48000.0, 64);
        comb.set_length(20.0);
        comb.set_band_gains(BandGains::flat(0.5));

        assert_eq!(comb.process(1.0, 0.0), 0.0);
        for _ in 0..19 {
            assert_eq!(comb.process(0.0, 0.0), 0.0);
        }
        assert!((comb.process(0.0, 0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn flat_gain_decays() {
        let mut comb = DecayComb::new(48000.0, 256);
        comb.set_length(100.0);
        comb.set_band_gains(BandGains::flat(0.7));
        comb.process(1.0, 0.0);

        let mut first = 0.0f32;
        let mut last = 0.0f32;
        for i in 0..5000 {
            let out = comb.process(0.0, 0.0).abs();
            if i < 1000 {
                first += out;
            } else if i >= 4000 {
                last += out;
            }
        }
        assert!(last < first * 0.01, "first {first}, last {last}");
    }

    #[test]
    fn darker_high_band_loses_more_treble() {
        let run = |high_gain: f32| {
            let mut comb = DecayComb::new(48000.0, 512);
            comb.set_length(300.0);
            comb.set_crossovers(400.0, 3000.0);
            comb.set_band_gains(BandGains { low: 0.9, mid: 0.9, high: high_gain });
            comb.process(1.0, 0.0);
            // Sum of first differences approximates high-frequency content.
            let mut prev = 0.0f32;
            let mut hf = 0.0f32;
            for _ in 0..6000 {
                let out = comb.process(0.0, 0.0);
                hf += (out - prev).abs();
                prev = out;
            }
            hf
        };
        assert!(run(0.2) < run(0.9));
    }

    #[test]
    fn gains_and_length_are_clamped() {
        let mut comb = DecayComb::new(48000.0, 100);
        comb.set_band_gains(BandGains { low: 2.0, mid: -1.0, high: f32::NAN });
        let g = comb.band_gains();
        assert_eq!(g.low, 0.999);
        assert_eq!(g.mid, 0.0);
        assert_eq!(g.high, 0.0);

        comb.set_length(1.0e6);
        assert_eq!(comb.length(), 100.0);
    }

    #[test]
    fn clear_silences() {
        let mut comb = DecayComb::new(48000.0, 128);
        for _ in 0..500 {
            comb.process(0.5, 0.0);
        }
        comb.clear();
        for _ in 0..200 {
            assert_eq!(comb.process(0.0, 0.0), 0.0);
        }
    }
}
