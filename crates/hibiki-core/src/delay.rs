//! Circular delay line with fractional reads.
//!
//! Every time-based part of the hall reverb sits on top of
//! [`InterpolatedDelay`]: reflection taps, predelay, comb and allpass
//! loops. The buffer is allocated once at construction (or on a sample
//! rate change) and never reallocated while audio runs.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Heap-allocated circular delay line with linear interpolation.
///
/// `read(0.0)` returns the most recently written sample, `read(1.0)` the
/// one before it, and so on up to `capacity() - 1`.
///
/// # Example
///
/// ```rust
/// use hibiki_core::InterpolatedDelay;
///
/// let mut delay = InterpolatedDelay::new(8);
/// delay.write(1.0);
/// delay.write(0.0);
/// assert_eq!(delay.read(1.0), 1.0);
/// assert_eq!(delay.read(0.5), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Create a delay line holding `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Delay size must be > 0");
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    /// Read `delay_samples` behind the last written sample.
    ///
    /// Fractional delays interpolate linearly. Delays beyond the capacity
    /// are clamped to the oldest sample.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(0.0, (len - 1) as f32);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let newer = (self.write_pos + len - whole - 1) % len;
        let a = self.buffer[newer];
        if frac == 0.0 {
            return a;
        }
        let older = (newer + len - 1) % len;
        let b = self.buffer[older];
        a + (b - a) * frac
    }

    /// Push a sample and advance the write head.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Zero the buffer and rewind the write head.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Number of samples the line can hold.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
