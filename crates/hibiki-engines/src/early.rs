//! Early reflections: a sparse, room-scaled tap pattern.
//!
//! Each channel reads a fixed pattern of sixteen discrete echoes from its
//! own input history. The pattern is stretched by the room scale, a little
//! of the opposite channel is cross-fed through a first-order phase
//! shifter, and two Schroeder allpasses smear the taps before the width
//! matrix and output tone filters.
//!
//! ```text
//! in ─► tap pattern ─► + cross(phase shift) ─► diffusers ─► L/R offset
//!    ─► width ─► HPF ─► LPF ─► out
//! ```

use crate::stereo::{PhaseShifter, WidthMatrix};
use hibiki_core::{
    AllpassFilter, EarlyReflectionEngine, InterpolatedDelay, OnePole, OnePoleHighpass,
    StereoEngine, ms_to_samples,
};

/// Reflection arrival times (ms) and gains at room scale 1.0, left channel.
const TAPS_L: [(f32, f32); 16] = [
    (4.3, 0.841),
    (7.1, -0.504),
    (10.9, 0.491),
    (13.7, 0.379),
    (17.2, -0.380),
    (21.5, 0.346),
    (25.3, -0.289),
    (28.9, 0.272),
    (33.1, 0.192),
    (37.6, -0.193),
    (42.2, 0.217),
    (47.1, -0.181),
    (52.9, 0.180),
    (58.3, -0.142),
    (63.8, 0.125),
    (70.4, -0.101),
];

/// Reflection arrival times (ms) and gains at room scale 1.0, right channel.
const TAPS_R: [(f32, f32); 16] = [
    (5.1, 0.813),
    (8.3, -0.488),
    (11.6, 0.502),
    (15.1, -0.366),
    (18.4, 0.357),
    (22.9, -0.335),
    (26.2, 0.301),
    (30.7, -0.250),
    (34.6, 0.205),
    (39.4, 0.187),
    (44.0, -0.209),
    (49.3, 0.174),
    (54.1, -0.166),
    (60.2, 0.139),
    (66.5, -0.118),
    (72.8, 0.097),
];

/// Largest supported room scale (a 10 m early size is 10 / 7).
const MAX_ROOM_SCALE: f32 = 1.5;
/// Smallest room scale; keeps the first tap clear of the write head.
const MIN_ROOM_SCALE: f32 = 0.05;

/// Right-channel offset in milliseconds.
const LR_DELAY_MS: f32 = 0.3;
/// Corner of the cross-feed phase shifter.
const CROSS_FREQ_HZ: f32 = 750.0;
/// Share of the opposite channel mixed into each side.
const CROSS_GAIN: f32 = 0.3;
/// Diffuser loop length expressed as a frequency (one period).
const DIFFUSION_FREQ_HZ: f32 = 150.0;
const DIFFUSION_FEEDBACK: f32 = 0.5;

/// Output scale for a tap pattern, from the sum of its absolute gains.
fn pattern_norm(taps: &[(f32, f32)]) -> f32 {
    let sum: f32 = taps.iter().map(|(_, g)| g.abs()).sum();
    2.0 / sum.max(1.0)
}

fn diffusers(sample_rate: f32) -> [AllpassFilter; 2] {
    let period = sample_rate / DIFFUSION_FREQ_HZ;
    let make = |len: f32| {
        let mut ap = AllpassFilter::new((len as usize).max(1));
        ap.set_feedback(DIFFUSION_FEEDBACK);
        ap
    };
    [make(period * 0.5), make(period * 0.31)]
}

/// Early-reflection engine.
///
/// Outputs only the reflections (no dry path) at unity gain.
///
/// # Example
///
/// ```rust
/// use hibiki_core::{EarlyReflectionEngine, StereoEngine};
/// use hibiki_engines::EarlyReflections;
///
/// let mut early = EarlyReflections::new(48000.0);
/// early.set_room_scale(5.0 / 7.0);
/// early.set_width(0.8);
///
/// let input = [1.0, 0.0, 0.0, 0.0];
/// let (mut l, mut r) = ([0.0; 4], [0.0; 4]);
/// early.process_block(&input, &input, &mut l, &mut r);
/// assert!(l.iter().all(|s| s.is_finite()));
/// ```
#[derive(Debug, Clone)]
pub struct EarlyReflections {
    sample_rate: f32,

    history_l: InterpolatedDelay,
    history_r: InterpolatedDelay,
    tap_samples_l: [f32; 16],
    tap_samples_r: [f32; 16],
    norm_l: f32,
    norm_r: f32,

    cross_l: PhaseShifter,
    cross_r: PhaseShifter,
    diffuse_l: [AllpassFilter; 2],
    diffuse_r: [AllpassFilter; 2],
    offset_r: InterpolatedDelay,

    lpf_l: OnePole,
    lpf_r: OnePole,
    hpf_l: OnePoleHighpass,
    hpf_r: OnePoleHighpass,

    room_scale: f32,
    width: f32,
    output_lpf: f32,
    output_hpf: f32,
    matrix: WidthMatrix,
}

impl EarlyReflections {
    /// Default room scale (a 5 m room).
    pub const DEFAULT_ROOM_SCALE: f32 = 5.0 / 7.0;
    /// Default stereo width.
    pub const DEFAULT_WIDTH: f32 = 0.8;
    /// Default output low-pass in Hz.
    pub const DEFAULT_LPF: f32 = 7000.0;
    /// Default output high-pass in Hz.
    pub const DEFAULT_HPF: f32 = 4.0;

    /// Create an engine at `sample_rate` with medium-room defaults.
    pub fn new(sample_rate: f32) -> Self {
        let longest_tap_ms = TAPS_R[15].0.max(TAPS_L[15].0) * MAX_ROOM_SCALE;
        let history_len = ms_to_samples(longest_tap_ms, sample_rate) as usize + 4;
        let offset_len = ms_to_samples(LR_DELAY_MS, sample_rate) as usize + 4;

        let mut engine = Self {
            sample_rate,
            history_l: InterpolatedDelay::new(history_len),
            history_r: InterpolatedDelay::new(history_len),
            tap_samples_l: [0.0; 16],
            tap_samples_r: [0.0; 16],
            norm_l: pattern_norm(&TAPS_L),
            norm_r: pattern_norm(&TAPS_R),
            cross_l: PhaseShifter::new(sample_rate, CROSS_FREQ_HZ),
            cross_r: PhaseShifter::new(sample_rate, CROSS_FREQ_HZ),
            diffuse_l: diffusers(sample_rate),
            diffuse_r: diffusers(sample_rate),
            offset_r: InterpolatedDelay::new(offset_len),
            lpf_l: OnePole::new(sample_rate, Self::DEFAULT_LPF),
            lpf_r: OnePole::new(sample_rate, Self::DEFAULT_LPF),
            hpf_l: OnePoleHighpass::new(sample_rate, Self::DEFAULT_HPF),
            hpf_r: OnePoleHighpass::new(sample_rate, Self::DEFAULT_HPF),
            room_scale: Self::DEFAULT_ROOM_SCALE,
            width: Self::DEFAULT_WIDTH,
            output_lpf: Self::DEFAULT_LPF,
            output_hpf: Self::DEFAULT_HPF,
            matrix: WidthMatrix::new(Self::DEFAULT_WIDTH),
        };
        engine.update_taps();
        engine
    }

    fn update_taps(&mut self) {
        let scale = if self.room_scale.is_nan() {
            1.0
        } else {
            self.room_scale.clamp(MIN_ROOM_SCALE, MAX_ROOM_SCALE)
        };
        // The input is written before the taps are read, so read(d) is x[n - d].
        for (slot, &(ms, _)) in self.tap_samples_l.iter_mut().zip(TAPS_L.iter()) {
            *slot = ms_to_samples(ms * scale, self.sample_rate);
        }
        for (slot, &(ms, _)) in self.tap_samples_r.iter_mut().zip(TAPS_R.iter()) {
            *slot = ms_to_samples(ms * scale, self.sample_rate);
        }
    }

    #[inline]
    fn process_frame(&mut self, in_l: f32, in_r: f32) -> (f32, f32) {
        self.history_l.write(in_l);
        self.history_r.write(in_r);

        let mut l = 0.0;
        for (&d, &(_, g)) in self.tap_samples_l.iter().zip(TAPS_L.iter()) {
            l += g * self.history_l.read(d);
        }
        let mut r = 0.0;
        for (&d, &(_, g)) in self.tap_samples_r.iter().zip(TAPS_R.iter()) {
            r += g * self.history_r.read(d);
        }
        l *= self.norm_l;
        r *= self.norm_r;

        let xl = l + CROSS_GAIN * self.cross_l.process(r);
        let xr = r + CROSS_GAIN * self.cross_r.process(l);

        let mut dl = xl;
        for ap in &mut self.diffuse_l {
            dl = ap.process(dl, 0.0);
        }
        let mut dr = xr;
        for ap in &mut self.diffuse_r {
            dr = ap.process(dr, 0.0);
        }

        let offset = ms_to_samples(LR_DELAY_MS, self.sample_rate);
        self.offset_r.write(dr);
        let dr = self.offset_r.read(offset);

        let (wl, wr) = self.matrix.apply(dl, dr);
        (
            self.lpf_l.process(self.hpf_l.process(wl)),
            self.lpf_r.process(self.hpf_r.process(wr)),
        )
    }
}

impl Default for EarlyReflections {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StereoEngine for EarlyReflections {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "early reflections: rebuilding delay lines");

        let mut rebuilt = Self::new(sample_rate);
        rebuilt.set_room_scale(self.room_scale);
        rebuilt.set_width(self.width);
        rebuilt.set_output_lpf(self.output_lpf);
        rebuilt.set_output_hpf(self.output_hpf);
        *self = rebuilt;
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn reset(&mut self) {
        self.history_l.clear();
        self.history_r.clear();
        self.cross_l.reset();
        self.cross_r.reset();
        for ap in self.diffuse_l.iter_mut().chain(self.diffuse_r.iter_mut()) {
            ap.clear();
        }
        self.offset_r.clear();
        self.lpf_l.reset();
        self.lpf_r.reset();
        self.hpf_l.reset();
        self.hpf_r.reset();
    }

    fn process_block(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        let frames = in_l.len().min(in_r.len()).min(out_l.len()).min(out_r.len());
        for i in 0..frames {
            let (l, r) = self.process_frame(in_l[i], in_r[i]);
            out_l[i] = l;
            out_r[i] = r;
        }
    }
}

impl EarlyReflectionEngine for EarlyReflections {
    fn set_room_scale(&mut self, scale: f32) {
        self.room_scale = scale;
        self.update_taps();
    }

    fn room_scale(&self) -> f32 {
        self.room_scale
    }

    fn set_width(&mut self, width: f32) {
        self.width = width;
        self.matrix = WidthMatrix::new(width);
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn set_output_lpf(&mut self, hz: f32) {
        self.output_lpf = hz;
        self.lpf_l.set_frequency(hz);
        self.lpf_r.set_frequency(hz);
    }

    fn output_lpf(&self) -> f32 {
        self.output_lpf
    }

    fn set_output_hpf(&mut self, hz: f32) {
        self.output_hpf = hz;
        self.hpf_l.set_frequency(hz);
        self.hpf_r.set_frequency(hz);
    }

    fn output_hpf(&self) -> f32 {
        self.output_hpf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_response(engine: &mut EarlyReflections, frames: usize) -> (Vec<f32>, Vec<f32>) {
        let mut in_l = vec![0.0; frames];
        in_l[0] = 1.0;
        let in_r = in_l.clone();
        let mut l = vec![0.0; frames];
        let mut r = vec![0.0; frames];
        engine.process_block(&in_l, &in_r, &mut l, &mut r);
        (l, r)
    }

    fn first_arrival(buf: &[f32]) -> usize {
        buf.iter().position(|s| s.abs() > 1e-3).unwrap_or(buf.len())
    }

    #[test]
    fn reflections_arrive_after_first_tap() {
        let mut e = EarlyReflections::new(48000.0);
        e.set_room_scale(1.0);
        e.set_output_lpf(20000.0);
        let (l, _) = impulse_response(&mut e, 4800);
        let first = first_arrival(&l);
        // 4.3 ms at 48 kHz
        assert!((200..=215).contains(&first), "first arrival {first}");
    }

    #[test]
    fn larger_room_delays_pattern() {
        let mut small = EarlyReflections::new(48000.0);
        small.set_room_scale(0.4);
        let mut large = EarlyReflections::new(48000.0);
        large.set_room_scale(1.4);

        let (ls, _) = impulse_response(&mut small, 9600);
        let (ll, _) = impulse_response(&mut large, 9600);
        assert!(first_arrival(&ls) < first_arrival(&ll));
    }

    #[test]
    fn pattern_dies_out() {
        let mut e = EarlyReflections::new(48000.0);
        e.set_room_scale(MAX_ROOM_SCALE);
        let (l, r) = impulse_response(&mut e, 48000);
        let tail: f32 = l[40000..].iter().chain(r[40000..].iter()).map(|s| s.abs()).sum();
        assert!(tail < 1e-3, "tail energy {tail}");
    }

    #[test]
    fn setters_round_trip_raw_values() {
        let mut e = EarlyReflections::new(44100.0);
        e.set_room_scale(9.0 / 7.0);
        e.set_width(1.7);
        e.set_output_lpf(19000.0);
        e.set_output_hpf(55.0);
        assert_eq!(e.room_scale(), 9.0 / 7.0);
        assert_eq!(e.width(), 1.7);
        assert_eq!(e.output_lpf(), 19000.0);
        assert_eq!(e.output_hpf(), 55.0);
    }

    #[test]
    fn sample_rate_change_keeps_parameters() {
        let mut e = EarlyReflections::new(44100.0);
        e.set_room_scale(1.2);
        e.set_output_hpf(20.0);
        e.set_sample_rate(96000.0);
        assert_eq!(e.sample_rate(), 96000.0);
        assert_eq!(e.room_scale(), 1.2);
        assert_eq!(e.output_hpf(), 20.0);
    }

    #[test]
    fn reset_clears_history() {
        let mut e = EarlyReflections::new(48000.0);
        let noise: Vec<f32> = (0..2048).map(|i| libm::sinf(i as f32 * 0.37)).collect();
        let mut l = vec![0.0; 2048];
        let mut r = vec![0.0; 2048];
        e.process_block(&noise, &noise, &mut l, &mut r);
        e.reset();

        let silence = vec![0.0; 2048];
        e.process_block(&silence, &silence, &mut l, &mut r);
        assert!(l.iter().chain(r.iter()).all(|&s| s == 0.0));
    }
}
