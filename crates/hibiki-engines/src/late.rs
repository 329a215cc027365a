//! Late reverb: the dense, decaying hall tail.
//!
//! ```text
//! in ─► predelay ─► 4 × input diffuser
//!    ─► 8 × DecayComb (parallel, spin-modulated)
//!    ─► 2 × tank allpass ─► width ─► HPF ─► LPF ─► out
//! ```
//!
//! Each comb splits its loop into three bands at the two crossovers. The
//! mid band decays in `rt60` seconds; the low and high bands decay in
//! `rt60 × low_mult` and `rt60 × high_mult`. The comb lengths follow the
//! room scale and wobble by up to `wander × 0.3` ms at the spin rate. The
//! input diffusers ride two slow fixed LFOs (0.9 Hz and 1.3 Hz).

use crate::stereo::WidthMatrix;
use hibiki_core::{
    AllpassFilter, BandGains, DecayComb, InterpolatedDelay, LateReverbEngine, Lfo, OnePole,
    OnePoleHighpass, StereoEngine, ms_to_samples, rt60_gain,
};

/// Comb loop lengths (ms) at room scale 1.0, left channel. Right adds
/// [`STEREO_SPREAD_MS`].
const COMB_MS: [f32; 8] = [59.1, 63.7, 68.9, 72.3, 77.9, 83.1, 87.7, 93.1];
const STEREO_SPREAD_MS: f32 = 0.53;

/// Input diffuser lengths in ms, fixed (not room-scaled).
const DIFFUSER_MS: [f32; 4] = [4.77, 3.59, 12.73, 9.31];

/// Tank output allpass lengths in ms.
const TANK_AP_MS: [f32; 2] = [12.61, 10.0];

const MAX_PREDELAY_MS: f32 = 100.0;
const MAX_ROOM_SCALE: f32 = 1.5;
const MIN_ROOM_SCALE: f32 = 0.05;
const MIN_RT60: f32 = 0.05;
const MAX_RT60: f32 = 60.0;
const MAX_WANDER_MS: f32 = 30.0;

/// Fixed diffuser modulation rates.
const LFO1_HZ: f32 = 0.9;
const LFO2_HZ: f32 = 1.3;
/// Diffuser modulation depth in ms.
const LFO_FACTOR: f32 = 0.3;
/// Share of the wander depth applied to the comb loops.
const SPIN_FACTOR: f32 = 0.3;

fn clamp_or(value: f32, lo: f32, hi: f32, fallback: f32) -> f32 {
    if value.is_nan() { fallback } else { value.clamp(lo, hi) }
}

/// Late-reverb engine.
///
/// Outputs only the tail (no dry path) at unity gain.
///
/// # Example
///
/// ```rust
/// use hibiki_core::{LateReverbEngine, StereoEngine};
/// use hibiki_engines::LateReverb;
///
/// let mut late = LateReverb::new(48000.0);
/// late.set_rt60(3.0);
/// late.set_predelay_ms(20.0);
/// assert_eq!(late.rt60(), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct LateReverb {
    sample_rate: f32,

    predelay_l: InterpolatedDelay,
    predelay_r: InterpolatedDelay,

    diffusers_l: [AllpassFilter; 4],
    diffusers_r: [AllpassFilter; 4],
    lfo1: Lfo,
    lfo2: Lfo,

    combs_l: [DecayComb; 8],
    combs_r: [DecayComb; 8],
    spin_l: [Lfo; 8],
    spin_r: [Lfo; 8],

    tank_l: [AllpassFilter; 2],
    tank_r: [AllpassFilter; 2],

    lpf_l: OnePole,
    lpf_r: OnePole,
    hpf_l: OnePoleHighpass,
    hpf_r: OnePoleHighpass,
    matrix: WidthMatrix,

    predelay_ms: f32,
    rt60: f32,
    room_scale: f32,
    width: f32,
    output_lpf: f32,
    output_hpf: f32,
    input_diffusion: f32,
    allpass_feedback: f32,
    crossover_low: f32,
    low_decay_mult: f32,
    crossover_high: f32,
    high_decay_mult: f32,
    spin: f32,
    wander: f32,
}

impl LateReverb {
    /// Default predelay in ms.
    pub const DEFAULT_PREDELAY_MS: f32 = 18.0;
    /// Default mid-band decay in seconds.
    pub const DEFAULT_RT60: f32 = 2.25;
    /// Default room scale (a 36 m hall).
    pub const DEFAULT_ROOM_SCALE: f32 = 36.0 / 80.0;
    /// Default stereo width.
    pub const DEFAULT_WIDTH: f32 = 0.208;
    /// Default output low-pass in Hz.
    pub const DEFAULT_LPF: f32 = 5000.0;
    /// Default output high-pass in Hz.
    pub const DEFAULT_HPF: f32 = 4.0;
    /// Default diffuser gain.
    pub const DEFAULT_DIFFUSION: f32 = 0.675;
    /// Default low crossover in Hz.
    pub const DEFAULT_CROSSOVER_LOW: f32 = 600.0;
    /// Default low-band decay multiplier.
    pub const DEFAULT_LOW_MULT: f32 = 2.0;
    /// Default high crossover in Hz.
    pub const DEFAULT_CROSSOVER_HIGH: f32 = 4500.0;
    /// Default high-band decay multiplier.
    pub const DEFAULT_HIGH_MULT: f32 = 0.35;
    /// Default spin rate in Hz.
    pub const DEFAULT_SPIN: f32 = 2.9;
    /// Default wander depth in ms.
    pub const DEFAULT_WANDER: f32 = 15.0;

    /// Create an engine at `sample_rate` with medium-hall defaults.
    pub fn new(sample_rate: f32) -> Self {
        let predelay_len = ms_to_samples(MAX_PREDELAY_MS, sample_rate) as usize + 4;
        let comb_cap = ms_to_samples(
            (COMB_MS[7] + STEREO_SPREAD_MS) * MAX_ROOM_SCALE + MAX_WANDER_MS * SPIN_FACTOR,
            sample_rate,
        ) as usize
            + 4;

        let diffuser = |ms: f32| AllpassFilter::new(ms_to_samples(ms, sample_rate) as usize);
        let tank_ap = |ms: f32| AllpassFilter::new(ms_to_samples(ms, sample_rate) as usize);
        let spin_lfo = |i: usize, offset: f32| {
            let mut lfo = Lfo::new(sample_rate, Self::DEFAULT_SPIN);
            lfo.set_phase(i as f32 / 8.0 + offset);
            lfo
        };

        let mut lfo2 = Lfo::new(sample_rate, LFO2_HZ);
        lfo2.set_phase(0.25);

        let mut engine = Self {
            sample_rate,
            predelay_l: InterpolatedDelay::new(predelay_len),
            predelay_r: InterpolatedDelay::new(predelay_len),
            diffusers_l: core::array::from_fn(|i| diffuser(DIFFUSER_MS[i])),
            diffusers_r: core::array::from_fn(|i| diffuser(DIFFUSER_MS[i] * 1.07)),
            lfo1: Lfo::new(sample_rate, LFO1_HZ),
            lfo2,
            combs_l: core::array::from_fn(|_| DecayComb::new(sample_rate, comb_cap)),
            combs_r: core::array::from_fn(|_| DecayComb::new(sample_rate, comb_cap)),
            spin_l: core::array::from_fn(|i| spin_lfo(i, 0.0)),
            spin_r: core::array::from_fn(|i| spin_lfo(i, 0.0625)),
            tank_l: core::array::from_fn(|i| tank_ap(TANK_AP_MS[i])),
            tank_r: core::array::from_fn(|i| tank_ap(TANK_AP_MS[i] * 1.03)),
            lpf_l: OnePole::new(sample_rate, Self::DEFAULT_LPF),
            lpf_r: OnePole::new(sample_rate, Self::DEFAULT_LPF),
            hpf_l: OnePoleHighpass::new(sample_rate, Self::DEFAULT_HPF),
            hpf_r: OnePoleHighpass::new(sample_rate, Self::DEFAULT_HPF),
            matrix: WidthMatrix::new(Self::DEFAULT_WIDTH),
            predelay_ms: Self::DEFAULT_PREDELAY_MS,
            rt60: Self::DEFAULT_RT60,
            room_scale: Self::DEFAULT_ROOM_SCALE,
            width: Self::DEFAULT_WIDTH,
            output_lpf: Self::DEFAULT_LPF,
            output_hpf: Self::DEFAULT_HPF,
            input_diffusion: Self::DEFAULT_DIFFUSION,
            allpass_feedback: Self::DEFAULT_DIFFUSION,
            crossover_low: Self::DEFAULT_CROSSOVER_LOW,
            low_decay_mult: Self::DEFAULT_LOW_MULT,
            crossover_high: Self::DEFAULT_CROSSOVER_HIGH,
            high_decay_mult: Self::DEFAULT_HIGH_MULT,
            spin: Self::DEFAULT_SPIN,
            wander: Self::DEFAULT_WANDER,
        };
        engine.apply_diffusion();
        engine.apply_crossovers();
        engine.update_tank();
        engine
    }

    fn scale(&self) -> f32 {
        clamp_or(self.room_scale, MIN_ROOM_SCALE, MAX_ROOM_SCALE, 1.0)
    }

    /// Recompute comb lengths and band gains.
    fn update_tank(&mut self) {
        let scale = self.scale();
        let rt60 = clamp_or(self.rt60, MIN_RT60, MAX_RT60, Self::DEFAULT_RT60);
        let low_rt = clamp_or(rt60 * self.low_decay_mult, MIN_RT60, MAX_RT60, rt60);
        let high_rt = clamp_or(rt60 * self.high_decay_mult, MIN_RT60, MAX_RT60, rt60);

        let sr = self.sample_rate;
        let tune = |comb: &mut DecayComb, ms: f32| {
            let seconds = ms * 0.001;
            comb.set_length(ms_to_samples(ms, sr));
            comb.set_band_gains(BandGains {
                low: rt60_gain(seconds, low_rt),
                mid: rt60_gain(seconds, rt60),
                high: rt60_gain(seconds, high_rt),
            });
        };
        for (i, comb) in self.combs_l.iter_mut().enumerate() {
            tune(comb, COMB_MS[i] * scale);
        }
        for (i, comb) in self.combs_r.iter_mut().enumerate() {
            tune(comb, (COMB_MS[i] + STEREO_SPREAD_MS) * scale);
        }
    }

    fn apply_diffusion(&mut self) {
        for ap in self.diffusers_l.iter_mut().chain(self.diffusers_r.iter_mut()) {
            ap.set_feedback(self.input_diffusion);
        }
        for ap in self.tank_l.iter_mut().chain(self.tank_r.iter_mut()) {
            ap.set_feedback(self.allpass_feedback);
        }
    }

    fn apply_crossovers(&mut self) {
        let lo = self.crossover_low.min(self.crossover_high);
        let hi = self.crossover_low.max(self.crossover_high);
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.set_crossovers(lo, hi);
        }
    }

    fn apply_spin(&mut self) {
        for lfo in self.spin_l.iter_mut().chain(self.spin_r.iter_mut()) {
            lfo.set_frequency(self.spin);
        }
    }

    #[inline]
    fn process_frame(&mut self, in_l: f32, in_r: f32) -> (f32, f32) {
        let pre = ms_to_samples(
            clamp_or(self.predelay_ms, 0.0, MAX_PREDELAY_MS, 0.0),
            self.sample_rate,
        );
        self.predelay_l.write(in_l);
        self.predelay_r.write(in_r);
        let mut l = self.predelay_l.read(pre);
        let mut r = self.predelay_r.read(pre);

        let depth = ms_to_samples(LFO_FACTOR, self.sample_rate);
        let m1 = self.lfo1.next() * depth;
        let m2 = self.lfo2.next() * depth;
        for (i, ap) in self.diffusers_l.iter_mut().enumerate() {
            l = ap.process(l, if i % 2 == 0 { m1 } else { m2 });
        }
        for (i, ap) in self.diffusers_r.iter_mut().enumerate() {
            r = ap.process(r, if i % 2 == 0 { m2 } else { m1 });
        }

        let wander = ms_to_samples(
            clamp_or(self.wander, 0.0, MAX_WANDER_MS, 0.0) * SPIN_FACTOR,
            self.sample_rate,
        );
        let mut sum_l = 0.0;
        for (comb, lfo) in self.combs_l.iter_mut().zip(self.spin_l.iter_mut()) {
            sum_l += comb.process(l, lfo.next() * wander);
        }
        let mut sum_r = 0.0;
        for (comb, lfo) in self.combs_r.iter_mut().zip(self.spin_r.iter_mut()) {
            sum_r += comb.process(r, lfo.next() * wander);
        }
        let mut tl = sum_l * 0.125;
        let mut tr = sum_r * 0.125;

        for ap in &mut self.tank_l {
            tl = ap.process(tl, 0.0);
        }
        for ap in &mut self.tank_r {
            tr = ap.process(tr, 0.0);
        }

        let (wl, wr) = self.matrix.apply(tl, tr);
        (
            self.lpf_l.process(self.hpf_l.process(wl)),
            self.lpf_r.process(self.hpf_r.process(wr)),
        )
    }
}

impl Default for LateReverb {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StereoEngine for LateReverb {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "late reverb: rebuilding delay lines");

        let mut rebuilt = Self::new(sample_rate);
        rebuilt.predelay_ms = self.predelay_ms;
        rebuilt.rt60 = self.rt60;
        rebuilt.room_scale = self.room_scale;
        rebuilt.input_diffusion = self.input_diffusion;
        rebuilt.allpass_feedback = self.allpass_feedback;
        rebuilt.crossover_low = self.crossover_low;
        rebuilt.low_decay_mult = self.low_decay_mult;
        rebuilt.crossover_high = self.crossover_high;
        rebuilt.high_decay_mult = self.high_decay_mult;
        rebuilt.spin = self.spin;
        rebuilt.wander = self.wander;
        rebuilt.set_width(self.width);
        rebuilt.set_output_lpf(self.output_lpf);
        rebuilt.set_output_hpf(self.output_hpf);
        rebuilt.apply_diffusion();
        rebuilt.apply_crossovers();
        rebuilt.apply_spin();
        rebuilt.update_tank();
        *self = rebuilt;
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn reset(&mut self) {
        self.predelay_l.clear();
        self.predelay_r.clear();
        for ap in self
            .diffusers_l
            .iter_mut()
            .chain(self.diffusers_r.iter_mut())
            .chain(self.tank_l.iter_mut())
            .chain(self.tank_r.iter_mut())
        {
            ap.clear();
        }
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.clear();
        }
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

impl LateReverbEngine for LateReverb {
    fn set_predelay_ms(&mut self, ms: f32) {
        self.predelay_ms = ms;
    }

    fn predelay_ms(&self) -> f32 {
        self.predelay_ms
    }

    fn set_rt60(&mut self, seconds: f32) {
        self.rt60 = seconds;
        self.update_tank();
    }

    fn rt60(&self) -> f32 {
        self.rt60
    }

    fn set_room_scale(&mut self, scale: f32) {
        self.room_scale = scale;
        self.update_tank();
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

    fn set_input_diffusion(&mut self, amount: f32) {
        self.input_diffusion = amount;
        self.apply_diffusion();
    }

    fn input_diffusion(&self) -> f32 {
        self.input_diffusion
    }

    fn set_allpass_feedback(&mut self, amount: f32) {
        self.allpass_feedback = amount;
        self.apply_diffusion();
    }

    fn allpass_feedback(&self) -> f32 {
        self.allpass_feedback
    }

    fn set_crossover_low(&mut self, hz: f32) {
        self.crossover_low = hz;
        self.apply_crossovers();
    }

    fn crossover_low(&self) -> f32 {
        self.crossover_low
    }

    fn set_low_decay_mult(&mut self, mult: f32) {
        self.low_decay_mult = mult;
        self.update_tank();
    }

    fn low_decay_mult(&self) -> f32 {
        self.low_decay_mult
    }

    fn set_crossover_high(&mut self, hz: f32) {
        self.crossover_high = hz;
        self.apply_crossovers();
    }

    fn crossover_high(&self) -> f32 {
        self.crossover_high
    }

    fn set_high_decay_mult(&mut self, mult: f32) {
        self.high_decay_mult = mult;
        self.update_tank();
    }

    fn high_decay_mult(&self) -> f32 {
        self.high_decay_mult
    }

    fn set_spin(&mut self, hz: f32) {
        self.spin = hz;
        self.apply_spin();
    }

    fn spin(&self) -> f32 {
        self.spin
    }

    fn set_wander(&mut self, ms: f32) {
        self.wander = ms;
    }

    fn wander(&self) -> f32 {
        self.wander
    }
}
