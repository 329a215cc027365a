//! Capability traits for the two reverb stages.
//!
//! The hall routes audio through an early-reflection stage and a late-tail
//! stage. Both are reached only through these traits, so any engine that
//! owns its own state and exposes the listed setters and getters can be
//! dropped in. The engines are the single owners of their continuous
//! parameters: callers write through a setter and read back through the
//! matching getter, never through a cached copy.
//!
//! Setter units are engine-native. Scaling from host units (percent,
//! metres) happens in the caller.

/// Block-processing surface shared by both stages.
pub trait StereoEngine {
    /// Reconfigure for a new sample rate.
    ///
    /// May reallocate internal buffers, so it must only be called while
    /// audio processing is quiesced.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Sample rate currently configured.
    fn sample_rate(&self) -> f32;

    /// Clear all internal state without touching parameters.
    fn reset(&mut self);

    /// Transform one block of stereo audio.
    ///
    /// Outputs are overwritten, never accumulated into. All four slices
    /// have the same length; implementations must not allocate.
    fn process_block(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]);
}

/// Early-reflection stage: a sparse pattern of discrete echoes.
pub trait EarlyReflectionEngine: StereoEngine {
    /// Room scale factor; `1.0` is the reference pattern length.
    fn set_room_scale(&mut self, scale: f32);
    /// Current room scale factor.
    fn room_scale(&self) -> f32;

    /// Stereo width as a fraction (`1.0` = normal, `0.0` = mono).
    fn set_width(&mut self, width: f32);
    /// Current stereo width.
    fn width(&self) -> f32;

    /// Output low-pass cutoff in Hz.
    fn set_output_lpf(&mut self, hz: f32);
    /// Current output low-pass cutoff in Hz.
    fn output_lpf(&self) -> f32;

    /// Output high-pass cutoff in Hz.
    fn set_output_hpf(&mut self, hz: f32);
    /// Current output high-pass cutoff in Hz.
    fn output_hpf(&self) -> f32;
}

/// Late-reverb stage: the dense, decaying tail.
pub trait LateReverbEngine: StereoEngine {
    /// Delay before the tail starts, in milliseconds.
    fn set_predelay_ms(&mut self, ms: f32);
    /// Current predelay in milliseconds.
    fn predelay_ms(&self) -> f32;

    /// Mid-band decay time (RT60) in seconds.
    fn set_rt60(&mut self, seconds: f32);
    /// Current mid-band decay time in seconds.
    fn rt60(&self) -> f32;

    /// Room scale factor; `1.0` is the reference loop length.
    fn set_room_scale(&mut self, scale: f32);
    /// Current room scale factor.
    fn room_scale(&self) -> f32;

    /// Stereo width as a fraction.
    fn set_width(&mut self, width: f32);
    /// Current stereo width.
    fn width(&self) -> f32;

    /// Output low-pass cutoff in Hz.
    fn set_output_lpf(&mut self, hz: f32);
    /// Current output low-pass cutoff in Hz.
    fn output_lpf(&self) -> f32;

    /// Output high-pass cutoff in Hz.
    fn set_output_hpf(&mut self, hz: f32);
    /// Current output high-pass cutoff in Hz.
    fn output_hpf(&self) -> f32;

    /// Input diffuser gain.
    fn set_input_diffusion(&mut self, amount: f32);
    /// Current input diffuser gain.
    fn input_diffusion(&self) -> f32;

    /// Feedback of the allpasses inside the tank.
    fn set_allpass_feedback(&mut self, amount: f32);
    /// Current tank allpass feedback.
    fn allpass_feedback(&self) -> f32;

    /// Low/mid decay crossover in Hz.
    fn set_crossover_low(&mut self, hz: f32);
    /// Current low crossover in Hz.
    fn crossover_low(&self) -> f32;

    /// Low-band decay time as a multiple of [`rt60`](Self::rt60).
    fn set_low_decay_mult(&mut self, mult: f32);
    /// Current low-band decay multiplier.
    fn low_decay_mult(&self) -> f32;

    /// Mid/high decay crossover in Hz.
    fn set_crossover_high(&mut self, hz: f32);
    /// Current high crossover in Hz.
    fn crossover_high(&self) -> f32;

    /// High-band decay time as a multiple of [`rt60`](Self::rt60).
    fn set_high_decay_mult(&mut self, mult: f32);
    /// Current high-band decay multiplier.
    fn high_decay_mult(&self) -> f32;

    /// Rate of the loop-length modulation in Hz.
    fn set_spin(&mut self, hz: f32);
    /// Current spin rate in Hz.
    fn spin(&self) -> f32;

    /// Depth of the loop-length modulation in milliseconds.
    fn set_wander(&mut self, ms: f32);
    /// Current wander depth in milliseconds.
    fn wander(&self) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Wire(f32);

    impl StereoEngine for Wire {
        fn set_sample_rate(&mut self, sample_rate: f32) {
            self.0 = sample_rate;
        }
        fn sample_rate(&self) -> f32 {
            self.0
        }
        fn reset(&mut self) {}
        fn process_block(
            &mut self,
            in_l: &[f32],
            in_r: &[f32],
            out_l: &mut [f32],
            out_r: &mut [f32],
        ) {
            out_l.copy_from_slice(in_l);
            out_r.copy_from_slice(in_r);
        }
    }

    #[test]
    fn stereo_engine_is_object_safe() {
        let mut engines: [&mut dyn StereoEngine; 1] = [&mut Wire(44100.0)];
        engines[0].set_sample_rate(96000.0);
        assert_eq!(engines[0].sample_rate(), 96000.0);

        let mut l = [0.0; 3];
        let mut r = [0.0; 3];
        engines[0].process_block(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &mut l, &mut r);
        assert_eq!(l, [1.0, 2.0, 3.0]);
        assert_eq!(r, [4.0, 5.0, 6.0]);
    }
}
