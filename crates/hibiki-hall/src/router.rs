//! Early→late signal routing.
//!
//! ```text
//!            ┌─────────┐ e
//! in ──┬────►│  early  ├──┬──────────────────× early ──┐
//!      │     └─────────┘  │                            │
//!      │                  × send                       │
//!      │                  ▼     ┌────────┐ l           ▼
//!      ├─────────────────(+)───►│  late  ├──× late ──►(+)──► out
//!      │                        └────────┘             ▲
//!      └───────────────────────────────────── × dry ───┘
//! ```
//!
//! Audio is processed in chunks of at most [`BLOCK_SIZE`] frames through
//! fixed scratch buffers, so nothing is allocated per call.

use hibiki_core::{EarlyReflectionEngine, LateReverbEngine, StereoEngine};

use crate::store::MixGains;

/// Frames per internal chunk.
pub const BLOCK_SIZE: usize = 256;

/// Fixed scratch space for one chunk of routing.
#[derive(Debug, Clone)]
pub struct SignalRouter {
    early_l: [f32; BLOCK_SIZE],
    early_r: [f32; BLOCK_SIZE],
    late_in_l: [f32; BLOCK_SIZE],
    late_in_r: [f32; BLOCK_SIZE],
    late_l: [f32; BLOCK_SIZE],
    late_r: [f32; BLOCK_SIZE],
}

impl SignalRouter {
    /// Router with zeroed scratch buffers.
    pub fn new() -> Self {
        Self {
            early_l: [0.0; BLOCK_SIZE],
            early_r: [0.0; BLOCK_SIZE],
            late_in_l: [0.0; BLOCK_SIZE],
            late_in_r: [0.0; BLOCK_SIZE],
            late_l: [0.0; BLOCK_SIZE],
            late_r: [0.0; BLOCK_SIZE],
        }
    }

    /// Process `frames` frames, clamped to the shortest of the four
    /// buffers. Output past the processed frames is left untouched.
    ///
    /// Returns the number of frames processed.
    pub fn run<E, L>(
        &mut self,
        inputs: [&[f32]; 2],
        outputs: [&mut [f32]; 2],
        frames: usize,
        gains: &MixGains,
        early: &mut E,
        late: &mut L,
    ) -> usize
    where
        E: EarlyReflectionEngine,
        L: LateReverbEngine,
    {
        let [in_l, in_r] = inputs;
        let [out_l, out_r] = outputs;
        let frames = frames
            .min(in_l.len())
            .min(in_r.len())
            .min(out_l.len())
            .min(out_r.len());

        let mut start = 0;
        while start < frames {
            let end = (start + BLOCK_SIZE).min(frames);
            self.process_chunk(
                &in_l[start..end],
                &in_r[start..end],
                &mut out_l[start..end],
                &mut out_r[start..end],
                gains,
                early,
                late,
            );
            start = end;
        }
        frames
    }

    /// Route one chunk. Frames beyond [`BLOCK_SIZE`] or the shortest slice
    /// are skipped; returns the number routed.
    fn process_chunk<E, L>(
        &mut self,
        in_l: &[f32],
        in_r: &[f32],
        out_l: &mut [f32],
        out_r: &mut [f32],
        gains: &MixGains,
        early: &mut E,
        late: &mut L,
    ) -> usize
    where
        E: EarlyReflectionEngine,
        L: LateReverbEngine,
    {
        let n = BLOCK_SIZE
            .min(in_l.len())
            .min(in_r.len())
            .min(out_l.len())
            .min(out_r.len());
        let (in_l, in_r) = (&in_l[..n], &in_r[..n]);

        let early_l = &mut self.early_l[..n];
        let early_r = &mut self.early_r[..n];
        early.process_block(in_l, in_r, early_l, early_r);

        let late_in_l = &mut self.late_in_l[..n];
        let late_in_r = &mut self.late_in_r[..n];
        for i in 0..n {
            late_in_l[i] = gains.early_send * early_l[i] + in_l[i];
            late_in_r[i] = gains.early_send * early_r[i] + in_r[i];
        }

        let late_l = &mut self.late_l[..n];
        let late_r = &mut self.late_r[..n];
        late.process_block(late_in_l, late_in_r, late_l, late_r);

        for i in 0..n {
            out_l[i] = gains.dry * in_l[i] + gains.early * early_l[i] + gains.late * late_l[i];
            out_r[i] = gains.dry * in_r[i] + gains.early * early_r[i] + gains.late * late_r[i];
        }
        n
    }
}

impl Default for SignalRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hibiki_engines::{EarlyReflections, LateReverb};

    #[test]
    fn frames_clamp_to_shortest_buffer() {
        let mut router = SignalRouter::new();
        let mut early = EarlyReflections::new(48000.0);
        let mut late = LateReverb::new(48000.0);
        let input = vec![0.1f32; 300];
        let short = vec![0.1f32; 100];
        let mut out_l = vec![7.0f32; 300];
        let mut out_r = vec![7.0f32; 300];

        let done = router.run(
            [&input[..], &short[..]],
            [&mut out_l[..], &mut out_r[..]],
            300,
            &MixGains::DRY,
            &mut early,
            &mut late,
        );
        assert_eq!(done, 100);
        assert!(out_l[..100].iter().all(|&s| (s - 0.1).abs() < 1e-7));
        assert!(out_l[100..].iter().all(|&s| s == 7.0));
    }

    #[test]
    fn zero_frames_is_a_no_op() {
        let mut router = SignalRouter::default();
        let mut early = EarlyReflections::new(48000.0);
        let mut late = LateReverb::new(48000.0);
        let input = [0.5f32; 4];
        let mut out_l = [1.0f32; 4];
        let mut out_r = [1.0f32; 4];
        let done = router.run(
            [&input, &input],
            [&mut out_l, &mut out_r],
            0,
            &MixGains::default(),
            &mut early,
            &mut late,
        );
        assert_eq!(done, 0);
        assert_eq!(out_l, [1.0; 4]);
    }

    #[test]
    fn oversized_or_ragged_chunk_is_trimmed() {
        let mut router = SignalRouter::new();
        let mut early = EarlyReflections::new(48000.0);
        let mut late = LateReverb::new(48000.0);
        let input = vec![0.25f32; BLOCK_SIZE + 44];
        let short = vec![0.25f32; 10];
        let mut out_l = vec![7.0f32; BLOCK_SIZE + 44];
        let mut out_r = vec![7.0f32; BLOCK_SIZE + 44];

        let done = router.process_chunk(
            &input,
            &input,
            &mut out_l,
            &mut out_r,
            &MixGains::DRY,
            &mut early,
            &mut late,
        );
        assert_eq!(done, BLOCK_SIZE);
        assert!(out_l[..BLOCK_SIZE].iter().all(|&s| (s - 0.25).abs() < 1e-7));
        assert!(out_l[BLOCK_SIZE..].iter().all(|&s| s == 7.0));

        let done = router.process_chunk(
            &input,
            &short,
            &mut out_l,
            &mut out_r,
            &MixGains::DRY,
            &mut early,
            &mut late,
        );
        assert_eq!(done, 10);
    }
}
