//! Lock-free parameter bridge between a control thread and the audio
//! thread.
//!
//! [`HallShared`] is the control side. Writes go into a bounded queue with
//! `try_send`, so they never block. When the queue is full the newest
//! change is dropped and counted. Reads come from an atomic snapshot
//! (f32 bit-cast into `AtomicU32`) that the audio side republishes after
//! applying changes.
//!
//! [`HallProcessor`] is the audio side. It owns the [`HallReverb`] and
//! drains pending changes at every sub-block boundary inside
//! [`run`](HallProcessor::run).
//!
//! ```rust
//! use hibiki_hall::{HallProcessor, HallReverb, HallShared, ParamIndex};
//!
//! let shared = HallShared::new(64);
//! let mut processor = HallProcessor::new(HallReverb::new(48000.0), shared.clone());
//!
//! // Control thread
//! shared.set_parameter_value(ParamIndex::LateDecay.index(), 4.0);
//!
//! // Audio thread
//! let input = [0.0f32; 128];
//! let (mut l, mut r) = ([0.0f32; 128], [0.0f32; 128]);
//! processor.run([&input, &input], [&mut l, &mut r], 128);
//!
//! assert_eq!(shared.get_parameter_value(ParamIndex::LateDecay.index()), 4.0);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use hibiki_core::{EarlyReflectionEngine, LateReverbEngine};
use hibiki_engines::{EarlyReflections, LateReverb};

use crate::hall::HallReverb;
use crate::params::{PARAM_COUNT, PARAMETERS};
use crate::router::BLOCK_SIZE;

/// Queue capacity used when none is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// One pending host write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamChange {
    /// Parameter index.
    pub index: usize,
    /// Host value.
    pub value: f32,
}

#[derive(Debug)]
struct HallSharedData {
    sender: Sender<ParamChange>,
    receiver: Receiver<ParamChange>,
    /// Host values as applied by the audio side, f32 bit-cast.
    values: [AtomicU32; PARAM_COUNT],
    dropped: AtomicU64,
}

/// Control-thread handle to a running hall. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HallShared {
    inner: Arc<HallSharedData>,
}

impl HallShared {
    /// Bridge with a queue of `capacity` changes (at least 1).
    ///
    /// The snapshot starts at the descriptor defaults until a processor
    /// publishes real values.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(capacity.max(1));
        Self {
            inner: Arc::new(HallSharedData {
                sender,
                receiver,
                values: core::array::from_fn(|i| AtomicU32::new(PARAMETERS[i].default.to_bits())),
                dropped: AtomicU64::new(0),
            }),
        }
    }

    /// Queue a host write. Never blocks.
    ///
    /// Returns `false` if the change was not queued: the index is out of
    /// range, or the queue is full (the change is dropped and counted).
    pub fn set_parameter_value(&self, index: usize, value: f32) -> bool {
        if index >= PARAM_COUNT {
            return false;
        }
        match self.inner.sender.try_send(ParamChange { index, value }) {
            Ok(()) => true,
            Err(TrySendError::Full(change)) => {
                let dropped = self.inner.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    index = change.index,
                    value = change.value,
                    dropped,
                    "parameter queue full, dropping change"
                );
                false
            }
            // Unreachable while `inner` holds the receiver.
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Last host value published by the audio side; `0.0` past the end.
    pub fn get_parameter_value(&self, index: usize) -> f32 {
        self.inner
            .values
            .get(index)
            .map_or(0.0, |v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    /// Changes dropped because the queue was full.
    pub fn dropped_changes(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    /// Changes waiting for the audio side.
    pub fn pending(&self) -> usize {
        self.inner.receiver.len()
    }

    /// Queue capacity.
    pub fn capacity(&self) -> usize {
        self.inner.sender.capacity().unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }

    fn try_recv(&self) -> Option<ParamChange> {
        self.inner.receiver.try_recv().ok()
    }

    fn publish(&self, values: &[f32; PARAM_COUNT]) {
        for (slot, value) in self.inner.values.iter().zip(values) {
            slot.store(value.to_bits(), Ordering::Release);
        }
    }
}

impl Default for HallShared {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

/// Audio-thread owner of a [`HallReverb`] fed by a [`HallShared`].
#[derive(Debug)]
pub struct HallProcessor<E = EarlyReflections, L = LateReverb> {
    hall: HallReverb<E, L>,
    shared: HallShared,
}

impl<E, L> HallProcessor<E, L>
where
    E: EarlyReflectionEngine,
    L: LateReverbEngine,
{
    /// Take ownership of `hall` and publish its current values.
    pub fn new(hall: HallReverb<E, L>, shared: HallShared) -> Self {
        shared.publish(&hall.parameter_values());
        Self { hall, shared }
    }

    /// Apply queued changes in order, at most one queue capacity's worth,
    /// then republish the snapshot if anything changed. Returns the number
    /// applied.
    pub fn drain(&mut self) -> usize {
        let limit = self.shared.capacity();
        let mut applied = 0;
        while applied < limit {
            let Some(change) = self.shared.try_recv() else {
                break;
            };
            self.hall.set_parameter_value(change.index, change.value);
            applied += 1;
        }
        if applied > 0 {
            self.shared.publish(&self.hall.parameter_values());
        }
        applied
    }

    /// Render like [`HallReverb::run`], applying queued changes before
    /// every sub-block.
    pub fn run(&mut self, inputs: [&[f32]; 2], outputs: [&mut [f32]; 2], frames: usize) -> usize {
        let [in_l, in_r] = inputs;
        let [out_l, out_r] = outputs;
        let frames = frames
            .min(in_l.len())
            .min(in_r.len())
            .min(out_l.len())
            .min(out_r.len());

        let mut start = 0;
        while start < frames {
            self.drain();
            let end = (start + BLOCK_SIZE).min(frames);
            self.hall.run(
                [&in_l[start..end], &in_r[start..end]],
                [&mut out_l[start..end], &mut out_r[start..end]],
                end - start,
            );
            start = end;
        }
        frames
    }

    /// The hall, for reads.
    pub fn hall(&self) -> &HallReverb<E, L> {
        &self.hall
    }

    /// The hall, for setup calls such as
    /// [`sample_rate_changed`](HallReverb::sample_rate_changed). Direct
    /// writes are republished on the next drain that applies a change;
    /// call [`publish`](Self::publish) to republish now.
    pub fn hall_mut(&mut self) -> &mut HallReverb<E, L> {
        &mut self.hall
    }

    /// Republish the snapshot from the hall's current values.
    pub fn publish(&self) {
        self.shared.publish(&self.hall.parameter_values());
    }

    /// Control-side handle.
    pub fn shared(&self) -> &HallShared {
        &self.shared
    }

    /// Give back the hall.
    pub fn into_inner(self) -> HallReverb<E, L> {
        self.hall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamIndex;

    #[test]
    fn full_queue_drops_newest() {
        let shared = HallShared::new(2);
        assert!(shared.set_parameter_value(ParamIndex::Spin.index(), 1.0));
        assert!(shared.set_parameter_value(ParamIndex::Spin.index(), 2.0));
        assert!(!shared.set_parameter_value(ParamIndex::Spin.index(), 3.0));
        assert_eq!(shared.dropped_changes(), 1);
        assert_eq!(shared.pending(), 2);

        let mut processor = HallProcessor::new(HallReverb::new(48000.0), shared.clone());
        assert_eq!(processor.drain(), 2);
        assert_eq!(shared.get_parameter_value(ParamIndex::Spin.index()), 2.0);
    }

    #[test]
    fn out_of_range_writes_are_not_queued() {
        let shared = HallShared::default();
        assert!(!shared.set_parameter_value(PARAM_COUNT, 1.0));
        assert_eq!(shared.pending(), 0);
        assert_eq!(shared.dropped_changes(), 0);
        assert_eq!(shared.get_parameter_value(PARAM_COUNT), 0.0);
        assert_eq!(shared.capacity(), DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn processor_publishes_on_construction() {
        let shared = HallShared::new(8);
        let _processor = HallProcessor::new(HallReverb::new(48000.0), shared.clone());
        assert!((shared.get_parameter_value(ParamIndex::LateSize.index()) - 36.0).abs() < 1e-4);
        assert!((shared.get_parameter_value(ParamIndex::LateWidth.index()) - 20.8).abs() < 1e-4);
    }

    #[test]
    fn macro_change_is_visible_after_run() {
        let shared = HallShared::new(8);
        let mut processor = HallProcessor::new(HallReverb::new(48000.0), shared.clone());
        shared.set_parameter_value(ParamIndex::Presence.index(), 4.0);
        assert_eq!(shared.get_parameter_value(ParamIndex::DryLevel.index()), 50.0);

        let input = [0.0f32; 64];
        let (mut l, mut r) = ([0.0f32; 64], [0.0f32; 64]);
        processor.run([&input, &input], [&mut l, &mut r], 64);
        assert!((shared.get_parameter_value(ParamIndex::DryLevel.index()) - 30.0).abs() < 1e-4);
        assert_eq!(shared.get_parameter_value(ParamIndex::LatePredelay.index()), 0.0);
    }
}
