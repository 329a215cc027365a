//! The host-facing hall reverb instance.

use hibiki_core::{
    EarlyReflectionEngine, LateReverbEngine, ParamDescriptor, ParameterInfo, StereoEngine,
};
use hibiki_engines::{EarlyReflections, LateReverb};

use crate::mapping::{HighLevelMapper, HighLevelSettings};
use crate::params::{PARAM_COUNT, ParameterTable, PluginInfo};
use crate::router::SignalRouter;
use crate::store::{MixGains, ParameterStore};

/// A complete hall reverb: parameter store, macro mapper, router and the
/// two engines.
///
/// Generic over the engines so alternatives can be dropped in; the
/// defaults are the crate's reference engines.
///
/// # Example
///
/// ```rust
/// use hibiki_hall::{HallReverb, ParamIndex};
///
/// let mut hall = HallReverb::new(48000.0);
/// hall.activate();
/// hall.set_parameter_value(ParamIndex::Presence.index(), 4.0);
/// assert!((hall.get_parameter_value(ParamIndex::DryLevel.index()) - 30.0).abs() < 1e-4);
///
/// let input = [0.0f32; 512];
/// let (mut left, mut right) = ([0.0f32; 512], [0.0f32; 512]);
/// hall.run([&input, &input], [&mut left, &mut right], 512);
/// ```
#[derive(Debug, Clone)]
pub struct HallReverb<E = EarlyReflections, L = LateReverb> {
    sample_rate: f32,
    early: E,
    late: L,
    store: ParameterStore,
    router: SignalRouter,
}

impl HallReverb {
    /// Hall with the reference engines at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_engines(
            sample_rate,
            EarlyReflections::new(sample_rate),
            LateReverb::new(sample_rate),
        )
    }
}

impl Default for HallReverb {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl<E, L> HallReverb<E, L>
where
    E: EarlyReflectionEngine,
    L: LateReverbEngine,
{
    /// Hall over caller-supplied engines.
    ///
    /// The engines are set to `sample_rate` and to the default macro
    /// settings, whatever they were configured with before.
    pub fn with_engines(sample_rate: f32, early: E, late: L) -> Self {
        Self::with_mapper(sample_rate, early, late, HighLevelMapper::hall())
    }

    /// Hall over caller-supplied engines and macro tables.
    pub fn with_mapper(
        sample_rate: f32,
        mut early: E,
        mut late: L,
        mapper: HighLevelMapper,
    ) -> Self {
        early.set_sample_rate(sample_rate);
        late.set_sample_rate(sample_rate);
        let mut store = ParameterStore::new(mapper);
        store.apply_settings(HighLevelSettings::default(), &mut early, &mut late);

        tracing::debug!(sample_rate, params = PARAM_COUNT, "hall reverb created");

        Self {
            sample_rate,
            early,
            late,
            store,
            router: SignalRouter::new(),
        }
    }

    /// Plugin identity.
    pub fn info(&self) -> &'static PluginInfo {
        &PluginInfo::HALL
    }

    /// Descriptor of parameter `index`, or `None` past the end.
    pub fn describe_parameter(&self, index: usize) -> Option<&'static ParamDescriptor> {
        ParameterTable.describe(index)
    }

    /// Host value of parameter `index`; `0.0` past the end.
    pub fn get_parameter_value(&self, index: usize) -> f32 {
        self.store.get(index, &self.early, &self.late)
    }

    /// Set parameter `index` from the host.
    ///
    /// The value is clamped to the descriptor's range first (NaN becomes
    /// the default). Indices past the end are ignored.
    pub fn set_parameter_value(&mut self, index: usize, value: f32) {
        let Some(desc) = ParameterTable.describe(index) else {
            return;
        };
        self.store
            .set(index, desc.clamp(value), &mut self.early, &mut self.late);
    }

    /// Replace all four macro steps at once.
    pub fn apply_settings(&mut self, settings: HighLevelSettings) {
        self.store
            .apply_settings(settings, &mut self.early, &mut self.late);
    }

    /// Host values of all parameters.
    pub fn parameter_values(&self) -> [f32; PARAM_COUNT] {
        self.store.snapshot(&self.early, &self.late)
    }

    /// Push the current sample rate into both engines.
    ///
    /// Call before the first [`run`](Self::run), with audio stopped.
    pub fn activate(&mut self) {
        tracing::info!(sample_rate = self.sample_rate, "activating hall reverb");
        self.early.set_sample_rate(self.sample_rate);
        self.late.set_sample_rate(self.sample_rate);
    }

    /// Adopt a new host sample rate. Non-positive or non-finite rates are
    /// ignored.
    pub fn sample_rate_changed(&mut self, sample_rate: f32) {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            tracing::warn!(sample_rate, "ignoring invalid sample rate");
            return;
        }
        tracing::info!(from = self.sample_rate, to = sample_rate, "sample rate changed");
        self.sample_rate = sample_rate;
        self.activate();
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Render `frames` frames from `inputs` into `outputs`.
    ///
    /// `frames` is clamped to the shortest buffer; the number actually
    /// rendered is returned. Never allocates.
    pub fn run(&mut self, inputs: [&[f32]; 2], outputs: [&mut [f32]; 2], frames: usize) -> usize {
        self.router.run(
            inputs,
            outputs,
            frames,
            self.store.gains(),
            &mut self.early,
            &mut self.late,
        )
    }

    /// Clear the engines' audio state, keeping all parameters.
    pub fn reset(&mut self) {
        self.early.reset();
        self.late.reset();
    }

    /// Current macro steps.
    pub fn settings(&self) -> HighLevelSettings {
        self.store.settings()
    }

    /// Current mix gains.
    pub fn gains(&self) -> &MixGains {
        self.store.gains()
    }

    /// Early-reflection engine.
    pub fn early(&self) -> &E {
        &self.early
    }

    /// Late-reverb engine.
    pub fn late(&self) -> &L {
        &self.late
    }
}

impl<E, L> ParameterInfo for HallReverb<E, L>
where
    E: EarlyReflectionEngine,
    L: LateReverbEngine,
{
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.describe_parameter(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        self.get_parameter_value(index)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        self.set_parameter_value(index, value);
    }
}
