//! Host-value storage and unit scaling.
//!
//! The store holds only what no engine owns: the four macro steps and the
//! four mix gains. Every other parameter lives in an engine and is reached
//! through its setter/getter pair, so a read always reflects what the
//! engine is actually running with.
//!
//! | Parameter | Written to the engine as | Read back as |
//! |-----------|--------------------------|--------------|
//! | levels, send | stored locally as `% / 100` | `× 100` |
//! | early size | `m / 7` | `× 7` |
//! | late size | `m / 80` | `× 80` |
//! | widths | `% / 100` | `× 100` |
//! | diffuse | diffusion and tank feedback, both `% / 100 × 0.75` | `diffusion / 0.75 × 100` |
//! | everything else | unchanged | unchanged |

use hibiki_core::{EarlyReflectionEngine, LateReverbEngine};

use crate::mapping::{HighLevelMapper, HighLevelSettings, Step};
use crate::params::{PARAM_COUNT, ParamIndex};

/// Host percent per engine fraction.
pub const PERCENT: f32 = 100.0;

/// Host metres per unit of early room scale.
pub const EARLY_SIZE_SCALE: f32 = 7.0;

/// Host metres per unit of late room scale.
pub const LATE_SIZE_SCALE: f32 = 80.0;

/// Diffusion and tank feedback at 100 % diffuse.
pub const DIFFUSION_SCALE: f32 = 0.75;

/// Output and send gains, as linear fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixGains {
    /// Dry input level.
    pub dry: f32,
    /// Early-reflection level.
    pub early: f32,
    /// Share of the early output fed into the late stage.
    pub early_send: f32,
    /// Late-reverb level.
    pub late: f32,
}

impl MixGains {
    /// Dry signal only.
    pub const DRY: MixGains = MixGains {
        dry: 1.0,
        early: 0.0,
        early_send: 0.0,
        late: 0.0,
    };
}

impl Default for MixGains {
    /// Gains of the default macro settings.
    fn default() -> Self {
        let derived = HighLevelMapper::hall().derive(&HighLevelSettings::default());
        Self {
            dry: derived.dry_level / PERCENT,
            early: derived.early_level / PERCENT,
            early_send: derived.early_send / PERCENT,
            late: derived.late_level / PERCENT,
        }
    }
}

/// Macro steps, mix gains and the scaling to and from engine units.
///
/// Values are not checked against descriptor ranges here; that is the
/// host boundary's job.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    settings: HighLevelSettings,
    gains: MixGains,
    mapper: HighLevelMapper,
}

impl ParameterStore {
    /// Store at the default macro settings.
    ///
    /// The engines are not touched; call [`apply_settings`](Self::apply_settings)
    /// to bring them in line.
    pub fn new(mapper: HighLevelMapper) -> Self {
        Self {
            settings: HighLevelSettings::default(),
            gains: MixGains::default(),
            mapper,
        }
    }

    /// Current macro steps.
    pub fn settings(&self) -> HighLevelSettings {
        self.settings
    }

    /// Current mix gains.
    pub fn gains(&self) -> &MixGains {
        &self.gains
    }

    /// Mapper driving the macros.
    pub fn mapper(&self) -> &HighLevelMapper {
        &self.mapper
    }

    /// Host value of parameter `index`. Unknown indices read as `0.0`.
    pub fn get<E, L>(&self, index: usize, early: &E, late: &L) -> f32
    where
        E: EarlyReflectionEngine,
        L: LateReverbEngine,
    {
        let Some(param) = ParamIndex::from_index(index) else {
            return 0.0;
        };
        match param {
            ParamIndex::Size | ParamIndex::Shape | ParamIndex::Tonality | ParamIndex::Presence => {
                self.settings.get(param).map_or(0.0, Step::value)
            }
            ParamIndex::DryLevel => self.gains.dry * PERCENT,
            ParamIndex::EarlyLevel => self.gains.early * PERCENT,
            ParamIndex::LateLevel => self.gains.late * PERCENT,
            ParamIndex::EarlySize => early.room_scale() * EARLY_SIZE_SCALE,
            ParamIndex::EarlyWidth => early.width() * PERCENT,
            ParamIndex::EarlyLowPass => early.output_lpf(),
            ParamIndex::EarlyHighPass => early.output_hpf(),
            ParamIndex::EarlySend => self.gains.early_send * PERCENT,
            ParamIndex::LatePredelay => late.predelay_ms(),
            ParamIndex::LateDecay => late.rt60(),
            ParamIndex::LateSize => late.room_scale() * LATE_SIZE_SCALE,
            ParamIndex::LateWidth => late.width() * PERCENT,
            ParamIndex::LateLowPass => late.output_lpf(),
            ParamIndex::LateHighPass => late.output_hpf(),
            ParamIndex::Diffuse => late.input_diffusion() / DIFFUSION_SCALE * PERCENT,
            ParamIndex::LowCrossover => late.crossover_low(),
            ParamIndex::LowDecayMult => late.low_decay_mult(),
            ParamIndex::HighCrossover => late.crossover_high(),
            ParamIndex::HighDecayMult => late.high_decay_mult(),
            ParamIndex::Spin => late.spin(),
            ParamIndex::Wander => late.wander(),
        }
    }

    /// Write host value `value` to parameter `index`.
    ///
    /// A macro write rounds to a [`Step`] and rewrites all 21 derived
    /// parameters before returning. Unknown indices are ignored.
    pub fn set<E, L>(&mut self, index: usize, value: f32, early: &mut E, late: &mut L)
    where
        E: EarlyReflectionEngine,
        L: LateReverbEngine,
    {
        let Some(param) = ParamIndex::from_index(index) else {
            return;
        };
        if param.is_macro() {
            let mut settings = self.settings;
            settings.set(param, Step::from_host(value));
            self.apply_settings(settings, early, late);
        } else {
            self.set_detail(param, value, early, late);
        }
    }

    /// Replace all four macro steps and rewrite the derived parameters.
    pub fn apply_settings<E, L>(&mut self, settings: HighLevelSettings, early: &mut E, late: &mut L)
    where
        E: EarlyReflectionEngine,
        L: LateReverbEngine,
    {
        self.settings = settings;
        let derived = self.mapper.derive(&settings);
        for (param, value) in derived.entries() {
            self.set_detail(param, value, early, late);
        }
    }

    /// Host values of all parameters, in table order.
    pub fn snapshot<E, L>(&self, early: &E, late: &L) -> [f32; PARAM_COUNT]
    where
        E: EarlyReflectionEngine,
        L: LateReverbEngine,
    {
        core::array::from_fn(|i| self.get(i, early, late))
    }

    fn set_detail<E, L>(&mut self, param: ParamIndex, value: f32, early: &mut E, late: &mut L)
    where
        E: EarlyReflectionEngine,
        L: LateReverbEngine,
    {
        match param {
            // Macros go through `set`.
            ParamIndex::Size | ParamIndex::Shape | ParamIndex::Tonality | ParamIndex::Presence => {}
            ParamIndex::DryLevel => self.gains.dry = value / PERCENT,
            ParamIndex::EarlyLevel => self.gains.early = value / PERCENT,
            ParamIndex::LateLevel => self.gains.late = value / PERCENT,
            ParamIndex::EarlySize => early.set_room_scale(value / EARLY_SIZE_SCALE),
            ParamIndex::EarlyWidth => early.set_width(value / PERCENT),
            ParamIndex::EarlyLowPass => early.set_output_lpf(value),
            ParamIndex::EarlyHighPass => early.set_output_hpf(value),
            ParamIndex::EarlySend => self.gains.early_send = value / PERCENT,
            ParamIndex::LatePredelay => late.set_predelay_ms(value),
            ParamIndex::LateDecay => late.set_rt60(value),
            ParamIndex::LateSize => late.set_room_scale(value / LATE_SIZE_SCALE),
            ParamIndex::LateWidth => late.set_width(value / PERCENT),
            ParamIndex::LateLowPass => late.set_output_lpf(value),
            ParamIndex::LateHighPass => late.set_output_hpf(value),
            ParamIndex::Diffuse => {
                let amount = value / PERCENT * DIFFUSION_SCALE;
                late.set_input_diffusion(amount);
                late.set_allpass_feedback(amount);
            }
            ParamIndex::LowCrossover => late.set_crossover_low(value),
            ParamIndex::LowDecayMult => late.set_low_decay_mult(value),
            ParamIndex::HighCrossover => late.set_crossover_high(value),
            ParamIndex::HighDecayMult => late.set_high_decay_mult(value),
            ParamIndex::Spin => late.set_spin(value),
            ParamIndex::Wander => late.set_wander(value),
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(HighLevelMapper::hall())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hibiki_engines::{EarlyReflections, LateReverb};

    fn fixture() -> (ParameterStore, EarlyReflections, LateReverb) {
        let mut store = ParameterStore::default();
        let mut early = EarlyReflections::new(48000.0);
        let mut late = LateReverb::new(48000.0);
        store.apply_settings(HighLevelSettings::default(), &mut early, &mut late);
        (store, early, late)
    }

    #[test]
    fn unknown_index_reads_zero_and_ignores_writes() {
        let (mut store, mut early, mut late) = fixture();
        let before = store.snapshot(&early, &late);
        assert_eq!(store.get(25, &early, &late), 0.0);
        assert_eq!(store.get(usize::MAX, &early, &late), 0.0);
        store.set(25, 99.0, &mut early, &mut late);
        assert_eq!(store.snapshot(&early, &late), before);
    }

    #[test]
    fn scaling_reaches_engines_in_native_units() {
        let (mut store, mut early, mut late) = fixture();
        store.set(ParamIndex::EarlySize.index(), 7.0, &mut early, &mut late);
        assert_eq!(early.room_scale(), 1.0);
        store.set(ParamIndex::LateSize.index(), 40.0, &mut early, &mut late);
        assert_eq!(late.room_scale(), 0.5);
        store.set(ParamIndex::Diffuse.index(), 100.0, &mut early, &mut late);
        assert_eq!(late.input_diffusion(), 0.75);
        assert_eq!(late.allpass_feedback(), 0.75);
        store.set(ParamIndex::EarlySend.index(), 45.0, &mut early, &mut late);
        assert!((store.gains().early_send - 0.45).abs() < 1e-7);
    }

    #[test]
    fn diffuse_reads_back_in_percent() {
        let (mut store, mut early, mut late) = fixture();
        assert!((store.get(ParamIndex::Diffuse.index(), &early, &late) - 90.0).abs() < 1e-4);
        store.set(ParamIndex::Diffuse.index(), 37.0, &mut early, &mut late);
        assert!((store.get(ParamIndex::Diffuse.index(), &early, &late) - 37.0).abs() < 1e-4);
    }

    #[test]
    fn macro_write_rounds_and_clamps() {
        let (mut store, mut early, mut late) = fixture();
        store.set(ParamIndex::Size.index(), 3.6, &mut early, &mut late);
        assert_eq!(store.settings().size, Step::S4);
        store.set(ParamIndex::Size.index(), 17.0, &mut early, &mut late);
        assert_eq!(store.get(ParamIndex::Size.index(), &early, &late), 4.0);
        store.set(ParamIndex::Size.index(), -2.0, &mut early, &mut late);
        assert_eq!(store.get(ParamIndex::Size.index(), &early, &late), 0.0);
    }

    #[test]
    fn default_gains_match_medium_presence() {
        let gains = MixGains::default();
        assert_eq!(gains.dry, 0.5);
        assert_eq!(gains.early, 0.25);
        assert_eq!(gains.early_send, 0.3);
        assert_eq!(gains.late, 0.5);
    }
}
