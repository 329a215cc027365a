//! Macro-to-detail parameter mapping.
//!
//! Four perceptual macros (size, shape, tonality, presence) each take one
//! of five [`Step`]s. Together they select 21 detailed values from
//! five-entry lookup tables:
//!
//! ```text
//! dry/early/late level  = by_presence[presence]
//! early size            = by_size[size] × shape_mul[shape]
//! early width           = by_shape[shape]
//! early/late low pass   = by_size[size] × tonality_mul[tonality]
//! late predelay         = by_size[size] × presence_mul[presence]
//! late decay            = by_size[size] × tonality_mul[tonality]
//! late size             = by_size[size] × shape_mul[shape]
//! late width            = 0.80 + shape × 10
//! crossovers            = by_size[size]
//! low/high multiplier   = by_size[size] × tonality_mul[tonality]
//! spin, wander          = by_size[size]
//! early/late high pass, early send, diffuse: fixed
//! ```
//!
//! [`HighLevelMapper::derive`] is a pure function of the settings and the
//! tables it was built with; applying the result is the store's job.

use crate::error::HallError;
use crate::params::ParamIndex;

/// One of the five positions of a macro knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Step {
    /// Lowest setting.
    S0 = 0,
    /// Second setting.
    S1,
    /// Middle setting (the default design point).
    #[default]
    S2,
    /// Fourth setting.
    S3,
    /// Highest setting.
    S4,
}

impl Step {
    /// All steps in ascending order.
    pub const ALL: [Step; 5] = [Step::S0, Step::S1, Step::S2, Step::S3, Step::S4];

    /// Position as a table index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Position as the host sees it.
    #[inline]
    pub const fn value(self) -> f32 {
        self as u8 as f32
    }

    /// Convert a host value: round to nearest (`floor(v + 0.5)`), then
    /// clamp into `0..=4`. NaN maps to the default step.
    ///
    /// ```rust
    /// use hibiki_hall::Step;
    ///
    /// assert_eq!(Step::from_host(2.49), Step::S2);
    /// assert_eq!(Step::from_host(2.5), Step::S3);
    /// assert_eq!(Step::from_host(-3.0), Step::S0);
    /// assert_eq!(Step::from_host(9.0), Step::S4);
    /// ```
    pub fn from_host(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        let rounded = (value + 0.5).floor().clamp(0.0, 4.0);
        Self::ALL[rounded as usize]
    }
}

impl TryFrom<u32> for Step {
    type Error = HallError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Step::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| HallError::invalid("macro step", value, "0..=4"))
    }
}

impl From<Step> for u32 {
    fn from(step: Step) -> Self {
        step as u32
    }
}

/// The four macro settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HighLevelSettings {
    /// Room size.
    pub size: Step,
    /// Room shape.
    pub shape: Step,
    /// Tonality, dark to bright.
    pub tonality: Step,
    /// Presence, distant to close.
    pub presence: Step,
}

impl HighLevelSettings {
    /// Step of a macro parameter; `None` for non-macro parameters.
    pub fn get(&self, param: ParamIndex) -> Option<Step> {
        match param {
            ParamIndex::Size => Some(self.size),
            ParamIndex::Shape => Some(self.shape),
            ParamIndex::Tonality => Some(self.tonality),
            ParamIndex::Presence => Some(self.presence),
            _ => None,
        }
    }

    /// Set a macro parameter. Returns `false` (and changes nothing) for
    /// non-macro parameters.
    pub fn set(&mut self, param: ParamIndex, step: Step) -> bool {
        let slot = match param {
            ParamIndex::Size => &mut self.size,
            ParamIndex::Shape => &mut self.shape,
            ParamIndex::Tonality => &mut self.tonality,
            ParamIndex::Presence => &mut self.presence,
            _ => return false,
        };
        *slot = step;
        true
    }
}

/// A five-entry lookup table indexed by [`Step`].
pub type StepTable = [f32; 5];

#[inline]
fn at(table: &StepTable, step: Step) -> f32 {
    table[step.index()]
}

/// Lookup tables and fixed values behind the macros.
///
/// Levels are in percent, sizes in metres, filters in Hz, times in ms or
/// seconds, multipliers plain.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroTables {
    /// Dry level by presence.
    pub dry_by_presence: StepTable,
    /// Early level by presence.
    pub early_by_presence: StepTable,
    /// Late level by presence.
    pub late_by_presence: StepTable,

    /// Early size by size.
    pub early_size_by_size: StepTable,
    /// Early size multiplier by shape.
    pub early_size_shape_mul: StepTable,
    /// Early width by shape.
    pub early_width_by_shape: StepTable,
    /// Early low pass by size.
    pub early_lpf_by_size: StepTable,
    /// Early low pass multiplier by tonality.
    pub early_lpf_tonality_mul: StepTable,

    /// Late predelay by size.
    pub late_predelay_by_size: StepTable,
    /// Late predelay multiplier by presence.
    pub late_predelay_presence_mul: StepTable,
    /// Late decay by size.
    pub late_decay_by_size: StepTable,
    /// Late decay multiplier by tonality.
    pub late_decay_tonality_mul: StepTable,
    /// Late size by size.
    pub late_size_by_size: StepTable,
    /// Late size multiplier by shape.
    pub late_size_shape_mul: StepTable,
    /// Late low pass by size.
    pub late_lpf_by_size: StepTable,
    /// Late low pass multiplier by tonality.
    pub late_lpf_tonality_mul: StepTable,

    /// Low crossover by size.
    pub low_xover_by_size: StepTable,
    /// Low decay multiplier by size.
    pub low_mult_by_size: StepTable,
    /// Low decay multiplier scale by tonality.
    pub low_mult_tonality_mul: StepTable,
    /// High crossover by size.
    pub high_xover_by_size: StepTable,
    /// High decay multiplier by size.
    pub high_mult_by_size: StepTable,
    /// High decay multiplier scale by tonality.
    pub high_mult_tonality_mul: StepTable,

    /// Spin by size.
    pub spin_by_size: StepTable,
    /// Wander by size.
    pub wander_by_size: StepTable,

    /// Late width at shape 0, in percent.
    pub late_width_base: f32,
    /// Late width added per shape step, in percent.
    pub late_width_per_shape: f32,

    /// Fixed early high pass.
    pub early_hpf: f32,
    /// Fixed early send.
    pub early_send: f32,
    /// Fixed late high pass.
    pub late_hpf: f32,
    /// Fixed diffusion. No macro drives it yet.
    pub diffuse: f32,
}

/// Tables of the hall algorithm.
pub const HALL_TABLES: MacroTables = MacroTables {
    dry_by_presence: [70.0, 60.0, 50.0, 40.0, 30.0],
    early_by_presence: [75.0, 50.0, 25.0, 0.0, 0.0],
    late_by_presence: [40.0, 45.0, 50.0, 55.0, 60.0],

    early_size_by_size: [3.0, 4.0, 5.0, 6.0, 7.0],
    early_size_shape_mul: [1.2, 1.1, 1.0, 0.9, 0.8],
    early_width_by_shape: [40.0, 60.0, 80.0, 100.0, 120.0],
    early_lpf_by_size: [9000.0, 8000.0, 7000.0, 6000.0, 5000.0],
    early_lpf_tonality_mul: [0.5, 0.75, 1.0, 1.25, 1.5],

    late_predelay_by_size: [12.0, 24.0, 36.0, 48.0, 60.0],
    late_predelay_presence_mul: [1.0, 0.75, 0.5, 0.25, 0.0],
    late_decay_by_size: [0.75, 1.5, 2.25, 3.0, 4.0],
    late_decay_tonality_mul: [0.8, 0.9, 1.0, 1.1, 1.2],
    late_size_by_size: [12.0, 24.0, 36.0, 48.0, 60.0],
    late_size_shape_mul: [1.2, 1.1, 1.0, 0.9, 0.8],
    late_lpf_by_size: [7000.0, 6000.0, 5000.0, 4500.0, 4000.0],
    late_lpf_tonality_mul: [0.5, 0.75, 1.0, 1.25, 1.5],

    low_xover_by_size: [400.0, 500.0, 600.0, 700.0, 800.0],
    low_mult_by_size: [0.9, 1.5, 2.0, 2.5, 3.0],
    low_mult_tonality_mul: [1.2, 1.1, 1.0, 0.9, 0.8],
    high_xover_by_size: [6000.0, 5500.0, 4500.0, 4000.0, 3000.0],
    high_mult_by_size: [0.5, 0.4, 0.35, 0.32, 0.30],
    high_mult_tonality_mul: [0.9, 1.0, 1.0, 1.1, 1.2],

    spin_by_size: [0.3, 2.5, 2.9, 2.1, 1.9],
    wander_by_size: [27.0, 13.0, 15.0, 20.0, 17.0],

    late_width_base: 0.80,
    late_width_per_shape: 10.0,

    early_hpf: 4.0,
    early_send: 30.0,
    late_hpf: 4.0,
    diffuse: 90.0,
};

/// The 21 values the macros drive, in host units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedParameters {
    /// Dry level, %.
    pub dry_level: f32,
    /// Early level, %.
    pub early_level: f32,
    /// Late level, %.
    pub late_level: f32,
    /// Early size, m.
    pub early_size: f32,
    /// Early width, %.
    pub early_width: f32,
    /// Early low pass, Hz.
    pub early_lpf: f32,
    /// Early high pass, Hz.
    pub early_hpf: f32,
    /// Early send, %.
    pub early_send: f32,
    /// Late predelay, ms.
    pub late_predelay: f32,
    /// Late decay, s.
    pub late_decay: f32,
    /// Late size, m.
    pub late_size: f32,
    /// Late width, %.
    pub late_width: f32,
    /// Late low pass, Hz.
    pub late_lpf: f32,
    /// Late high pass, Hz.
    pub late_hpf: f32,
    /// Diffusion, %.
    pub diffuse: f32,
    /// Low crossover, Hz.
    pub low_xover: f32,
    /// Low decay multiplier.
    pub low_mult: f32,
    /// High crossover, Hz.
    pub high_xover: f32,
    /// High decay multiplier.
    pub high_mult: f32,
    /// Spin, Hz.
    pub spin: f32,
    /// Wander, ms.
    pub wander: f32,
}

impl DerivedParameters {
    /// Each value paired with the parameter it is written to, in table
    /// order.
    pub fn entries(&self) -> [(ParamIndex, f32); 21] {
        [
            (ParamIndex::DryLevel, self.dry_level),
            (ParamIndex::EarlyLevel, self.early_level),
            (ParamIndex::LateLevel, self.late_level),
            (ParamIndex::EarlySize, self.early_size),
            (ParamIndex::EarlyWidth, self.early_width),
            (ParamIndex::EarlyLowPass, self.early_lpf),
            (ParamIndex::EarlyHighPass, self.early_hpf),
            (ParamIndex::EarlySend, self.early_send),
            (ParamIndex::LatePredelay, self.late_predelay),
            (ParamIndex::LateDecay, self.late_decay),
            (ParamIndex::LateSize, self.late_size),
            (ParamIndex::LateWidth, self.late_width),
            (ParamIndex::LateLowPass, self.late_lpf),
            (ParamIndex::LateHighPass, self.late_hpf),
            (ParamIndex::Diffuse, self.diffuse),
            (ParamIndex::LowCrossover, self.low_xover),
            (ParamIndex::LowDecayMult, self.low_mult),
            (ParamIndex::HighCrossover, self.high_xover),
            (ParamIndex::HighDecayMult, self.high_mult),
            (ParamIndex::Spin, self.spin),
            (ParamIndex::Wander, self.wander),
        ]
    }
}

/// Computes [`DerivedParameters`] from [`HighLevelSettings`].
///
/// # Example
///
/// ```rust
/// use hibiki_hall::{HighLevelMapper, HighLevelSettings, Step};
///
/// let mapper = HighLevelMapper::hall();
/// let derived = mapper.derive(&HighLevelSettings {
///     presence: Step::S4,
///     ..HighLevelSettings::default()
/// });
/// assert_eq!(derived.dry_level, 30.0);
/// assert_eq!(derived.late_predelay, 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HighLevelMapper {
    tables: &'static MacroTables,
}

impl HighLevelMapper {
    /// Mapper over the given tables.
    pub const fn new(tables: &'static MacroTables) -> Self {
        Self { tables }
    }

    /// Mapper over [`HALL_TABLES`].
    pub const fn hall() -> Self {
        Self::new(&HALL_TABLES)
    }

    /// Tables in use.
    pub fn tables(&self) -> &'static MacroTables {
        self.tables
    }

    /// Evaluate every mapping at `settings`.
    pub fn derive(&self, settings: &HighLevelSettings) -> DerivedParameters {
        let t = self.tables;
        let HighLevelSettings {
            size,
            shape,
            tonality,
            presence,
        } = *settings;

        DerivedParameters {
            dry_level: at(&t.dry_by_presence, presence),
            early_level: at(&t.early_by_presence, presence),
            late_level: at(&t.late_by_presence, presence),

            early_size: at(&t.early_size_by_size, size) * at(&t.early_size_shape_mul, shape),
            early_width: at(&t.early_width_by_shape, shape),
            early_lpf: at(&t.early_lpf_by_size, size) * at(&t.early_lpf_tonality_mul, tonality),
            early_hpf: t.early_hpf,
            early_send: t.early_send,

            late_predelay: at(&t.late_predelay_by_size, size)
                * at(&t.late_predelay_presence_mul, presence),
            late_decay: at(&t.late_decay_by_size, size) * at(&t.late_decay_tonality_mul, tonality),
            late_size: at(&t.late_size_by_size, size) * at(&t.late_size_shape_mul, shape),
            late_width: t.late_width_base + shape.value() * t.late_width_per_shape,
            late_lpf: at(&t.late_lpf_by_size, size) * at(&t.late_lpf_tonality_mul, tonality),
            late_hpf: t.late_hpf,

            diffuse: t.diffuse,

            low_xover: at(&t.low_xover_by_size, size),
            low_mult: at(&t.low_mult_by_size, size) * at(&t.low_mult_tonality_mul, tonality),
            high_xover: at(&t.high_xover_by_size, size),
            high_mult: at(&t.high_mult_by_size, size) * at(&t.high_mult_tonality_mul, tonality),

            spin: at(&t.spin_by_size, size),
            wander: at(&t.wander_by_size, size),
        }
    }
}

impl Default for HighLevelMapper {
    fn default() -> Self {
        Self::hall()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_values_round_half_up() {
        assert_eq!(Step::from_host(0.0), Step::S0);
        assert_eq!(Step::from_host(0.49), Step::S0);
        assert_eq!(Step::from_host(0.5), Step::S1);
        assert_eq!(Step::from_host(3.7), Step::S4);
        assert_eq!(Step::from_host(-0.5), Step::S0);
        assert_eq!(Step::from_host(f32::NAN), Step::S2);
        assert_eq!(Step::from_host(f32::INFINITY), Step::S4);
        assert_eq!(Step::from_host(f32::NEG_INFINITY), Step::S0);
    }

    #[test]
    fn strict_conversion_rejects_out_of_range() {
        assert_eq!(Step::try_from(4).ok(), Some(Step::S4));
        let err = Step::try_from(5).err();
        assert!(matches!(err, Some(HallError::InvalidArgument { .. })));
        assert_eq!(u32::from(Step::S3), 3);
    }

    #[test]
    fn settings_only_accept_macros() {
        let mut s = HighLevelSettings::default();
        assert!(s.set(ParamIndex::Tonality, Step::S0));
        assert_eq!(s.get(ParamIndex::Tonality), Some(Step::S0));
        assert!(!s.set(ParamIndex::Spin, Step::S4));
        assert_eq!(s.get(ParamIndex::Spin), None);
        assert_eq!(s, HighLevelSettings { tonality: Step::S0, ..HighLevelSettings::default() });
    }

    #[test]
    fn medium_design_point() {
        let d = HighLevelMapper::hall().derive(&HighLevelSettings::default());
        assert_eq!(d.dry_level, 50.0);
        assert_eq!(d.early_level, 25.0);
        assert_eq!(d.late_level, 50.0);
        assert_eq!(d.early_size, 5.0);
        assert_eq!(d.early_width, 80.0);
        assert_eq!(d.early_lpf, 7000.0);
        assert_eq!(d.late_predelay, 18.0);
        assert_eq!(d.late_decay, 2.25);
        assert_eq!(d.late_size, 36.0);
        assert!((d.late_width - 20.8).abs() < 1e-5);
        assert_eq!(d.late_lpf, 5000.0);
        assert_eq!(d.diffuse, 90.0);
        assert_eq!(d.low_xover, 600.0);
        assert_eq!(d.low_mult, 2.0);
        assert_eq!(d.high_xover, 4500.0);
        assert_eq!(d.high_mult, 0.35);
        assert_eq!(d.spin, 2.9);
        assert_eq!(d.wander, 15.0);
    }

    #[test]
    fn entries_cover_every_detail_parameter_once() {
        let d = HighLevelMapper::hall().derive(&HighLevelSettings::default());
        let entries = d.entries();
        for (n, (param, _)) in entries.iter().enumerate() {
            assert_eq!(param.index(), n + 4);
        }
    }
}
