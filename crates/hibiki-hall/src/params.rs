//! The hall's 25 host-visible parameters.
//!
//! Index layout:
//!
//! | Index | Group |
//! |-------|-------|
//! | 0–3   | macros: size, shape, tonality, presence (steps 0–4) |
//! | 4–6   | mix levels: dry, early, late (%) |
//! | 7–11  | early stage: size, width, low pass, high pass, send |
//! | 12–24 | late stage: predelay, decay, size, width, filters, diffuse, crossovers, spin, wander |
//!
//! The order, symbols and [`ParamId`]s are part of the host contract and
//! must never change.

use hibiki_core::{ParamDescriptor, ParamFlags, ParamId, ParamUnit};

/// Base for the stable parameter IDs (`2000 + index`).
pub const PARAM_ID_BASE: u32 = 2000;

/// Number of host-visible parameters.
pub const PARAM_COUNT: usize = 25;

/// Number of macro parameters at the start of the table.
pub const MACRO_COUNT: usize = 4;

/// Position of each parameter in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum ParamIndex {
    /// Room size macro.
    Size = 0,
    /// Room shape macro.
    Shape,
    /// Tonality (dark to bright) macro.
    Tonality,
    /// Presence (distant to close) macro.
    Presence,
    /// Dry level, %.
    DryLevel,
    /// Early reflection level, %.
    EarlyLevel,
    /// Late reverb level, %.
    LateLevel,
    /// Early reflection room size, m.
    EarlySize,
    /// Early reflection stereo width, %.
    EarlyWidth,
    /// Early output low-pass, Hz.
    EarlyLowPass,
    /// Early output high-pass, Hz.
    EarlyHighPass,
    /// Share of the early output sent into the late stage, %.
    EarlySend,
    /// Late predelay, ms.
    LatePredelay,
    /// Late mid-band decay time, s.
    LateDecay,
    /// Late room size, m.
    LateSize,
    /// Late stereo width, %.
    LateWidth,
    /// Late output low-pass, Hz.
    LateLowPass,
    /// Late output high-pass, Hz.
    LateHighPass,
    /// Late diffusion, %.
    Diffuse,
    /// Low decay crossover, Hz.
    LowCrossover,
    /// Low-band decay multiplier.
    LowDecayMult,
    /// High decay crossover, Hz.
    HighCrossover,
    /// High-band decay multiplier.
    HighDecayMult,
    /// Tail modulation rate, Hz.
    Spin,
    /// Tail modulation depth, ms.
    Wander,
}

impl ParamIndex {
    /// Every parameter in table order.
    pub const ALL: [ParamIndex; PARAM_COUNT] = [
        ParamIndex::Size,
        ParamIndex::Shape,
        ParamIndex::Tonality,
        ParamIndex::Presence,
        ParamIndex::DryLevel,
        ParamIndex::EarlyLevel,
        ParamIndex::LateLevel,
        ParamIndex::EarlySize,
        ParamIndex::EarlyWidth,
        ParamIndex::EarlyLowPass,
        ParamIndex::EarlyHighPass,
        ParamIndex::EarlySend,
        ParamIndex::LatePredelay,
        ParamIndex::LateDecay,
        ParamIndex::LateSize,
        ParamIndex::LateWidth,
        ParamIndex::LateLowPass,
        ParamIndex::LateHighPass,
        ParamIndex::Diffuse,
        ParamIndex::LowCrossover,
        ParamIndex::LowDecayMult,
        ParamIndex::HighCrossover,
        ParamIndex::HighDecayMult,
        ParamIndex::Spin,
        ParamIndex::Wander,
    ];

    /// Parameter at a raw host index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Raw host index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// `true` for the four macro parameters.
    #[inline]
    pub const fn is_macro(self) -> bool {
        (self as usize) < MACRO_COUNT
    }

    /// Descriptor of this parameter.
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &PARAMETERS[self as usize]
    }
}

const fn id(index: u32) -> ParamId {
    ParamId(PARAM_ID_BASE + index)
}

const STEPPED: ParamFlags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);

const fn macro_param(name: &'static str, symbol: &'static str, index: u32) -> ParamDescriptor {
    ParamDescriptor::new(name, symbol, 0.0, 2.0, 4.0, ParamUnit::None)
        .with_id(id(index), symbol)
        .with_flags(STEPPED)
        .with_step(1.0)
}

const fn param(
    name: &'static str,
    symbol: &'static str,
    index: u32,
    range: (f32, f32, f32),
    unit: ParamUnit,
    step: f32,
) -> ParamDescriptor {
    ParamDescriptor::new(name, symbol, range.0, range.1, range.2, unit)
        .with_id(id(index), symbol)
        .with_step(step)
}

/// The parameter table, in host order. `range` is `(min, default, max)`.
pub static PARAMETERS: [ParamDescriptor; PARAM_COUNT] = [
    macro_param("Size", "size", 0),
    macro_param("Shape", "shape", 1),
    macro_param("Tonality", "tonality", 2),
    // Symbol spelling is what hosts have recorded automation against.
    macro_param("Presence", "presense", 3),
    param("Dry Level", "dry", 4, (0.0, 50.0, 100.0), ParamUnit::Percent, 1.0),
    param("Early Level", "e_lev", 5, (0.0, 50.0, 100.0), ParamUnit::Percent, 1.0),
    param("Late Level", "l_level", 6, (0.0, 50.0, 100.0), ParamUnit::Percent, 1.0),
    param("Early Size", "e_size", 7, (1.0, 5.0, 10.0), ParamUnit::Meters, 0.1),
    param("Early Width", "e_width", 8, (10.0, 40.0, 200.0), ParamUnit::Percent, 1.0),
    param("Early Low Pass", "e_lpf", 9, (2000.0, 7500.0, 20000.0), ParamUnit::Hertz, 10.0),
    param("Early High Pass", "e_hpf", 10, (0.0, 4.0, 100.0), ParamUnit::Hertz, 1.0),
    param("Early Send", "e_send", 11, (0.0, 30.0, 100.0), ParamUnit::Percent, 1.0),
    param("Late Predelay", "l_delay", 12, (0.0, 14.0, 100.0), ParamUnit::Milliseconds, 1.0),
    param("Late Decay Time", "l_time", 13, (0.1, 2.0, 10.0), ParamUnit::Seconds, 0.1),
    param("Late Size", "l_size", 14, (10.0, 40.0, 100.0), ParamUnit::Meters, 1.0),
    param("Late Width", "l_width", 15, (10.0, 90.0, 200.0), ParamUnit::Percent, 1.0),
    param("Late Low Pass", "l_lpf", 16, (2000.0, 7500.0, 20000.0), ParamUnit::Hertz, 10.0),
    param("Late High Pass", "l_hpf", 17, (0.0, 4.0, 100.0), ParamUnit::Hertz, 1.0),
    param("Diffuse", "diffuse", 18, (0.0, 80.0, 100.0), ParamUnit::Percent, 1.0),
    param("Low Crossover", "lo_xo", 19, (100.0, 600.0, 1000.0), ParamUnit::Hertz, 10.0),
    param("Low Decay Mult", "lo_mult", 20, (0.1, 1.5, 4.0), ParamUnit::Multiplier, 0.05),
    param("High Crossover", "hi_xo", 21, (1000.0, 4500.0, 20000.0), ParamUnit::Hertz, 10.0),
    param("High Decay Mult", "hi_mult", 22, (0.1, 0.4, 2.0), ParamUnit::Multiplier, 0.05),
    param("Spin", "spin", 23, (0.1, 3.0, 5.0), ParamUnit::Hertz, 0.1),
    param("Wander", "wander", 24, (0.0, 15.0, 30.0), ParamUnit::Milliseconds, 0.5),
];

/// Read-only access to [`PARAMETERS`].
///
/// # Example
///
/// ```rust
/// use hibiki_hall::ParameterTable;
///
/// let table = ParameterTable;
/// assert_eq!(table.len(), 25);
/// assert_eq!(table.describe(13).map(|d| d.name), Some("Late Decay Time"));
/// assert_eq!(table.index_of_symbol("l_time"), Some(13));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterTable;

impl ParameterTable {
    /// Descriptor at `index`, or `None` past the end.
    #[inline]
    pub fn describe(self, index: usize) -> Option<&'static ParamDescriptor> {
        PARAMETERS.get(index)
    }

    /// Number of parameters.
    #[inline]
    pub const fn len(self) -> usize {
        PARAM_COUNT
    }

    /// Always `false`; the table is fixed.
    #[inline]
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Index of the parameter whose symbol is `symbol`.
    pub fn index_of_symbol(self, symbol: &str) -> Option<usize> {
        PARAMETERS.iter().position(|d| d.short_name == symbol)
    }

    /// All descriptors in host order.
    pub fn iter(self) -> impl Iterator<Item = &'static ParamDescriptor> {
        PARAMETERS.iter()
    }
}

/// Identity reported to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    /// Short product label.
    pub label: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Author or vendor.
    pub maker: &'static str,
    /// Project home page.
    pub home_page: &'static str,
    /// License expression.
    pub license: &'static str,
    /// `(major, minor, patch)`.
    pub version: (u32, u32, u32),
    /// Four-character unique id.
    pub unique_id: [u8; 4],
}

impl PluginInfo {
    /// Identity of this build.
    pub const HALL: PluginInfo = PluginInfo {
        label: "Hibiki Hall",
        description: "A hall reverb with four perceptual macro controls",
        maker: "ampactor-labs",
        home_page: "https://github.com/ampactor-labs/hibiki",
        license: "MIT OR Apache-2.0",
        version: (0, 1, 0),
        unique_id: *b"hbk1",
    };

    /// Unique id packed big-endian, as most plugin formats expect.
    pub const fn unique_id_u32(&self) -> u32 {
        u32::from_be_bytes(self.unique_id)
    }
}
