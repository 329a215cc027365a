//! Parameter metadata for host-visible controls.
//!
//! A [`ParamDescriptor`] carries everything a host needs to present and
//! automate one parameter: display name, short symbol, range, unit, and a
//! stable identifier. Descriptors are `const`-constructible so a complete
//! parameter table can live in a `static` and be shared process-wide.
//!
//! - [`ParamId`] - stable numeric ID for automation recording
//! - [`ParamFlags`] - capability flags (automatable, stepped)
//! - [`ParameterInfo`] - index-based get/set over a parameter set
//!
//! # Example
//!
//! ```rust
//! use hibiki_core::{ParamDescriptor, ParamFlags, ParamId, ParamUnit};
//!
//! const DECAY: ParamDescriptor =
//!     ParamDescriptor::new("Late Decay Time", "l_time", 0.1, 2.0, 10.0, ParamUnit::Seconds)
//!         .with_id(ParamId(2013), "l_time");
//!
//! assert_eq!(DECAY.clamp(20.0), 10.0);
//! assert!(DECAY.flags.contains(ParamFlags::AUTOMATABLE));
//! ```

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter:
/// hosts key automation lanes on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// # Example
///
/// ```rust
/// use hibiki_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::AUTOMATABLE.contains(flags));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter only takes whole-number values.
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Index-based access to a set of parameters.
///
/// Reads outside `0..param_count()` return `0.0`; writes outside it are
/// ignored. Neither ever panics.
pub trait ParameterInfo {
    /// Number of parameters. Valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for `index`, or `None` when out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current host-facing value of the parameter at `index`.
    fn get_param(&self, index: usize) -> f32;

    /// Write the host-facing value of the parameter at `index`.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter by its `string_id` (exact match) or its display
    /// name (case-insensitive).
    fn find_param(&self, key: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|d| {
                d.string_id == key || d.name.eq_ignore_ascii_case(key)
            })
        })
    }
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name (e.g. "Late Decay Time").
    pub name: &'static str,

    /// Short symbol, at most 8 characters (e.g. "l_time").
    pub short_name: &'static str,

    /// Unit for display.
    pub unit: ParamUnit,

    /// Minimum host value.
    pub min: f32,

    /// Maximum host value.
    pub max: f32,

    /// Value at construction.
    pub default: f32,

    /// Recommended increment for encoders and drag widgets.
    pub step: f32,

    /// Stable numeric ID. `ParamId(0)` means unassigned.
    pub id: ParamId,

    /// Stable textual ID used by configuration files and the CLI.
    pub string_id: &'static str,

    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Descriptor with the given range and unit and only the `AUTOMATABLE`
    /// flag.
    pub const fn new(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        default: f32,
        max: f32,
        unit: ParamUnit,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// ```rust
    /// use hibiki_core::{ParamDescriptor, ParamId, ParamUnit};
    ///
    /// let desc = ParamDescriptor::new("Spin", "spin", 0.1, 3.0, 5.0, ParamUnit::Hertz)
    ///     .with_id(ParamId(2023), "spin");
    /// assert_eq!(desc.id, ParamId(2023));
    /// assert_eq!(desc.string_id, "spin");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the capability flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the encoder step.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Clamps a value to this parameter's range. NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// Unit of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Dimensionless (macro steps).
    None,
    /// Percentage (levels, widths, diffusion).
    Percent,
    /// Metres (room dimensions).
    Meters,
    /// Hertz (filter cutoffs, crossovers, modulation rate).
    Hertz,
    /// Milliseconds (predelay, wander depth).
    Milliseconds,
    /// Seconds (decay time).
    Seconds,
    /// Multiplier of the mid-band decay time.
    Multiplier,
}

impl ParamUnit {
    /// Unit label as shown next to the value.
    ///
    /// ```rust
    /// use hibiki_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Seconds.label(), "sec");
    /// assert_eq!(ParamUnit::None.label(), "");
    /// ```
    pub const fn label(&self) -> &'static str {
        match self {
            ParamUnit::None => "",
            ParamUnit::Percent => "%",
            ParamUnit::Meters => "m",
            ParamUnit::Hertz => "Hz",
            ParamUnit::Milliseconds => "ms",
            ParamUnit::Seconds => "sec",
            ParamUnit::Multiplier => "X",
        }
    }
}
