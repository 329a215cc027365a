//! TOML configuration for building a hall.
//!
//! ```toml
//! sample_rate = 48000
//! queue_capacity = 1024
//!
//! [macros]
//! size = 3
//! shape = 2
//! tonality = 1
//! presence = 2
//!
//! [overrides]
//! l_time = 3.2
//! wander = 8.0
//! ```
//!
//! Every field is optional. Macros must be integers in `0..=4`. Overrides
//! are keyed by parameter symbol and applied after the macros, in
//! parameter-table order.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HallError, Result};
use crate::hall::HallReverb;
use crate::mapping::{HighLevelSettings, Step};
use crate::params::ParameterTable;
use crate::shared::{DEFAULT_QUEUE_CAPACITY, HallShared};

fn default_sample_rate() -> u32 {
    48000
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_step() -> u32 {
    2
}

/// Macro steps as written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacroConfig {
    /// Size step.
    #[serde(default = "default_step")]
    pub size: u32,
    /// Shape step.
    #[serde(default = "default_step")]
    pub shape: u32,
    /// Tonality step.
    #[serde(default = "default_step")]
    pub tonality: u32,
    /// Presence step.
    #[serde(default = "default_step")]
    pub presence: u32,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            size: 2,
            shape: 2,
            tonality: 2,
            presence: 2,
        }
    }
}

impl MacroConfig {
    /// Strictly convert to steps. Any value above 4 is an error.
    pub fn settings(&self) -> Result<HighLevelSettings> {
        Ok(HighLevelSettings {
            size: Step::try_from(self.size)?,
            shape: Step::try_from(self.shape)?,
            tonality: Step::try_from(self.tonality)?,
            presence: Step::try_from(self.presence)?,
        })
    }
}

impl From<HighLevelSettings> for MacroConfig {
    fn from(settings: HighLevelSettings) -> Self {
        Self {
            size: settings.size.into(),
            shape: settings.shape.into(),
            tonality: settings.tonality.into(),
            presence: settings.presence.into(),
        }
    }
}

/// Everything needed to build a configured [`HallReverb`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HallConfig {
    /// Sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Capacity of the cross-thread parameter queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Macro steps.
    #[serde(default)]
    pub macros: MacroConfig,

    /// Parameter overrides by symbol, in host units.
    #[serde(default)]
    pub overrides: BTreeMap<String, f32>,
}

impl Default for HallConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            macros: MacroConfig::default(),
            overrides: BTreeMap::new(),
        }
    }
}

impl HallConfig {
    /// Parse and validate a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: HallConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| HallError::config_read(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            overrides = config.overrides.len(),
            "loaded hall config"
        );
        Ok(config)
    }

    /// Check every field without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(HallError::invalid("sample_rate", self.sample_rate, "> 0"));
        }
        if self.queue_capacity == 0 {
            return Err(HallError::invalid("queue_capacity", self.queue_capacity, "> 0"));
        }
        self.macros.settings()?;
        self.resolved_overrides()?;
        Ok(())
    }

    /// Overrides as `(index, value)` pairs in table order.
    pub fn resolved_overrides(&self) -> Result<Vec<(usize, f32)>> {
        let mut resolved = self
            .overrides
            .iter()
            .map(|(symbol, &value)| {
                let index = ParameterTable
                    .index_of_symbol(symbol)
                    .ok_or_else(|| HallError::UnknownSymbol(symbol.clone()))?;
                if !value.is_finite() {
                    return Err(HallError::invalid("override", value, "a finite number"));
                }
                Ok((index, value))
            })
            .collect::<Result<Vec<_>>>()?;
        resolved.sort_by_key(|&(index, _)| index);
        Ok(resolved)
    }

    /// Build a hall at the configured rate, macros and overrides.
    ///
    /// Override values are clamped to their descriptor ranges like any
    /// host write.
    pub fn build(&self) -> Result<HallReverb> {
        let settings = self.macros.settings()?;
        let overrides = self.resolved_overrides()?;
        if self.sample_rate == 0 {
            return Err(HallError::invalid("sample_rate", self.sample_rate, "> 0"));
        }

        let mut hall = HallReverb::new(self.sample_rate as f32);
        hall.apply_settings(settings);
        for (index, value) in overrides {
            hall.set_parameter_value(index, value);
        }
        tracing::debug!(
            sample_rate = self.sample_rate,
            ?settings,
            overrides = self.overrides.len(),
            "built hall from config"
        );
        Ok(hall)
    }

    /// Control handle sized to `queue_capacity`.
    pub fn shared(&self) -> HallShared {
        HallShared::new(self.queue_capacity)
    }
}
