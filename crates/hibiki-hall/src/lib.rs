//! Hibiki Hall - a hall reverb driven by four macro knobs
//!
//! This crate is the glue between a host and the two reverb engines:
//!
//! - [`ParameterTable`] - the 25 host-visible parameters and their symbols
//! - [`HighLevelMapper`] - size, shape, tonality and presence to 21
//!   detailed values, through fixed [`MacroTables`]
//! - [`ParameterStore`] - mix gains, macro steps and unit scaling; every
//!   other value is read back from the engine that owns it
//! - [`SignalRouter`] - early→late routing in 256-frame chunks
//! - [`HallReverb`] - the host-facing instance tying the above together
//! - [`HallShared`] / [`HallProcessor`] - lock-free control→audio bridge
//! - [`HallConfig`] - TOML configuration
//!
//! ## Example
//!
//! ```rust
//! use hibiki_hall::{HallReverb, ParamIndex};
//!
//! let mut hall = HallReverb::new(48000.0);
//! hall.activate();
//! hall.set_parameter_value(ParamIndex::Size.index(), 4.0);
//! assert_eq!(hall.get_parameter_value(ParamIndex::LateDecay.index()), 4.0);
//!
//! let mut input = vec![0.0f32; 1024];
//! input[0] = 1.0;
//! let (mut left, mut right) = (vec![0.0f32; 1024], vec![0.0f32; 1024]);
//! hall.run([&input[..], &input[..]], [&mut left[..], &mut right[..]], 1024);
//! ```
//!
//! The real-time surface ([`HallReverb::run`], parameter reads and writes)
//! never fails: unknown indices read as `0.0`, writes to them are ignored
//! and out-of-range values are clamped. [`HallError`] only comes from
//! strict conversions and configuration.

pub mod config;
pub mod error;
pub mod hall;
pub mod mapping;
pub mod params;
pub mod router;
pub mod shared;
pub mod store;

pub use config::{HallConfig, MacroConfig};
pub use error::{HallError, Result};
pub use hall::HallReverb;
pub use mapping::{
    DerivedParameters, HALL_TABLES, HighLevelMapper, HighLevelSettings, MacroTables, Step,
    StepTable,
};
pub use params::{
    MACRO_COUNT, PARAM_COUNT, PARAM_ID_BASE, PARAMETERS, ParamIndex, ParameterTable, PluginInfo,
};
pub use router::{BLOCK_SIZE, SignalRouter};
pub use shared::{DEFAULT_QUEUE_CAPACITY, HallProcessor, HallShared, ParamChange};
pub use store::{MixGains, ParameterStore};

// Parameter metadata types callers need alongside the table.
pub use hibiki_core::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
