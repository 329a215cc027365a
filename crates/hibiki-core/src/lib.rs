//! Hibiki Core - DSP primitives and engine interfaces for a hall reverb
//!
//! This crate holds the building blocks the hall's two reverb stages are
//! assembled from, plus the traits through which the hall talks to them.
//! Nothing here allocates on the audio path.
//!
//! # Engine Interfaces
//!
//! - [`StereoEngine`] - block transform, sample rate, reset
//! - [`EarlyReflectionEngine`] - early pattern setters/getters
//! - [`LateReverbEngine`] - late tail setters/getters
//!
//! # Primitives
//!
//! - [`InterpolatedDelay`] - circular delay line with fractional reads
//! - [`AllpassFilter`] - Schroeder diffuser with a modulatable loop
//! - [`DecayComb`] - feedback comb with three-band decay
//! - [`OnePole`] / [`OnePoleHighpass`] - 6 dB/oct tone filters
//! - [`Lfo`] - modulation oscillator
//!
//! # Parameters
//!
//! - [`ParamDescriptor`], [`ParamUnit`], [`ParamFlags`], [`ParamId`] -
//!   `const` parameter metadata
//! - [`ParameterInfo`] - index-based parameter access
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build without the standard
//! library; math goes through `libm` and delay lines use `alloc`.
//!
//! ```toml
//! [dependencies]
//! hibiki-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod delay;
pub mod engine;
pub mod lfo;
pub mod math;
pub mod one_pole;
pub mod param_info;

pub use allpass::AllpassFilter;
pub use comb::{BandGains, DecayComb};
pub use delay::InterpolatedDelay;
pub use engine::{EarlyReflectionEngine, LateReverbEngine, StereoEngine};
pub use lfo::Lfo;
pub use math::{clamp_cutoff, flush_denormal, ms_to_samples, rt60_gain};
pub use one_pole::{OnePole, OnePoleHighpass};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
