//! Hibiki Engines - the two reverb stages of the hall
//!
//! Reference implementations of the engine traits from `hibiki-core`:
//!
//! - [`EarlyReflections`] - a room-scaled, sixteen-tap reflection pattern
//!   per channel with cross-feed, diffusion and a small L/R offset
//! - [`LateReverb`] - predelay, modulated input diffusion and a tank of
//!   parallel combs with separate low/mid/high decay times
//!
//! Both engines output only their wet signal at unity gain; the hall
//! mixes dry, early and late itself.
//!
//! # Example
//!
//! ```rust
//! use hibiki_core::{EarlyReflectionEngine, LateReverbEngine, StereoEngine};
//! use hibiki_engines::{EarlyReflections, LateReverb};
//!
//! let mut early = EarlyReflections::new(44100.0);
//! let mut late = LateReverb::new(44100.0);
//! early.set_room_scale(1.0);
//! late.set_rt60(2.0);
//!
//! let input = [0.0f32; 64];
//! let (mut el, mut er) = ([0.0; 64], [0.0; 64]);
//! let (mut ll, mut lr) = ([0.0; 64], [0.0; 64]);
//! early.process_block(&input, &input, &mut el, &mut er);
//! late.process_block(&el, &er, &mut ll, &mut lr);
//! assert!(ll.iter().all(|s| *s == 0.0));
//! ```
//!
//! # Tracing
//!
//! With the `tracing` feature enabled, sample-rate reconfiguration is
//! logged at debug level. Nothing is logged from the audio path.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod early;
pub mod late;
mod stereo;

pub use early::EarlyReflections;
pub use late::LateReverb;
