//! # Desktop Bridge Implementations
//!
//! Reference [`MediaEngine`](bridge_traits::MediaEngine) for desktop hosts
//! (macOS, Windows, Linux) and for tests that want real timing behaviour
//! without a native player.
//!
//! ## Overview
//!
//! - [`SoftwareEngine`] keeps a speed-aware master clock per session, probes
//!   durations with `symphonia` and decodes audio tracks to raw PCM.
//! - [`MasterClock`] is the clock itself, usable on its own.
//! - [`probe_duration`] and [`decode_to_pcm`] expose the symphonia helpers.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::SoftwareEngine;
//! use bridge_traits::{MediaEngine, MediaSource};
//!
//! let engine = SoftwareEngine::new();
//! engine.play(&MediaSource::local("/music/track.flac"), None)?;
//! println!("{:.1}s of {:.1}s", engine.position()?, engine.duration()?);
//! ```

mod clock;
mod engine;
mod media;

pub use clock::MasterClock;
pub use engine::{SoftwareEngine, SoftwareEngineBuilder};
pub use media::{decode_to_pcm, probe_duration, MediaError, PcmSummary};
