//! # Playback Control Module
//!
//! Drives a [`MediaEngine`](bridge_traits::MediaEngine) through a small
//! playback state machine and runs batch decodes against the same engine.
//!
//! ## Overview
//!
//! - [`PlaybackController`]: serialized `start`/`pause`/`stop`/`seek`/speed
//!   commands, state and progress queries
//! - [`ProgressPoller`]: periodic progress delivery over a channel
//! - [`DecodeOrchestrator`]: one background decode at a time
//! - [`EngineArbiter`]: keeps playback and decode apart when the engine
//!   cannot run both
//!
//! ## Usage
//!
//! ```ignore
//! let config = PlayerConfig::default();
//! let controller = Arc::new(PlaybackController::new(engine.clone(), &config));
//! let decoder = DecodeOrchestrator::new(engine, controller.arbiter());
//! let (poller, mut progress) = ProgressPoller::new(controller.clone(), &config)?;
//!
//! controller.set_source(MediaSource::local("/sdcard/1.mp4"));
//! controller.start()?;
//! poller.start()?;
//! while let Some(ProgressEvent::Tick(fraction)) = progress.recv().await {
//!     seek_bar.set(fraction);
//! }
//! ```

pub mod arbiter;
pub mod config;
pub mod controller;
pub mod decode;
pub mod error;
pub mod poller;
pub mod progress;
pub mod session;
pub mod speed;
pub mod state;

pub use arbiter::{DecodeClaim, EngineArbiter, PlaybackClaim};
pub use config::{DecodeExclusivity, PlayerConfig};
pub use controller::PlaybackController;
pub use decode::{DecodeHandle, DecodeJob, DecodeOrchestrator, DecodeReport};
pub use error::{DecodeBusyReason, PlaybackError, Result};
pub use poller::{ProgressEvent, ProgressPoller, ProgressReceiver};
pub use progress::{progress_fraction, to_percent};
pub use session::EngineSession;
pub use speed::{speed_label, SpeedPreset};
pub use state::{PlaybackCommand, PlaybackState};
