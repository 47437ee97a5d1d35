//! # Engine Bridge Traits
//!
//! Contract between the playback core and the native media engine, plus the
//! small host hooks (clock, log sink) the core needs.
//!
//! ## Traits
//!
//! - [`MediaEngine`](engine::MediaEngine) - play/pause/seek/stop, speed,
//!   position and duration queries, batch decode
//! - [`RawEngineBinding`](status::RawEngineBinding) - C-style status-code
//!   surface, adapted by [`StatusCodeEngine`](status::StatusCodeEngine)
//! - [`Clock`](time::Clock) - time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - forward structured logs to host logging
//!
//! ## Platform Implementations
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Software engine |
//! | Android  | JNI binding over `RawEngineBinding` | 📋 Planned |
//! | Windows  | native binding over `RawEngineBinding` | 📋 Planned |
//!
//! ## Fail-Fast Strategy
//!
//! The core refuses to start without an engine:
//!
//! ```ignore
//! let engine = config.engine
//!     .ok_or_else(|| CoreError::CapabilityMissing {
//!         capability: "MediaEngine".to_string(),
//!         message: "No media engine provided. \
//!                  Desktop: enable the desktop-shims feature. \
//!                  Mobile: inject the platform binding.".to_string(),
//!     })?;
//! ```
//!
//! ## Thread Safety
//!
//! Every trait here requires `Send + Sync`. The engine is shared between the
//! playback controller, the progress poller and the decode worker.

pub mod engine;
pub mod error;
pub mod source;
pub mod status;
pub mod time;

pub use engine::{EngineCapabilities, MediaEngine};
pub use error::BridgeError;
pub use source::{MediaSource, SurfaceHandle};
pub use status::{EngineStatus, RawEngineBinding, StatusCodeEngine};
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, ManualClock, SystemClock};
