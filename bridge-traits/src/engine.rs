//! Engine binding contract.
//!
//! The engine is the native component that demuxes, decodes and renders. It
//! owns its decode/render threads; the core only drives it through the
//! synchronous calls below. Each call may block briefly and must be safe to
//! invoke from any thread. Ordering between calls issued from different
//! threads is not guaranteed by the engine; the playback controller
//! serializes its own commands.

use crate::error::Result;
use crate::source::{MediaSource, SurfaceHandle};
use std::path::Path;

/// What the engine can do besides plain playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineCapabilities {
    /// Whether a batch decode may run while a playback session is active on
    /// the same engine handle.
    pub concurrent_decode: bool,
    /// Whether `set_speed` has any effect.
    pub variable_speed: bool,
}

impl Default for EngineCapabilities {
    fn default() -> Self {
        Self {
            concurrent_decode: false,
            variable_speed: true,
        }
    }
}

/// Native playback and decoding engine.
///
/// Positions and durations are in seconds. Implementations report failures
/// as [`BridgeError`](crate::BridgeError); adapters over status-code bindings
/// can use [`StatusCodeEngine`](crate::status::StatusCodeEngine).
pub trait MediaEngine: Send + Sync {
    /// Starts playback of `source`, rendering into `surface` when one is
    /// attached. Video output is deferred while `surface` is `None`.
    fn play(&self, source: &MediaSource, surface: Option<SurfaceHandle>) -> Result<()>;

    /// Replaces (or clears) the render target of the running session.
    fn set_surface(&self, surface: Option<SurfaceHandle>) -> Result<()>;

    /// Pauses (`true`) or resumes (`false`) rendering.
    fn pause(&self, paused: bool);

    /// Moves the playhead to an absolute position.
    fn seek(&self, seconds: f64) -> Result<()>;

    /// Stops playback and releases session resources.
    fn stop(&self) -> Result<()>;

    /// Sets the playback rate multiplier.
    fn set_speed(&self, factor: f32) -> Result<()>;

    /// Current playhead position.
    fn position(&self) -> Result<f64>;

    /// Duration of the current source.
    fn duration(&self) -> Result<f64>;

    /// Decodes `input` into a raw frame file at `output`. Blocks until the
    /// whole input has been processed.
    fn run_decode(&self, input: &Path, output: &Path) -> Result<()>;

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities::default()
    }
}
