//! # Core Configuration Module
//!
//! Builder for the dependencies the player core needs from its host.
//!
//! ## Required Dependencies
//!
//! - `MediaEngine` - the native playback/decode engine
//!
//! ## Optional Dependencies
//!
//! - `LoggerSink` - host logging pipeline
//! - `Clock` - time source for reports (default: system clock)
//!
//! With the `desktop-shims` feature a `bridge_desktop::SoftwareEngine` is
//! injected when no engine is provided. Without it, `build()` fails fast with
//! [`Error::CapabilityMissing`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .engine(Arc::new(MyJniEngine::new()))
//!     .event_buffer(256)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{Clock, LoggerSink, MediaEngine, SystemClock};
use std::sync::Arc;

/// Upper bound on the event bus buffer.
pub const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

#[derive(Clone)]
pub struct CoreConfig {
    /// Engine every playback and decode call goes through
    pub engine: Arc<dyn MediaEngine>,

    /// Host logger that mirrors core log events (optional)
    pub logger_sink: Option<Arc<dyn LoggerSink>>,

    pub clock: Arc<dyn Clock>,

    /// Capacity of the broadcast event bus
    pub event_buffer: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("engine", &"MediaEngine { ... }")
            .field("capabilities", &self.engine.capabilities())
            .field(
                "logger_sink",
                &self.logger_sink.as_ref().map(|_| "LoggerSink { ... }"),
            )
            .field("event_buffer", &self.event_buffer)
            .finish()
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.event_buffer == 0 {
            return Err(Error::Config(
                "Event buffer must hold at least one event".to_string(),
            ));
        }

        if self.event_buffer > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer exceeds maximum of {} events",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_engine() -> Result<Arc<dyn MediaEngine>> {
    Err(Error::CapabilityMissing {
        capability: "MediaEngine".to_string(),
        message: "A media engine implementation is required for playback and decode. \
                 Desktop: enable the 'desktop-shims' feature to use the default SoftwareEngine. \
                 Android: inject the JNI binding wrapped in StatusCodeEngine."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_engine() -> Result<Arc<dyn MediaEngine>> {
    use bridge_desktop::SoftwareEngine;

    let engine: Arc<dyn MediaEngine> = Arc::new(SoftwareEngine::new());
    Ok(engine)
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    engine: Option<Arc<dyn MediaEngine>>,
    logger_sink: Option<Arc<dyn LoggerSink>>,
    clock: Option<Arc<dyn Clock>>,
    event_buffer: Option<usize>,
}

impl CoreConfigBuilder {
    pub fn engine(mut self, engine: Arc<dyn MediaEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to [`DEFAULT_EVENT_BUFFER_SIZE`].
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = Some(capacity);
        self
    }

    /// Resolves defaults and validates.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when no engine was set and no desktop
    ///   default is compiled in
    /// - [`Error::Config`] when a value is out of range
    pub fn build(self) -> Result<CoreConfig> {
        let engine = match self.engine {
            Some(engine) => engine,
            None => provide_default_engine()?,
        };

        let config = CoreConfig {
            engine,
            logger_sink: self.logger_sink,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_buffer: self.event_buffer.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{MediaSource, SurfaceHandle};
    use std::path::Path;

    struct NullEngine;

    impl MediaEngine for NullEngine {
        fn play(&self, _source: &MediaSource, _surface: Option<SurfaceHandle>) -> BridgeResult<()> {
            Ok(())
        }
        fn set_surface(&self, _surface: Option<SurfaceHandle>) -> BridgeResult<()> {
            Ok(())
        }
        fn pause(&self, _paused: bool) {}
        fn seek(&self, _seconds: f64) -> BridgeResult<()> {
            Ok(())
        }
        fn stop(&self) -> BridgeResult<()> {
            Ok(())
        }
        fn set_speed(&self, _factor: f32) -> BridgeResult<()> {
            Ok(())
        }
        fn position(&self) -> BridgeResult<f64> {
            Ok(0.0)
        }
        fn duration(&self) -> BridgeResult<f64> {
            Ok(0.0)
        }
        fn run_decode(&self, _input: &Path, _output: &Path) -> BridgeResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_builder_with_engine() {
        let config = CoreConfig::builder()
            .engine(Arc::new(NullEngine))
            .build()
            .unwrap();

        assert_eq!(config.event_buffer, DEFAULT_EVENT_BUFFER_SIZE);
        assert!(config.logger_sink.is_none());
        assert!(format!("{:?}", config).contains("MediaEngine { ... }"));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_engine() {
        let err = CoreConfig::builder().build().unwrap_err();
        match err {
            Error::CapabilityMissing { capability, .. } => assert_eq!(capability, "MediaEngine"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_default_engine() {
        let config = CoreConfig::builder().build().unwrap();
        assert!(!config.engine.capabilities().concurrent_decode);
    }

    #[test]
    fn test_validate_rejects_zero_event_buffer() {
        let result = CoreConfig::builder()
            .engine(Arc::new(NullEngine))
            .event_buffer(0)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_excessive_event_buffer() {
        let result = CoreConfig::builder()
            .engine(Arc::new(NullEngine))
            .event_buffer(MAX_EVENT_BUFFER_SIZE + 1)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
