//! Status-code bindings.
//!
//! Native engines exposed through C or JNI return plain integers: `0` on
//! success, anything else on failure. [`RawEngineBinding`] mirrors that
//! surface and [`StatusCodeEngine`] turns it into a [`MediaEngine`].

use crate::engine::{EngineCapabilities, MediaEngine};
use crate::error::{BridgeError, Result};
use crate::source::{MediaSource, SurfaceHandle};
use std::path::Path;

/// Raw return code from a native engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus(pub i32);

impl EngineStatus {
    pub const OK: EngineStatus = EngineStatus(0);

    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Maps a non-zero code to [`BridgeError::Status`] tagged with `operation`.
    pub fn into_result(self, operation: &'static str) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(BridgeError::Status {
                operation,
                code: self.0,
            })
        }
    }
}

impl From<i32> for EngineStatus {
    fn from(code: i32) -> Self {
        EngineStatus(code)
    }
}

/// C-style engine surface: status codes, raw window pointers, string paths.
pub trait RawEngineBinding: Send + Sync {
    fn native_play(&self, uri: &str, surface: Option<u64>) -> i32;
    fn native_set_surface(&self, surface: Option<u64>) -> i32;
    fn native_pause(&self, paused: bool);
    fn native_seek(&self, seconds: f64) -> i32;
    fn native_stop(&self) -> i32;
    fn native_set_speed(&self, factor: f32) -> i32;
    fn native_position(&self) -> f64;
    fn native_duration(&self) -> f64;
    fn native_run_decode(&self, input: &str, output: &str) -> i32;
}

/// Adapts a [`RawEngineBinding`] to [`MediaEngine`].
///
/// Position and duration readings that are negative or not finite are
/// reported as failures with code `-1`.
pub struct StatusCodeEngine<B> {
    binding: B,
    capabilities: EngineCapabilities,
}

impl<B: RawEngineBinding> StatusCodeEngine<B> {
    pub fn new(binding: B) -> Self {
        Self {
            binding,
            capabilities: EngineCapabilities::default(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: EngineCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    fn reading(operation: &'static str, value: f64) -> Result<f64> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(BridgeError::Status {
                operation,
                code: -1,
            })
        }
    }
}

impl<B: RawEngineBinding> MediaEngine for StatusCodeEngine<B> {
    fn play(&self, source: &MediaSource, surface: Option<SurfaceHandle>) -> Result<()> {
        let uri = source.to_uri_string();
        EngineStatus(self.binding.native_play(&uri, surface.map(|s| s.raw()))).into_result("play")
    }

    fn set_surface(&self, surface: Option<SurfaceHandle>) -> Result<()> {
        EngineStatus(self.binding.native_set_surface(surface.map(|s| s.raw())))
            .into_result("set_surface")
    }

    fn pause(&self, paused: bool) {
        self.binding.native_pause(paused);
    }

    fn seek(&self, seconds: f64) -> Result<()> {
        EngineStatus(self.binding.native_seek(seconds)).into_result("seek")
    }

    fn stop(&self) -> Result<()> {
        EngineStatus(self.binding.native_stop()).into_result("stop")
    }

    fn set_speed(&self, factor: f32) -> Result<()> {
        EngineStatus(self.binding.native_set_speed(factor)).into_result("set_speed")
    }

    fn position(&self) -> Result<f64> {
        Self::reading("position", self.binding.native_position())
    }

    fn duration(&self) -> Result<f64> {
        Self::reading("duration", self.binding.native_duration())
    }

    fn run_decode(&self, input: &Path, output: &Path) -> Result<()> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        EngineStatus(self.binding.native_run_decode(&input, &output)).into_result("run_decode")
    }

    fn capabilities(&self) -> EngineCapabilities {
        self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedBinding {
        play_code: i32,
        position: f64,
        calls: Mutex<Vec<String>>,
    }

    impl RawEngineBinding for ScriptedBinding {
        fn native_play(&self, uri: &str, surface: Option<u64>) -> i32 {
            self.calls
                .lock()
                .unwrap()
                .push(format!("play {uri} {surface:?}"));
            self.play_code
        }
        fn native_set_surface(&self, _surface: Option<u64>) -> i32 {
            0
        }
        fn native_pause(&self, paused: bool) {
            self.calls.lock().unwrap().push(format!("pause {paused}"));
        }
        fn native_seek(&self, _seconds: f64) -> i32 {
            0
        }
        fn native_stop(&self) -> i32 {
            -22
        }
        fn native_set_speed(&self, _factor: f32) -> i32 {
            1
        }
        fn native_position(&self) -> f64 {
            self.position
        }
        fn native_duration(&self) -> f64 {
            f64::NAN
        }
        fn native_run_decode(&self, _input: &str, _output: &str) -> i32 {
            0
        }
    }

    #[test]
    fn test_engine_status() {
        assert!(EngineStatus::OK.is_success());
        assert!(EngineStatus::from(0).into_result("play").is_ok());

        let err = EngineStatus(-1).into_result("play").unwrap_err();
        assert_eq!(err.status_code(), Some(-1));
        assert!(err.to_string().contains("play"));
    }

    #[test]
    fn test_positive_status_is_failure() {
        let err = EngineStatus(3).into_result("seek").unwrap_err();
        assert_eq!(err.status_code(), Some(3));
    }

    #[test]
    fn test_adapter_forwards_and_maps_codes() {
        let engine = StatusCodeEngine::new(ScriptedBinding {
            play_code: 0,
            position: 4.5,
            ..Default::default()
        });

        engine
            .play(
                &MediaSource::local("/sdcard/1.mp4"),
                Some(SurfaceHandle::from_raw(9)),
            )
            .unwrap();
        engine.pause(true);

        assert_eq!(engine.position().unwrap(), 4.5);
        assert_eq!(engine.stop().unwrap_err().status_code(), Some(-22));
        assert_eq!(engine.set_speed(2.0).unwrap_err().status_code(), Some(1));
        assert!(engine.duration().is_err());

        let calls = engine.binding().calls.lock().unwrap();
        assert_eq!(calls[0], "play /sdcard/1.mp4 Some(9)");
        assert_eq!(calls[1], "pause true");
    }

    #[test]
    fn test_adapter_rejects_negative_position() {
        let engine = StatusCodeEngine::new(ScriptedBinding {
            position: -1.0,
            ..Default::default()
        });
        assert_eq!(engine.position().unwrap_err().status_code(), Some(-1));
    }

    #[test]
    fn test_adapter_capabilities_override() {
        let engine = StatusCodeEngine::new(ScriptedBinding::default()).with_capabilities(
            EngineCapabilities {
                concurrent_decode: true,
                variable_speed: false,
            },
        );
        assert!(engine.capabilities().concurrent_decode);
    }
}
