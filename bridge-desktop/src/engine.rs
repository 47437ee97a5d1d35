//! Software engine for desktop hosts and tests.

use crate::clock::MasterClock;
use crate::media::{decode_to_pcm, probe_duration};
use bridge_traits::{
    error::{BridgeError, Result},
    EngineCapabilities, MediaEngine, MediaSource, SurfaceHandle,
};
use parking_lot::Mutex;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

struct Session {
    source: MediaSource,
    surface: Option<SurfaceHandle>,
    duration: f64,
    clock: MasterClock,
}

struct EngineState {
    session: Option<Session>,
    speed: f64,
}

/// [`MediaEngine`] that renders nothing and keeps time in software.
///
/// Position follows a [`MasterClock`]; duration is probed from the file
/// unless a fixed duration was configured. Batch decode writes raw PCM.
pub struct SoftwareEngine {
    state: Mutex<EngineState>,
    capabilities: EngineCapabilities,
    fixed_duration: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct SoftwareEngineBuilder {
    concurrent_decode: bool,
    fixed_duration: Option<f64>,
}

impl SoftwareEngineBuilder {
    /// Allow `run_decode` while a playback session is open.
    pub fn concurrent_decode(mut self, enabled: bool) -> Self {
        self.concurrent_decode = enabled;
        self
    }

    /// Report this duration for every source instead of probing it.
    /// The source file then does not need to exist.
    pub fn fixed_duration(mut self, seconds: f64) -> Self {
        self.fixed_duration = Some(seconds);
        self
    }

    pub fn build(self) -> SoftwareEngine {
        SoftwareEngine {
            state: Mutex::new(EngineState {
                session: None,
                speed: 1.0,
            }),
            capabilities: EngineCapabilities {
                concurrent_decode: self.concurrent_decode,
                variable_speed: true,
            },
            fixed_duration: self.fixed_duration,
        }
    }
}

impl SoftwareEngine {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> SoftwareEngineBuilder {
        SoftwareEngineBuilder::default()
    }

    /// Source of the open session, if any.
    pub fn current_source(&self) -> Option<MediaSource> {
        self.state.lock().session.as_ref().map(|s| s.source.clone())
    }

    /// Surface the open session renders into, if any.
    pub fn current_surface(&self) -> Option<SurfaceHandle> {
        self.state.lock().session.as_ref().and_then(|s| s.surface)
    }

    fn resolve_duration(&self, source: &MediaSource) -> Result<f64> {
        if let Some(seconds) = self.fixed_duration {
            return Ok(seconds);
        }
        match source {
            MediaSource::LocalFile { path } => Ok(probe_duration(path)?),
            MediaSource::Remote { url } => Err(BridgeError::NotAvailable(format!(
                "software engine cannot open remote source {}",
                url
            ))),
        }
    }

    fn no_session(operation: &str) -> BridgeError {
        BridgeError::OperationFailed(format!("{}: no active session", operation))
    }
}

impl Default for SoftwareEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaEngine for SoftwareEngine {
    fn play(&self, source: &MediaSource, surface: Option<SurfaceHandle>) -> Result<()> {
        if source.is_remote() {
            return Err(BridgeError::NotAvailable(format!(
                "software engine cannot open remote source {}",
                source
            )));
        }

        let duration = self.resolve_duration(source)?;
        let mut state = self.state.lock();
        let speed = state.speed;
        state.session = Some(Session {
            source: source.clone(),
            surface,
            duration,
            clock: MasterClock::started(Instant::now(), speed),
        });

        info!(source = %source, duration, "Software engine playing");
        Ok(())
    }

    fn set_surface(&self, surface: Option<SurfaceHandle>) -> Result<()> {
        if let Some(session) = self.state.lock().session.as_mut() {
            session.surface = surface;
        }
        debug!(surface = ?surface.map(|s| s.raw()), "Surface updated");
        Ok(())
    }

    fn pause(&self, paused: bool) {
        if let Some(session) = self.state.lock().session.as_mut() {
            let now = Instant::now();
            if paused {
                session.clock.pause(now);
            } else {
                session.clock.resume(now);
            }
        }
    }

    fn seek(&self, seconds: f64) -> Result<()> {
        let mut state = self.state.lock();
        let session = state.session.as_mut().ok_or_else(|| Self::no_session("seek"))?;
        let target = seconds.clamp(0.0, session.duration);
        session.clock.seek(Instant::now(), target);
        debug!(target, "Software engine seeked");
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        if self.state.lock().session.take().is_some() {
            info!("Software engine stopped");
        }
        Ok(())
    }

    fn set_speed(&self, factor: f32) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(BridgeError::OperationFailed(format!(
                "invalid speed factor {}",
                factor
            )));
        }

        let mut state = self.state.lock();
        state.speed = factor as f64;
        if let Some(session) = state.session.as_mut() {
            session.clock.set_speed(Instant::now(), factor as f64);
        }
        Ok(())
    }

    fn position(&self) -> Result<f64> {
        let state = self.state.lock();
        let session = state
            .session
            .as_ref()
            .ok_or_else(|| Self::no_session("position"))?;
        Ok(session.clock.position(Instant::now()).min(session.duration))
    }

    fn duration(&self) -> Result<f64> {
        self.state
            .lock()
            .session
            .as_ref()
            .map(|s| s.duration)
            .ok_or_else(|| Self::no_session("duration"))
    }

    fn run_decode(&self, input: &Path, output: &Path) -> Result<()> {
        if !self.capabilities.concurrent_decode && self.state.lock().session.is_some() {
            return Err(BridgeError::OperationFailed(
                "decode refused while a playback session is open".to_string(),
            ));
        }

        let summary = decode_to_pcm(input, output)?;
        info!(
            input = %input.display(),
            frames = summary.frames,
            channels = summary.channels,
            sample_rate = summary.sample_rate,
            "Decode finished"
        );
        Ok(())
    }

    fn capabilities(&self) -> EngineCapabilities {
        self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SoftwareEngine {
        SoftwareEngine::builder().fixed_duration(120.0).build()
    }

    #[test]
    fn test_play_reports_fixed_duration() {
        let engine = engine();
        engine.play(&MediaSource::local("clip.mp4"), None).unwrap();
        assert_eq!(engine.duration().unwrap(), 120.0);
        assert!(engine.position().unwrap() < 1.0);
        assert_eq!(engine.current_source(), Some(MediaSource::local("clip.mp4")));
    }

    #[test]
    fn test_seek_is_clamped_to_duration() {
        let engine = engine();
        engine.play(&MediaSource::local("clip.mp4"), None).unwrap();
        engine.pause(true);

        engine.seek(60.0).unwrap();
        assert!((engine.position().unwrap() - 60.0).abs() < 1e-6);

        engine.seek(500.0).unwrap();
        assert_eq!(engine.position().unwrap(), 120.0);
    }

    #[test]
    fn test_queries_fail_without_session() {
        let engine = engine();
        assert!(engine.position().is_err());
        assert!(engine.duration().is_err());
        assert!(engine.seek(1.0).is_err());
        assert!(engine.stop().is_ok());
    }

    #[test]
    fn test_stop_closes_session() {
        let engine = engine();
        engine
            .play(&MediaSource::local("clip.mp4"), Some(SurfaceHandle::from_raw(7)))
            .unwrap();
        assert_eq!(engine.current_surface(), Some(SurfaceHandle::from_raw(7)));

        engine.stop().unwrap();
        assert!(engine.current_source().is_none());
        assert!(engine.position().is_err());
    }

    #[test]
    fn test_surface_replacement() {
        let engine = engine();
        engine.play(&MediaSource::local("clip.mp4"), None).unwrap();
        engine.set_surface(Some(SurfaceHandle::from_raw(3))).unwrap();
        assert_eq!(engine.current_surface(), Some(SurfaceHandle::from_raw(3)));
        engine.set_surface(None).unwrap();
        assert_eq!(engine.current_surface(), None);
    }

    #[test]
    fn test_remote_source_rejected() {
        let engine = engine();
        let err = engine
            .play(&MediaSource::from_uri("http://example.com/a.mp4"), None)
            .unwrap_err();
        assert!(matches!(err, BridgeError::NotAvailable(_)));
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let engine = engine();
        assert!(engine.set_speed(0.0).is_err());
        assert!(engine.set_speed(f32::NAN).is_err());
        assert!(engine.set_speed(2.0).is_ok());
    }

    #[test]
    fn test_decode_refused_during_playback() {
        let engine = engine();
        engine.play(&MediaSource::local("clip.mp4"), None).unwrap();
        let err = engine
            .run_decode(Path::new("in.wav"), Path::new("out.pcm"))
            .unwrap_err();
        assert!(matches!(err, BridgeError::OperationFailed(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let engine = SoftwareEngine::new();
        let err = engine
            .play(&MediaSource::local("/definitely/not/here.wav"), None)
            .unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }
}
