//! # Playback Controller
//!
//! Owns the [`PlaybackState`] machine and mediates every call into the
//! engine.
//!
//! ## Locking
//!
//! Two locks, always taken in this order:
//! - the command lock serializes `start`/`pause`/`stop`/`seek`/speed and
//!   surface commands and is held across the engine call;
//! - the state lock guards [`PlaybackState`], the source, the surface and the
//!   open [`EngineSession`]. It is never held across an engine call, so
//!   `get_state` and `get_progress` stay responsive while a command runs.
//!
//! Readers can therefore observe `Seeking` while the engine completes a seek.

use crate::arbiter::EngineArbiter;
use crate::config::PlayerConfig;
use crate::error::{PlaybackError, Result};
use crate::progress::progress_fraction;
use crate::session::EngineSession;
use crate::speed::{speed_label, SpeedPreset};
use crate::state::{PlaybackCommand, PlaybackState};
use bridge_traits::{MediaEngine, MediaSource, SurfaceHandle};
use core_async::sync::CancellationToken;
use core_runtime::events::{EventBus, PlaybackEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

struct ControllerState {
    state: PlaybackState,
    source: Option<MediaSource>,
    surface: Option<SurfaceHandle>,
    session: Option<Arc<EngineSession>>,
    speed: f32,
}

impl ControllerState {
    /// The open session while the state allows trusting its duration.
    fn trusted_session(&self) -> Option<&Arc<EngineSession>> {
        if !self.state.duration_trusted() {
            return None;
        }
        self.session.as_ref()
    }

    fn trusted_duration(&self) -> Option<f64> {
        self.trusted_session().map(|s| s.duration())
    }
}

pub struct PlaybackController {
    engine: Arc<dyn MediaEngine>,
    arbiter: EngineArbiter,
    events: Option<EventBus>,
    command_lock: Mutex<()>,
    inner: Mutex<ControllerState>,
}

fn to_millis(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

impl PlaybackController {
    pub fn new(engine: Arc<dyn MediaEngine>, config: &PlayerConfig) -> Self {
        let exclusive = config.exclusivity.enforced(&engine.capabilities());
        Self::with_arbiter(engine, EngineArbiter::new(exclusive), config)
    }

    /// Controller sharing an existing arbiter, e.g. with a decode orchestrator
    /// built first.
    pub fn with_arbiter(
        engine: Arc<dyn MediaEngine>,
        arbiter: EngineArbiter,
        config: &PlayerConfig,
    ) -> Self {
        Self {
            engine,
            arbiter,
            events: None,
            command_lock: Mutex::new(()),
            inner: Mutex::new(ControllerState {
                state: PlaybackState::Idle,
                source: None,
                surface: None,
                session: None,
                speed: config.initial_speed.factor(),
            }),
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn arbiter(&self) -> EngineArbiter {
        self.arbiter.clone()
    }

    pub fn engine(&self) -> Arc<dyn MediaEngine> {
        Arc::clone(&self.engine)
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(events) = &self.events {
            events.emit_playback(event);
        }
    }

    fn report(&self, operation: &'static str, err: &PlaybackError) {
        if err.is_engine_failure() {
            error!(operation, error = %err, "Engine call failed");
            self.emit(PlaybackEvent::Error {
                operation: operation.to_string(),
                message: err.to_string(),
                recoverable: true,
            });
        }
    }

    fn reject(&self, command: PlaybackCommand, state: PlaybackState) -> PlaybackError {
        warn!(operation = command.name(), %state, "Rejected state transition");
        PlaybackError::InvalidStateTransition {
            operation: command.name(),
            state,
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Records the source for the next `start`. Never touches the engine.
    pub fn set_source(&self, source: MediaSource) {
        let _cmd = self.command_lock.lock();
        debug!(source = %source, "Source set");
        self.inner.lock().source = Some(source);
    }

    /// Records the render target and forwards it when a session is open.
    ///
    /// Safe to call repeatedly (surface recreation) and with no playback.
    pub fn attach_surface(&self, surface: SurfaceHandle) -> Result<()> {
        self.update_surface(Some(surface))
    }

    /// Forgets the render target after the host destroyed it.
    pub fn detach_surface(&self) -> Result<()> {
        self.update_surface(None)
    }

    fn update_surface(&self, surface: Option<SurfaceHandle>) -> Result<()> {
        let _cmd = self.command_lock.lock();
        let session_open = {
            let mut inner = self.inner.lock();
            inner.surface = surface;
            inner.session.is_some()
        };

        if session_open {
            self.engine
                .set_surface(surface)
                .map_err(PlaybackError::engine("set_surface"))
                .inspect_err(|e| self.report("set_surface", e))?;
        }
        debug!(surface = ?surface.map(|s| s.raw()), forwarded = session_open, "Surface updated");
        Ok(())
    }

    /// Starts playback of the current source with the last attached surface.
    ///
    /// From Playing or Paused this is a no-op that keeps the cached duration.
    pub fn start(&self) -> Result<()> {
        let _cmd = self.command_lock.lock();
        let (state, source, surface, speed) = {
            let inner = self.inner.lock();
            (inner.state, inner.source.clone(), inner.surface, inner.speed)
        };

        match state.apply(PlaybackCommand::Start) {
            None => return Err(self.reject(PlaybackCommand::Start, state)),
            Some(next) if next == state => {
                debug!(%state, "start ignored: session already open");
                return Ok(());
            }
            Some(_) => {}
        }

        let source = source.ok_or(PlaybackError::SourceNotSet)?;
        let claim = self.arbiter.claim_playback()?;

        self.engine
            .play(&source, surface)
            .map_err(PlaybackError::engine("play"))
            .inspect_err(|e| self.report("start", e))?;

        let duration = match self.engine.duration() {
            Ok(duration) => duration,
            Err(err) => {
                if let Err(stop_err) = self.engine.stop() {
                    warn!(error = %stop_err, "Failed to stop engine after duration query failed");
                }
                let err = PlaybackError::engine("duration")(err);
                self.report("start", &err);
                return Err(err);
            }
        };

        if (speed - 1.0).abs() > f32::EPSILON {
            if let Err(err) = self.engine.set_speed(speed) {
                warn!(speed, error = %err, "Failed to reapply speed on start");
            }
        }

        let session = Arc::new(EngineSession::open(
            Arc::clone(&self.engine),
            source.clone(),
            duration,
            claim,
        ));
        let session_id = session.id();

        {
            let mut inner = self.inner.lock();
            inner.session = Some(session);
            inner.state = PlaybackState::Playing;
        }

        info!(source = %source, duration, %session_id, "Playback started");
        self.emit(PlaybackEvent::Started {
            session_id: session_id.to_string(),
            source: source.to_string(),
            duration_ms: to_millis(duration),
        });
        Ok(())
    }

    /// `true` pauses, `false` resumes. Legal only while Playing or Paused.
    pub fn pause(&self, paused: bool) -> Result<()> {
        let _cmd = self.command_lock.lock();
        let command = if paused {
            PlaybackCommand::Pause
        } else {
            PlaybackCommand::Resume
        };

        let state = self.inner.lock().state;
        let next = state
            .apply(command)
            .ok_or_else(|| self.reject(command, state))?;

        self.engine.pause(paused);
        self.inner.lock().state = next;

        debug!(paused, "Pause forwarded");

        if self.events.is_some() {
            let position_ms = self.engine.position().map(to_millis).unwrap_or(0);
            self.emit(if paused {
                PlaybackEvent::Paused { position_ms }
            } else {
                PlaybackEvent::Resumed { position_ms }
            });
        }
        Ok(())
    }

    /// Stops the engine and moves to Ended. Legal in any state.
    ///
    /// Closes the session, which invalidates the duration and cancels the
    /// session token. If the engine refuses, state and session are untouched.
    pub fn stop(&self) -> Result<()> {
        let _cmd = self.command_lock.lock();
        let session = self.inner.lock().session.clone();

        let result = match &session {
            Some(session) => session.close(),
            None => self.engine.stop(),
        };
        result
            .map_err(PlaybackError::engine("stop"))
            .inspect_err(|e| self.report("stop", e))?;

        {
            let mut inner = self.inner.lock();
            inner.session = None;
            inner.state = PlaybackState::Ended;
        }

        let session_id = session.as_ref().map(|s| s.id().to_string());
        info!(session_id = ?session_id, "Playback stopped");
        self.emit(PlaybackEvent::Stopped { session_id });
        Ok(())
    }

    /// Seeks to `fraction` of the cached duration.
    ///
    /// State reads as `Seeking` while the engine works and returns to the
    /// previous state afterwards, whether or not the engine succeeded.
    pub fn seek(&self, fraction: f64) -> Result<()> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(PlaybackError::InvalidSeekFraction(fraction));
        }

        let _cmd = self.command_lock.lock();
        let (prior, duration) = {
            let mut inner = self.inner.lock();
            let prior = inner.state;
            let next = prior
                .apply(PlaybackCommand::Seek)
                .ok_or_else(|| self.reject(PlaybackCommand::Seek, prior))?;
            let duration = inner
                .trusted_duration()
                .ok_or(PlaybackError::NoActiveSession)?;
            inner.state = next;
            (prior, duration)
        };

        let target = fraction * duration;
        let result = self.engine.seek(target);
        self.inner.lock().state = prior;

        result
            .map_err(PlaybackError::engine("seek"))
            .inspect_err(|e| self.report("seek", e))?;

        debug!(fraction, target, "Seek forwarded");
        self.emit(PlaybackEvent::Seeked {
            position_ms: to_millis(target),
            duration_ms: to_millis(duration),
        });
        Ok(())
    }

    /// Forwards a rate multiplier. Legal in any state.
    pub fn set_speed(&self, factor: f32) -> Result<()> {
        let _cmd = self.command_lock.lock();
        self.apply_speed(factor)
    }

    /// Moves to the next [`SpeedPreset`] in the button cycle. A factor that
    /// matches no preset restarts the cycle from `Normal`.
    pub fn cycle_speed(&self) -> Result<SpeedPreset> {
        let _cmd = self.command_lock.lock();
        let current = SpeedPreset::from_factor(self.inner.lock().speed).unwrap_or_default();
        let next = current.next();
        self.apply_speed(next.factor())?;
        Ok(next)
    }

    fn apply_speed(&self, factor: f32) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(PlaybackError::InvalidSpeed(factor));
        }

        self.engine
            .set_speed(factor)
            .map_err(PlaybackError::engine("set_speed"))
            .inspect_err(|e| self.report("set_speed", e))?;
        self.inner.lock().speed = factor;

        let label = speed_label(factor);
        debug!(factor, %label, "Speed changed");
        self.emit(PlaybackEvent::SpeedChanged { label });
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get_state(&self) -> PlaybackState {
        self.inner.lock().state
    }

    pub fn source(&self) -> Option<MediaSource> {
        self.inner.lock().source.clone()
    }

    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.inner.lock().surface
    }

    pub fn speed(&self) -> f32 {
        self.inner.lock().speed
    }

    pub fn speed_preset(&self) -> Option<SpeedPreset> {
        SpeedPreset::from_factor(self.speed())
    }

    /// Cached duration, `None` once it is stale (Idle/Ended).
    pub fn duration(&self) -> Option<f64> {
        self.inner.lock().trusted_duration()
    }

    /// Token of the open session, cancelled when it closes.
    pub fn session_token(&self) -> Option<CancellationToken> {
        self.inner.lock().session.as_ref().map(|s| s.token())
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<Arc<EngineSession>> {
        self.inner.lock().session.clone()
    }

    /// Engine position, `None` without an open session or once the session
    /// is being stopped.
    pub fn position(&self) -> Result<Option<f64>> {
        let Some(session) = self.inner.lock().trusted_session().cloned() else {
            return Ok(None);
        };
        match self.engine.position() {
            Ok(position) => Ok(Some(position)),
            Err(_) if session.is_stopping() => Ok(None),
            Err(err) => Err(PlaybackError::engine("position")(err)),
        }
    }

    /// `position / duration` in `[0, 1]`.
    ///
    /// Returns 0 without asking the engine when the duration is stale, unset
    /// or zero. A reading that fails because a concurrent `stop` already
    /// reached the engine also yields 0.
    pub fn get_progress(&self) -> Result<f64> {
        let Some(session) = self.inner.lock().trusted_session().cloned() else {
            return Ok(0.0);
        };
        let duration = session.duration();
        if !(duration > 0.0) {
            return Ok(0.0);
        }

        match self.engine.position() {
            Ok(position) => Ok(progress_fraction(position, Some(duration))),
            Err(err) if session.is_stopping() => {
                debug!(error = %err, "Position unavailable while stopping");
                Ok(0.0)
            }
            Err(err) => Err(PlaybackError::engine("position")(err)),
        }
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("PlaybackController")
            .field("state", &inner.state)
            .field("source", &inner.source)
            .field("session", &inner.session)
            .field("speed", &inner.speed)
            .finish()
    }
}
