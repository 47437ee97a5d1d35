//! Core service façade and bootstrap helpers.
//!
//! [`PlayerService`] wires the engine from a [`CoreConfig`] into one playback
//! controller, its progress poller and a decode orchestrator, all sharing a
//! single event bus and engine arbiter. Hosts call it from their own threads;
//! background work is scheduled on the runtime captured at construction.
//!
//! Desktop apps typically enable the `desktop-shims` feature (which depends
//! on `bridge-desktop`) and call [`bootstrap_desktop`]. Android hosts build a
//! [`CoreConfig`] around their JNI binding wrapped in
//! `bridge_traits::StatusCodeEngine`.

pub mod error;

pub use error::{CoreError, Result};

use std::path::PathBuf;
use std::sync::Arc;

use bridge_traits::{MediaSource, SurfaceHandle};
use core_async::runtime::{self, Handle};
use core_playback::{
    to_percent, DecodeHandle, DecodeJob, DecodeOrchestrator, DecodeReport, PlaybackController,
    PlaybackError, PlaybackState, PlayerConfig, ProgressPoller, ProgressReceiver, SpeedPreset,
};
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, EventStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Primary façade exposed to host applications.
pub struct PlayerService {
    runtime: Handle,
    events: EventBus,
    controller: Arc<PlaybackController>,
    poller: ProgressPoller,
    decoder: DecodeOrchestrator,
}

impl PlayerService {
    /// Builds the service and returns the progress receiver the host drains
    /// on its UI context.
    ///
    /// Must be called from within a runtime; its handle is kept for
    /// background work started from host threads later.
    pub fn new(core: CoreConfig, player: PlayerConfig) -> Result<(Self, ProgressReceiver)> {
        player.validate()?;
        let runtime = runtime::current_handle().ok_or_else(|| {
            CoreError::InitializationFailed(
                "PlayerService must be created inside a runtime".to_string(),
            )
        })?;

        let events = EventBus::new(core.event_buffer);
        let controller = Arc::new(
            PlaybackController::new(Arc::clone(&core.engine), &player).with_events(events.clone()),
        );
        let decoder = DecodeOrchestrator::new(Arc::clone(&core.engine), controller.arbiter())
            .with_events(events.clone())
            .with_clock(Arc::clone(&core.clock));
        let (poller, progress) = ProgressPoller::new(Arc::clone(&controller), &player)?;

        info!(
            capabilities = ?core.engine.capabilities(),
            exclusive = controller.arbiter().is_exclusive(),
            poll_ms = player.poll_interval_ms,
            "Player service ready"
        );

        Ok((
            Self {
                runtime,
                events,
                controller,
                poller,
                decoder,
            },
            progress,
        ))
    }

    pub fn controller(&self) -> Arc<PlaybackController> {
        Arc::clone(&self.controller)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    pub fn set_source(&self, source: MediaSource) {
        self.controller.set_source(source);
    }

    pub fn attach_surface(&self, surface: SurfaceHandle) -> Result<()> {
        Ok(self.controller.attach_surface(surface)?)
    }

    pub fn detach_surface(&self) -> Result<()> {
        Ok(self.controller.detach_surface()?)
    }

    /// Starts playback and the progress poller for the new session.
    ///
    /// If the poller cannot start, playback is stopped again so the error
    /// never leaves a session running.
    pub fn play(&self) -> Result<()> {
        self.controller.start()?;
        let _guard = self.runtime.enter();
        match self.poller.start() {
            Ok(_) => Ok(()),
            Err(err) => Err(self.abandon_play(err)),
        }
    }

    fn abandon_play(&self, err: PlaybackError) -> CoreError {
        warn!(error = %err, "Progress poller did not start, stopping playback");
        if let Err(stop_err) = self.controller.stop() {
            warn!(error = %stop_err, "Failed to stop playback after poller error");
        }
        err.into()
    }

    pub fn pause(&self) -> Result<()> {
        Ok(self.controller.pause(true)?)
    }

    pub fn resume(&self) -> Result<()> {
        Ok(self.controller.pause(false)?)
    }

    /// The single play button: starts from Idle or Ended, otherwise flips
    /// between Playing and Paused. Returns the resulting state.
    pub fn toggle(&self) -> Result<PlaybackState> {
        match self.controller.get_state() {
            PlaybackState::Idle | PlaybackState::Ended => self.play()?,
            PlaybackState::Playing => self.pause()?,
            PlaybackState::Paused => self.resume()?,
            PlaybackState::Seeking => {
                debug!("toggle ignored while seeking");
            }
        }
        Ok(self.controller.get_state())
    }

    /// Stops playback. The poller halts with the session.
    pub fn stop(&self) -> Result<()> {
        self.controller.stop()?;
        self.poller.stop();
        Ok(())
    }

    pub fn seek(&self, fraction: f64) -> Result<()> {
        Ok(self.controller.seek(fraction)?)
    }

    pub fn set_speed(&self, factor: f32) -> Result<()> {
        Ok(self.controller.set_speed(factor)?)
    }

    pub fn cycle_speed(&self) -> Result<SpeedPreset> {
        Ok(self.controller.cycle_speed()?)
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.get_state()
    }

    pub fn progress(&self) -> Result<f64> {
        Ok(self.controller.get_progress()?)
    }

    /// Progress as the 0-100 integer a seek bar takes.
    pub fn progress_percent(&self) -> Result<u8> {
        Ok(to_percent(self.controller.get_progress()?))
    }

    // ------------------------------------------------------------------
    // Decode
    // ------------------------------------------------------------------

    pub fn decode(
        &self,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Result<DecodeHandle> {
        let _guard = self.runtime.enter();
        Ok(self.decoder.submit(DecodeJob::new(input, output))?)
    }

    /// Runs a decode and calls `on_complete` once from the worker thread.
    pub fn decode_with_callback<F>(
        &self,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        on_complete: F,
    ) -> Result<Uuid>
    where
        F: FnOnce(core_playback::Result<DecodeReport>) + Send + 'static,
    {
        let _guard = self.runtime.enter();
        Ok(self
            .decoder
            .submit_with_callback(DecodeJob::new(input, output), on_complete)?)
    }

    pub fn is_decoding(&self) -> bool {
        self.decoder.is_busy()
    }

    /// Stops playback if a session is open and waits for the poller to exit.
    pub async fn shutdown(&self) -> Result<()> {
        if self.controller.get_state().is_active() {
            self.controller.stop()?;
        }
        self.poller.shutdown().await;
        info!("Player service shut down");
        Ok(())
    }
}

impl std::fmt::Debug for PlayerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerService")
            .field("controller", &self.controller)
            .field("decoder", &self.decoder)
            .field("events", &self.events)
            .finish()
    }
}

/// Convenience bootstrapper for desktop hosts: software engine, default
/// player settings.
///
/// ```no_run
/// # #[cfg(feature = "desktop-shims")]
/// # #[core_async::main]
/// # async fn main() -> core_service::Result<()> {
/// use bridge_traits::MediaSource;
///
/// let (player, _progress) = core_service::bootstrap_desktop()?;
/// player.set_source(MediaSource::local("/home/me/clip.mp4"));
/// player.toggle()?;
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "desktop-shims"))]
/// # fn main() {}
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop() -> Result<(PlayerService, ProgressReceiver)> {
    let core = CoreConfig::builder().build()?;
    PlayerService::new(core, PlayerConfig::default())
}
