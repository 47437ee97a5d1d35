//! Engine session: the owned resource behind one playback lifecycle.

use crate::arbiter::PlaybackClaim;
use bridge_traits::{BridgeError, MediaEngine, MediaSource};
use core_async::sync::CancellationToken;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Created by a successful `start`, closed by `stop`.
///
/// Owns the cached duration, a cancellation token that background work
/// (the progress poller) watches, and the playback claim on the engine.
/// Dropping an open session stops the engine best-effort.
pub struct EngineSession {
    id: Uuid,
    source: MediaSource,
    duration: f64,
    token: CancellationToken,
    engine: Arc<dyn MediaEngine>,
    closed: AtomicBool,
    stopping: AtomicBool,
    _claim: PlaybackClaim,
}

impl EngineSession {
    pub(crate) fn open(
        engine: Arc<dyn MediaEngine>,
        source: MediaSource,
        duration: f64,
        claim: PlaybackClaim,
    ) -> Self {
        let id = Uuid::new_v4();
        debug!(session_id = %id, duration, "Engine session opened");
        Self {
            id,
            source,
            duration,
            token: CancellationToken::new(),
            engine,
            closed: AtomicBool::new(false),
            stopping: AtomicBool::new(false),
            _claim: claim,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    /// Duration fetched right after the engine started, in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Cancelled when the session closes.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// `true` from the moment a stop is issued to the engine. Engine
    /// readings taken after this point may fail without the engine being at
    /// fault.
    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire) || self.is_closed()
    }

    /// Stops the engine. On failure the session stays open.
    pub fn close(&self) -> Result<(), BridgeError> {
        if self.is_closed() {
            return Ok(());
        }
        self.stopping.store(true, Ordering::Release);
        if let Err(err) = self.engine.stop() {
            self.stopping.store(false, Ordering::Release);
            return Err(err);
        }
        self.mark_closed();
        Ok(())
    }

    fn mark_closed(&self) {
        self.closed.store(true, Ordering::Release);
        self.token.cancel();
        debug!(session_id = %self.id, "Engine session closed");
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        if self.is_closed() {
            return;
        }
        self.stopping.store(true, Ordering::Release);
        self.token.cancel();
        if let Err(err) = self.engine.stop() {
            warn!(session_id = %self.id, error = %err, "Failed to stop engine for dropped session");
        }
    }
}

impl std::fmt::Debug for EngineSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineSession")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("duration", &self.duration)
            .field("closed", &self.is_closed())
            .finish()
    }
}
