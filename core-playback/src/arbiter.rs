//! Engine arbitration between playback and decode.
//!
//! Claims are RAII guards: the slot is released when the guard drops.

use crate::error::{DecodeBusyReason, PlaybackError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct Claims {
    playback: usize,
    decode: bool,
}

/// Tracks which sessions currently run against one engine handle.
#[derive(Debug, Clone)]
pub struct EngineArbiter {
    claims: Arc<Mutex<Claims>>,
    exclusive: bool,
}

impl EngineArbiter {
    /// `exclusive` forbids decode and playback from overlapping.
    pub fn new(exclusive: bool) -> Self {
        Self {
            claims: Arc::new(Mutex::new(Claims::default())),
            exclusive,
        }
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn playback_active(&self) -> bool {
        self.claims.lock().playback > 0
    }

    pub fn decode_in_flight(&self) -> bool {
        self.claims.lock().decode
    }

    pub fn claim_playback(&self) -> Result<PlaybackClaim> {
        let mut claims = self.claims.lock();
        if self.exclusive && claims.decode {
            debug!("Playback claim refused: decode running");
            return Err(PlaybackError::DecodeInProgress);
        }
        claims.playback += 1;
        Ok(PlaybackClaim {
            claims: Arc::clone(&self.claims),
        })
    }

    pub fn claim_decode(&self) -> Result<DecodeClaim> {
        let mut claims = self.claims.lock();
        if claims.decode {
            return Err(PlaybackError::DecodeBusy(DecodeBusyReason::JobInFlight));
        }
        if self.exclusive && claims.playback > 0 {
            return Err(PlaybackError::DecodeBusy(DecodeBusyReason::PlaybackActive));
        }
        claims.decode = true;
        Ok(DecodeClaim {
            claims: Arc::clone(&self.claims),
        })
    }
}

#[derive(Debug)]
pub struct PlaybackClaim {
    claims: Arc<Mutex<Claims>>,
}

impl Drop for PlaybackClaim {
    fn drop(&mut self) {
        let mut claims = self.claims.lock();
        claims.playback = claims.playback.saturating_sub(1);
    }
}

#[derive(Debug)]
pub struct DecodeClaim {
    claims: Arc<Mutex<Claims>>,
}

impl Drop for DecodeClaim {
    fn drop(&mut self) {
        self.claims.lock().decode = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_decode_claim() {
        let arbiter = EngineArbiter::new(false);
        let claim = arbiter.claim_decode().unwrap();
        assert!(matches!(
            arbiter.claim_decode(),
            Err(PlaybackError::DecodeBusy(DecodeBusyReason::JobInFlight))
        ));
        drop(claim);
        assert!(arbiter.claim_decode().is_ok());
    }

    #[test]
    fn test_exclusive_blocks_both_directions() {
        let arbiter = EngineArbiter::new(true);

        let playback = arbiter.claim_playback().unwrap();
        assert!(matches!(
            arbiter.claim_decode(),
            Err(PlaybackError::DecodeBusy(DecodeBusyReason::PlaybackActive))
        ));
        drop(playback);

        let _decode = arbiter.claim_decode().unwrap();
        assert!(matches!(
            arbiter.claim_playback(),
            Err(PlaybackError::DecodeInProgress)
        ));
    }

    #[test]
    fn test_shared_engine_allows_overlap() {
        let arbiter = EngineArbiter::new(false);
        let _playback = arbiter.claim_playback().unwrap();
        let _decode = arbiter.claim_decode().unwrap();
        assert!(arbiter.playback_active());
        assert!(arbiter.decode_in_flight());
    }

    #[test]
    fn test_clones_share_claims() {
        let arbiter = EngineArbiter::new(true);
        let other = arbiter.clone();
        let claim = other.claim_playback().unwrap();
        assert!(arbiter.playback_active());
        drop(claim);
        assert!(!arbiter.playback_active());
    }
}
