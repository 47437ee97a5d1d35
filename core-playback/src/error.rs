//! # Playback Error Types

use crate::state::PlaybackState;
use bridge_traits::BridgeError;
use std::fmt;
use thiserror::Error;

/// Why a decode submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeBusyReason {
    /// Another decode job has not finished yet.
    JobInFlight,
    /// A playback session holds the engine and the engine cannot share it.
    PlaybackActive,
}

impl fmt::Display for DecodeBusyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeBusyReason::JobInFlight => f.write_str("a decode job is already running"),
            DecodeBusyReason::PlaybackActive => f.write_str("playback is active"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Rejections (state is left untouched)
    // ========================================================================
    /// `start` was called before any source was set.
    #[error("No source set")]
    SourceNotSet,

    #[error("Cannot {operation} while {state}")]
    InvalidStateTransition {
        operation: &'static str,
        state: PlaybackState,
    },

    #[error("Decode busy: {0}")]
    DecodeBusy(DecodeBusyReason),

    /// Playback refused because an exclusive decode job holds the engine.
    #[error("Decode in progress")]
    DecodeInProgress,

    #[error("Invalid speed factor: {0} (must be finite and > 0)")]
    InvalidSpeed(f32),

    #[error("Invalid seek fraction: {0} (must be within [0, 1])")]
    InvalidSeekFraction(f64),

    #[error("No active playback session")]
    NoActiveSession,

    // ========================================================================
    // Engine Errors
    // ========================================================================
    #[error("Engine call `{operation}` failed: {source}")]
    EngineFailure {
        operation: &'static str,
        #[source]
        source: BridgeError,
    },

    // ========================================================================
    // Runtime Errors
    // ========================================================================
    /// Background work was requested outside an async runtime.
    #[error("No async runtime available")]
    RuntimeUnavailable,

    /// The decode worker went away without reporting.
    #[error("Decode job aborted before reporting")]
    DecodeAborted,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    pub(crate) fn engine(operation: &'static str) -> impl FnOnce(BridgeError) -> PlaybackError {
        move |source| PlaybackError::EngineFailure { operation, source }
    }

    /// `true` when the call was refused up front and nothing changed.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PlaybackError::SourceNotSet
                | PlaybackError::InvalidStateTransition { .. }
                | PlaybackError::DecodeBusy(_)
                | PlaybackError::DecodeInProgress
                | PlaybackError::InvalidSpeed(_)
                | PlaybackError::InvalidSeekFraction(_)
                | PlaybackError::NoActiveSession
        )
    }

    pub fn is_engine_failure(&self) -> bool {
        matches!(self, PlaybackError::EngineFailure { .. })
    }

    /// Native status code behind an engine failure, if any.
    pub fn engine_status(&self) -> Option<i32> {
        match self {
            PlaybackError::EngineFailure { source, .. } => source.status_code(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
