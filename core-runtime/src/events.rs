//! # Event Bus System
//!
//! Typed broadcast events for playback and decode lifecycle changes.
//!
//! ## Overview
//!
//! - **Event types**: [`CoreEvent`] wrapping [`PlaybackEvent`] and [`DecodeEvent`]
//! - **EventBus**: central `broadcast` channel
//! - **EventStream**: receiver wrapper with optional filtering
//!
//! ```text
//! ┌────────────────────┐   emit   ┌───────────┐  subscribe  ┌────────────┐
//! │ PlaybackController ├─────────>│           ├────────────>│ UI / host  │
//! └────────────────────┘          │ EventBus  │             └────────────┘
//! ┌────────────────────┐   emit   │           │  subscribe  ┌────────────┐
//! │ DecodeOrchestrator ├─────────>│           ├────────────>│ Analytics  │
//! └────────────────────┘          └───────────┘             └────────────┘
//! ```
//!
//! Progress ticks do not travel over the bus. They go through the progress
//! poller's own single-consumer channel.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
//!
//! let bus = EventBus::new(100);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Playback(PlaybackEvent::Paused { position_ms: 61_500 }))
//!     .ok();
//! assert!(rx.try_recv().is_ok());
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events. Non-fatal.
//! - **`RecvError::Closed`**: every sender is gone. Treat as shutdown.
//!
//! `emit` fails only when nobody is subscribed; emitters ignore that with `.ok()`.

use core_async::sync::broadcast;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Playback(PlaybackEvent),
    Decode(DecodeEvent),
}

impl CoreEvent {
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Decode(e) => e.description(),
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Error,
            CoreEvent::Decode(DecodeEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Decode(DecodeEvent::Rejected { .. }) => EventSeverity::Warning,
            CoreEvent::Playback(PlaybackEvent::Started { .. })
            | CoreEvent::Playback(PlaybackEvent::Stopped { .. })
            | CoreEvent::Decode(DecodeEvent::Completed { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Playback controller lifecycle. Times are whole milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A new engine session began.
    Started {
        session_id: String,
        /// Source location as shown to users.
        source: String,
        duration_ms: u64,
    },
    Paused {
        position_ms: u64,
    },
    Resumed {
        position_ms: u64,
    },
    /// Playback reached Ended through `stop`.
    Stopped {
        /// Session that was closed, if one was open.
        session_id: Option<String>,
    },
    Seeked {
        position_ms: u64,
        duration_ms: u64,
    },
    SpeedChanged {
        /// Display label such as "2x".
        label: String,
    },
    Error {
        operation: String,
        message: String,
        /// Whether the same command can be retried.
        recoverable: bool,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Started { .. } => "Playback started",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Resumed { .. } => "Playback resumed",
            PlaybackEvent::Stopped { .. } => "Playback stopped",
            PlaybackEvent::Seeked { .. } => "Playback position changed",
            PlaybackEvent::SpeedChanged { .. } => "Playback speed changed",
            PlaybackEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Decode Events
// ============================================================================

/// Batch decode job lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum DecodeEvent {
    Started {
        job_id: String,
        input: String,
        output: String,
    },
    Completed {
        job_id: String,
        elapsed_ms: u64,
    },
    Failed {
        job_id: String,
        message: String,
    },
    /// A submission was refused before any work started.
    Rejected {
        reason: String,
    },
}

impl DecodeEvent {
    fn description(&self) -> &str {
        match self {
            DecodeEvent::Started { .. } => "Decode started",
            DecodeEvent::Completed { .. } => "Decode completed",
            DecodeEvent::Failed { .. } => "Decode failed",
            DecodeEvent::Rejected { .. } => "Decode rejected",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus. Clone it to get another producer handle.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// `capacity` is how far a subscriber may fall behind before it
    /// receives `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns the number of subscribers that received the event, or an
    /// error when there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    pub fn emit_playback(&self, event: PlaybackEvent) {
        self.emit(CoreEvent::Playback(event)).ok();
    }

    pub fn emit_decode(&self, event: DecodeEvent) {
        self.emit(CoreEvent::Decode(event)).ok();
    }

    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// `broadcast::Receiver` with an optional filter.
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Returns `None` if no matching event is currently buffered.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
