//! # Progress Poller
//!
//! Periodically reads [`PlaybackController::get_progress`] and hands each
//! value to a single consumer over a bounded channel. The consumer decides
//! which execution context it drains the channel on (a UI queue, a render
//! loop); the poller never touches consumer state.
//!
//! The loop ends when the playback session closes (stop), when
//! [`ProgressPoller::stop`] is called, or when the receiver is dropped.

use crate::config::PlayerConfig;
use crate::controller::PlaybackController;
use crate::error::{PlaybackError, Result};
use crate::session::EngineSession;
use core_async::runtime;
use core_async::select;
use core_async::sync::mpsc::{self, error::TrySendError};
use core_async::sync::CancellationToken;
use core_async::task::{self, JoinHandle};
use core_async::time::{delayed_interval, Duration};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace, warn};

/// One delivery to the progress consumer.
#[derive(Debug)]
pub enum ProgressEvent {
    /// Progress fraction in `[0, 1]`.
    Tick(f64),
    /// The engine failed while the session was still open. Sent at most once
    /// per poll loop; the loop ends afterwards.
    Failed(PlaybackError),
}

pub type ProgressReceiver = mpsc::Receiver<ProgressEvent>;

struct PollTask {
    session: CancellationToken,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollTask {
    fn is_live(&self) -> bool {
        !self.handle.is_finished() && !self.session.is_cancelled() && !self.cancel.is_cancelled()
    }
}

pub struct ProgressPoller {
    controller: Arc<PlaybackController>,
    interval: Duration,
    tx: mpsc::Sender<ProgressEvent>,
    task: Mutex<Option<PollTask>>,
}

impl ProgressPoller {
    /// Creates the poller and the receiving end of its channel.
    ///
    /// Fails with [`PlaybackError::Config`] if `config` does not validate.
    pub fn new(
        controller: Arc<PlaybackController>,
        config: &PlayerConfig,
    ) -> Result<(Self, ProgressReceiver)> {
        config.validate()?;
        let (tx, rx) = mpsc::channel(config.progress_buffer);
        let poller = Self {
            controller,
            interval: config.poll_interval(),
            tx,
            task: Mutex::new(None),
        };
        Ok((poller, rx))
    }

    /// Starts polling the current playback session.
    ///
    /// Returns `Ok(false)` if a loop is already running for this session.
    /// Must be called from within a runtime.
    pub fn start(&self) -> Result<bool> {
        let open = self
            .controller
            .session()
            .ok_or(PlaybackError::NoActiveSession)?;
        let session = open.token();
        let handle = runtime::current_handle().ok_or(PlaybackError::RuntimeUnavailable)?;

        let mut task = self.task.lock();
        if task.as_ref().is_some_and(PollTask::is_live) {
            debug!("Progress poller already running");
            return Ok(false);
        }
        if let Some(stale) = task.take() {
            stale.cancel.cancel();
        }

        let cancel = CancellationToken::new();
        let join = task::spawn_on(
            &handle,
            poll_loop(
                Arc::clone(&self.controller),
                Arc::downgrade(&open),
                session.clone(),
                cancel.clone(),
                self.interval,
                self.tx.clone(),
            ),
        );

        info!(interval_ms = self.interval.as_millis() as u64, "Progress poller started");
        *task = Some(PollTask {
            session,
            cancel,
            handle: join,
        });
        Ok(true)
    }

    /// Signals the loop to exit. It delivers nothing after observing the signal.
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().as_ref() {
            task.cancel.cancel();
        }
    }

    /// Stops the loop and waits for it to finish.
    pub async fn shutdown(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task {
            task.cancel.cancel();
            if let Err(err) = task.handle.await {
                warn!(error = %err, "Progress poller task ended abnormally");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(PollTask::is_live)
    }
}

impl Drop for ProgressPoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.cancel.cancel();
        }
    }
}

async fn poll_loop(
    controller: Arc<PlaybackController>,
    open: Weak<EngineSession>,
    session: CancellationToken,
    cancel: CancellationToken,
    interval: Duration,
    tx: mpsc::Sender<ProgressEvent>,
) {
    let mut ticker = delayed_interval(interval);

    loop {
        select! {
            biased;
            _ = session.cancelled() => break,
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let progress = controller.get_progress();

        // A stop may have reached the engine while it was being read. The
        // session is only upgraded here so the loop never keeps it alive.
        let stopping = open.upgrade().map_or(true, |s| s.is_stopping());
        if stopping || session.is_cancelled() || cancel.is_cancelled() {
            break;
        }

        match progress {
            Ok(fraction) => match tx.try_send(ProgressEvent::Tick(fraction)) {
                Ok(()) => trace!(fraction, "Progress delivered"),
                Err(TrySendError::Full(_)) => trace!(fraction, "Progress consumer lagging, tick dropped"),
                Err(TrySendError::Closed(_)) => {
                    debug!("Progress receiver dropped");
                    break;
                }
            },
            Err(err) => {
                warn!(error = %err, "Progress query failed, poller exiting");
                select! {
                    _ = tx.send(ProgressEvent::Failed(err)) => {}
                    _ = cancel.cancelled() => {}
                    _ = session.cancelled() => {}
                }
                break;
            }
        }
    }

    debug!("Progress poller exited");
}
