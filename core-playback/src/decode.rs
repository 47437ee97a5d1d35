//! # Decode Orchestrator
//!
//! Runs the engine's blocking decode-to-file entry point on the blocking pool
//! and reports completion exactly once.
//!
//! At most one job runs at a time. A second submission is rejected with
//! [`PlaybackError::DecodeBusy`]; it is never queued. When the engine cannot
//! decode while playing, submissions are also rejected while a playback
//! session is open. In-flight jobs cannot be cancelled.

use crate::arbiter::{DecodeClaim, EngineArbiter};
use crate::error::{PlaybackError, Result};
use bridge_traits::{Clock, MediaEngine, SystemClock};
use chrono::{DateTime, Utc};
use core_async::runtime;
use core_async::sync::oneshot;
use core_async::task;
use core_async::time::{Duration, Instant};
use core_runtime::events::{DecodeEvent, EventBus};
use core_runtime::logging::strip_path;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl DecodeJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Outcome of a successful decode.
#[derive(Debug, Clone)]
pub struct DecodeReport {
    pub job_id: Uuid,
    pub input: PathBuf,
    pub output: PathBuf,
    pub elapsed: Duration,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Resolves once the job finishes. Dropping it does not cancel the job.
#[derive(Debug)]
pub struct DecodeHandle {
    job_id: Uuid,
    rx: oneshot::Receiver<Result<DecodeReport>>,
}

impl DecodeHandle {
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }
}

impl Future for DecodeHandle {
    type Output = Result<DecodeReport>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(PlaybackError::DecodeAborted)))
    }
}

pub struct DecodeOrchestrator {
    engine: Arc<dyn MediaEngine>,
    arbiter: EngineArbiter,
    events: Option<EventBus>,
    clock: Arc<dyn Clock>,
}

impl DecodeOrchestrator {
    /// The arbiter must be the one the playback controller claims from,
    /// otherwise exclusivity is not enforced.
    pub fn new(engine: Arc<dyn MediaEngine>, arbiter: EngineArbiter) -> Self {
        Self {
            engine,
            arbiter,
            events: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// `true` while a job is in flight.
    pub fn is_busy(&self) -> bool {
        self.arbiter.decode_in_flight()
    }

    /// Starts `job` in the background.
    ///
    /// Rejections are synchronous; once this returns `Ok` the handle resolves
    /// exactly once.
    pub fn submit(&self, job: DecodeJob) -> Result<DecodeHandle> {
        let (tx, rx) = oneshot::channel();
        let job_id = self.launch(job, move |result| {
            // Receiver may be gone; the job still ran to completion.
            let _ = tx.send(result);
        })?;
        Ok(DecodeHandle { job_id, rx })
    }

    /// Starts `job` and invokes `on_complete` exactly once from the worker
    /// thread when it finishes.
    pub fn submit_with_callback<F>(&self, job: DecodeJob, on_complete: F) -> Result<Uuid>
    where
        F: FnOnce(Result<DecodeReport>) + Send + 'static,
    {
        self.launch(job, on_complete)
    }

    fn launch<F>(&self, job: DecodeJob, complete: F) -> Result<Uuid>
    where
        F: FnOnce(Result<DecodeReport>) + Send + 'static,
    {
        let handle = runtime::current_handle().ok_or(PlaybackError::RuntimeUnavailable)?;

        let claim = match self.arbiter.claim_decode() {
            Ok(claim) => claim,
            Err(err) => {
                warn!(error = %err, "Decode rejected");
                if let Some(events) = &self.events {
                    events.emit_decode(DecodeEvent::Rejected {
                        reason: err.to_string(),
                    });
                }
                return Err(err);
            }
        };

        let job_id = Uuid::new_v4();
        if let Some(events) = &self.events {
            events.emit_decode(DecodeEvent::Started {
                job_id: job_id.to_string(),
                input: job.input.display().to_string(),
                output: job.output.display().to_string(),
            });
        }

        let events = self.events.clone();
        let worker = DecodeWorker {
            job_id,
            job,
            engine: Arc::clone(&self.engine),
            events: self.events.clone(),
            clock: Arc::clone(&self.clock),
            _claim: claim,
        };

        // The claim lives in the worker and is released before `complete`
        // runs, so a callback may submit the next job. A panicking engine
        // unwinds through the worker, which releases the claim as well.
        task::spawn_blocking_on(&handle, move || {
            let result = match panic::catch_unwind(AssertUnwindSafe(|| worker.run())) {
                Ok(result) => result,
                Err(_) => {
                    error!(%job_id, "Decode worker panicked");
                    if let Some(events) = &events {
                        events.emit_decode(DecodeEvent::Failed {
                            job_id: job_id.to_string(),
                            message: PlaybackError::DecodeAborted.to_string(),
                        });
                    }
                    Err(PlaybackError::DecodeAborted)
                }
            };
            complete(result);
        });
        Ok(job_id)
    }
}

impl std::fmt::Debug for DecodeOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeOrchestrator")
            .field("arbiter", &self.arbiter)
            .field("events", &self.events.is_some())
            .finish()
    }
}

struct DecodeWorker {
    job_id: Uuid,
    job: DecodeJob,
    engine: Arc<dyn MediaEngine>,
    events: Option<EventBus>,
    clock: Arc<dyn Clock>,
    _claim: DecodeClaim,
}

impl DecodeWorker {
    #[instrument(name = "decode_job", skip(self), fields(job_id = %self.job_id))]
    fn run(self) -> Result<DecodeReport> {
        let input = self.job.input.to_string_lossy().into_owned();
        info!(input = %strip_path(&input), "Decode running");
        let started_at = self.clock.now();
        let timer = Instant::now();

        let outcome = self.engine.run_decode(&self.job.input, &self.job.output);
        let elapsed = timer.elapsed();
        let finished_at = self.clock.now();

        let Self {
            job_id,
            job,
            events,
            _claim,
            ..
        } = self;
        drop(_claim);

        match outcome {
            Ok(()) => {
                info!(elapsed_ms = elapsed.as_millis() as u64, "Decode completed");
                if let Some(events) = &events {
                    events.emit_decode(DecodeEvent::Completed {
                        job_id: job_id.to_string(),
                        elapsed_ms: elapsed.as_millis() as u64,
                    });
                }
                Ok(DecodeReport {
                    job_id,
                    input: job.input,
                    output: job.output,
                    elapsed,
                    started_at,
                    finished_at,
                })
            }
            Err(err) => {
                let err = PlaybackError::engine("run_decode")(err);
                error!(error = %err, "Decode failed");
                if let Some(events) = &events {
                    events.emit_decode(DecodeEvent::Failed {
                        job_id: job_id.to_string(),
                        message: err.to_string(),
                    });
                }
                Err(err)
            }
        }
    }
}
