//! Speed-aware master clock.
//!
//! Media time is `(now - anchor) * speed + drift`. Pausing folds the elapsed
//! part into `drift` and drops the anchor; seeking overwrites `drift`. Every
//! method takes `now` so callers (and tests) control the time source.

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct MasterClock {
    anchor: Option<Instant>,
    drift: f64,
    speed: f64,
}

impl MasterClock {
    /// Clock running from media time zero.
    pub fn started(now: Instant, speed: f64) -> Self {
        Self {
            anchor: Some(now),
            drift: 0.0,
            speed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Media time in seconds, never negative.
    pub fn position(&self, now: Instant) -> f64 {
        let running = match self.anchor {
            Some(anchor) => now.saturating_duration_since(anchor).as_secs_f64() * self.speed,
            None => 0.0,
        };
        (running + self.drift).max(0.0)
    }

    pub fn pause(&mut self, now: Instant) {
        if self.anchor.is_some() {
            self.drift = self.position(now);
            self.anchor = None;
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.anchor.is_none() {
            self.anchor = Some(now);
        }
    }

    /// Jumps to `seconds`, keeping the running/paused state.
    pub fn seek(&mut self, now: Instant, seconds: f64) {
        self.drift = seconds.max(0.0);
        if self.anchor.is_some() {
            self.anchor = Some(now);
        }
    }

    /// Changes the rate without moving the current position.
    pub fn set_speed(&mut self, now: Instant, speed: f64) {
        if self.anchor.is_some() {
            self.drift = self.position(now);
            self.anchor = Some(now);
        }
        self.speed = speed;
    }
}
