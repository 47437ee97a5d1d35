//! Time primitives.
//!
//! Re-exports tokio's timer wheel (`interval`, `sleep`, `timeout`) together
//! with the std duration types so periodic work such as progress polling can
//! be written against one module.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{interval, Duration, MissedTickBehavior};
//!
//! async fn example() {
//!     let mut ticker = interval(Duration::from_millis(500));
//!     ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
//!     ticker.tick().await; // completes immediately
//!     ticker.tick().await; // completes after ~500ms
//! }
//! ```

pub use tokio::time::{
    interval, interval_at, sleep, sleep_until, timeout, Interval, MissedTickBehavior, Sleep,
    Timeout,
};

pub use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Builds an interval whose first tick fires after one full `period`
/// instead of immediately, and which delays rather than bursts after a stall.
pub fn delayed_interval(period: Duration) -> Interval {
    let start = tokio::time::Instant::now() + period;
    let mut ticker = interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Converts fractional seconds into a `Duration`, saturating negative,
/// NaN and infinite inputs.
pub fn duration_from_secs_f64(secs: f64) -> Duration {
    if !secs.is_finite() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
