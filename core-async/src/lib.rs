//! Runtime abstraction layer for the media player core.
//!
//! Every `core-*` and `bridge-*` crate depends on this crate instead of
//! depending on tokio directly. The executor is tokio; the modules below
//! re-export the subset of its API the player uses and add a few helpers for
//! code that is called from synchronous control threads (UI, JNI callbacks)
//! and still needs to reach a runtime.
//!
//! # Modules
//!
//! - `task`: task spawning, including blocking work
//! - `time`: periodic intervals, sleeps and timeouts
//! - `sync`: channels, locks and cooperative cancellation
//! - `runtime`: runtime handles and `block_on`
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::CancellationToken;
//! use core_async::time::{interval, Duration};
//!
//! async fn tick_until_cancelled(token: CancellationToken) -> u32 {
//!     let mut ticks = 0;
//!     let mut every = interval(Duration::from_millis(10));
//!     loop {
//!         core_async::select! {
//!             _ = token.cancelled() => return ticks,
//!             _ = every.tick() => ticks += 1,
//!         }
//!     }
//! }
//! ```

pub use core_async_macros::{main, test};

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::{spawn, spawn_blocking};
pub use time::{sleep, Duration, Instant};

/// Waits on several branches and runs the first that completes.
pub use tokio::select;
