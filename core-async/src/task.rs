//! Task spawning.
//!
//! `spawn` runs a future on the ambient runtime; `spawn_blocking` moves a
//! synchronous, possibly long-running closure (engine decode calls, file I/O)
//! onto the dedicated blocking pool so it never stalls async workers.
//!
//! Both panic when called outside a runtime. Code that may run on a plain
//! thread should look up a handle first with
//! [`runtime::current_handle`](crate::runtime::current_handle) and use
//! [`spawn_on`] / [`spawn_blocking_on`].
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//!
//! async fn example() {
//!     let handle = task::spawn(async { 42 });
//!     assert_eq!(handle.await.unwrap(), 42);
//!
//!     let blocking = task::spawn_blocking(|| 7 * 6);
//!     assert_eq!(blocking.await.unwrap(), 42);
//! }
//! ```

use crate::runtime::Handle;
use std::future::Future;

pub use tokio::task::{yield_now, AbortHandle, JoinError, JoinHandle};

/// Spawns a future onto the current runtime.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Runs a blocking closure on the runtime's blocking thread pool.
pub fn spawn_blocking<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
}

/// Spawns a future onto an explicit runtime handle.
pub fn spawn_on<F>(handle: &Handle, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    handle.spawn(future)
}

/// Runs a blocking closure on the blocking pool of an explicit runtime handle.
pub fn spawn_blocking_on<F, R>(handle: &Handle, f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    handle.spawn_blocking(f)
}

/// Result type for joined tasks.
pub type Result<T> = std::result::Result<T, JoinError>;
