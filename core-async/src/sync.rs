//! Synchronization primitives.
//!
//! Async-aware channels and locks from `tokio::sync`, plus
//! `tokio_util`'s [`CancellationToken`] for cooperative shutdown of
//! background loops.
//!
//! Channel choice in the player:
//! - `mpsc`: single-consumer hand-off (progress ticks to one observer)
//! - `oneshot`: exactly-once completion reports (decode jobs)
//! - `broadcast`: fan-out notifications (event bus)
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::{mpsc, CancellationToken};
//!
//! async fn example() {
//!     let (tx, mut rx) = mpsc::channel::<f64>(8);
//!     let token = CancellationToken::new();
//!     let child = token.child_token();
//!
//!     tx.send(0.25).await.unwrap();
//!     assert_eq!(rx.recv().await, Some(0.25));
//!
//!     token.cancel();
//!     assert!(child.is_cancelled());
//! }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard, Semaphore, SemaphorePermit,
};

pub use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};
