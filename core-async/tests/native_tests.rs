//! Integration tests for core-async.
//!
//! These exercise the primitives the player relies on: blocking hand-off,
//! periodic ticks and cooperative cancellation.

use core_async::sync::{mpsc, oneshot, CancellationToken};
use core_async::{runtime, task, time};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[core_async::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    assert_eq!(handle.await.unwrap(), 42);
}

#[core_async::test]
async fn test_task_spawn_blocking() {
    let handle = task::spawn_blocking(|| {
        std::thread::sleep(std::time::Duration::from_millis(10));
        100
    });
    assert_eq!(handle.await.unwrap(), 100);
}

#[core_async::test]
async fn test_spawn_on_explicit_handle() {
    let handle = runtime::current_handle().expect("inside runtime");
    let joined = task::spawn_on(&handle, async { "on handle" }).await.unwrap();
    assert_eq!(joined, "on handle");

    let blocking = task::spawn_blocking_on(&handle, || 5).await.unwrap();
    assert_eq!(blocking, 5);
}

#[core_async::test]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(100)).await;
        42
    })
    .await;

    assert!(result.is_err());
}

#[core_async::test]
async fn test_oneshot_delivers_once() {
    let (tx, rx) = oneshot::channel::<u32>();
    task::spawn_blocking(move || {
        let _ = tx.send(7);
    });
    assert_eq!(rx.await.unwrap(), 7);
}

#[core_async::test]
async fn test_cancellation_stops_interval_loop() {
    let token = CancellationToken::new();
    let ticks = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = mpsc::channel::<usize>(16);

    let loop_token = token.clone();
    let loop_ticks = Arc::clone(&ticks);
    let worker = task::spawn(async move {
        let mut ticker = time::interval(time::Duration::from_millis(5));
        loop {
            core_async::select! {
                biased;
                _ = loop_token.cancelled() => break,
                _ = ticker.tick() => {
                    let n = loop_ticks.fetch_add(1, Ordering::SeqCst) + 1;
                    if tx.send(n).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    assert_eq!(rx.recv().await, Some(1));
    token.cancel();
    worker.await.unwrap();

    let frozen = ticks.load(Ordering::SeqCst);
    time::sleep(time::Duration::from_millis(30)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), frozen);
}
