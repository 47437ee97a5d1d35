//! Runtime handles.
//!
//! Playback control calls arrive on synchronous threads. Components that need
//! to start background work from such a call capture a [`Handle`] up front
//! (or look one up with [`current_handle`]) instead of assuming they are
//! already inside a runtime.

pub use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};

/// Returns the handle of the runtime driving the current thread, if any.
pub fn current_handle() -> Option<Handle> {
    Handle::try_current().ok()
}

/// Runs the provided future to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics if the runtime cannot be built or if called from within an
/// asynchronous execution context.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build runtime")
        .block_on(future)
}

/// Builds a multi-threaded runtime for hosts that own their own threads
/// (e.g. a JNI bridge that keeps the runtime alive for the process lifetime).
pub fn multi_thread(worker_threads: usize) -> std::io::Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(worker_threads.max(1))
        .thread_name("media-core-worker")
        .enable_all()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_handle_outside_runtime() {
        assert!(current_handle().is_none());
    }

    #[test]
    fn test_current_handle_inside_runtime() {
        let found = block_on(async { current_handle().is_some() });
        assert!(found);
    }

    #[test]
    fn test_multi_thread_runtime() {
        let rt = multi_thread(2).unwrap();
        let value = rt.block_on(async { 21 * 2 });
        assert_eq!(value, 42);
        assert_eq!(rt.handle().runtime_flavor(), RuntimeFlavor::MultiThread);
    }
}
