use std::future::Future;
use std::thread;

use tokio::runtime::{Builder, Handle, Runtime};

use crate::proto::{Error, Result};

/// The single-threaded runtime a [`Client`](crate::Client) blocks on.
///
/// Blocking calls work from plain threads and from inside another tokio
/// runtime. In the latter case the future is driven on a scoped helper thread,
/// since tokio refuses to nest `block_on` on a thread that already runs one.
#[derive(Debug)]
pub(crate) struct BlockingRuntime {
    runtime: Option<Runtime>,
}

impl BlockingRuntime {
    pub(crate) fn new() -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()?;
        Ok(Self {
            runtime: Some(runtime),
        })
    }

    /// Runs the future to completion on this runtime, blocking the caller.
    pub(crate) fn block_on<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
        T: Send,
    {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| Error::protocol("runtime already shut down"))?;

        if Handle::try_current().is_err() {
            return runtime.block_on(future);
        }

        thread::scope(|scope| {
            match scope.spawn(|| runtime.block_on(future)).join() {
                Ok(output) => output,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        })
    }
}

impl Drop for BlockingRuntime {
    fn drop(&mut self) {
        // dropping a runtime normally is refused inside an async context
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
