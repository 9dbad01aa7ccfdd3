//! Background call scheduling

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::{ApiError, Result};

/// Dispatches calls onto a background scheduler.
///
/// The adapter is bound to one runtime handle for its lifetime; every
/// submitted call runs there, never on the caller's thread.
#[derive(Clone)]
pub struct CallAdapter {
    handle: Handle,
}

impl CallAdapter {
    /// Bind to an explicit runtime handle
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime the caller is currently running on
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| ApiError::Scheduler {
                message: e.to_string(),
            })
    }

    /// Submit work onto the scheduler, producing a cancellable handle
    pub fn submit<T, F>(&self, future: F) -> Call<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Call {
            inner: self.handle.spawn(future),
        }
    }
}

/// A call in flight. Awaiting yields the result; [`Call::cancel`] aborts
/// the underlying task, after which awaiting yields [`ApiError::Cancelled`].
pub struct Call<T> {
    inner: JoinHandle<Result<T>>,
}

impl<T> Call<T> {
    /// Abort the underlying task
    pub fn cancel(&self) {
        self.inner.abort();
    }

    /// Whether the task has finished (completed, failed, or cancelled)
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl<T> Future for Call<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(join_error)) => {
                if join_error.is_cancelled() {
                    Poll::Ready(Err(ApiError::Cancelled))
                } else {
                    Poll::Ready(Err(ApiError::Scheduler {
                        message: join_error.to_string(),
                    }))
                }
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn submitted_work_completes() {
        let adapter = CallAdapter::current().unwrap();
        let call = adapter.submit(async { Ok(21 * 2) });
        assert_eq!(call.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let adapter = CallAdapter::current().unwrap();
        let call: Call<()> = adapter.submit(async { Err(ApiError::NoConverter) });
        assert!(matches!(call.await, Err(ApiError::NoConverter)));
    }

    #[tokio::test]
    async fn cancelled_call_yields_the_cancelled_error() {
        let adapter = CallAdapter::current().unwrap();
        let call: Call<()> = adapter.submit(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });

        call.cancel();

        assert!(matches!(call.await, Err(ApiError::Cancelled)));
    }

    #[tokio::test]
    async fn finished_state_is_observable() {
        let adapter = CallAdapter::current().unwrap();
        let call = adapter.submit(async { Ok(()) });

        // Let the task run to completion before checking.
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(call.is_finished());
        call.await.unwrap();
    }
}
