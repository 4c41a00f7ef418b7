//! Async task and stream handles returned by resource operations.
//!
//! Channel-based: the work runs on a spawned tokio task and the handle only
//! owns the receiving end.

use futures::Stream;
use log::warn;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};

// ============================================================================
// AsyncTask - Single-result async operation
// ============================================================================

/// A handle to an asynchronous task that produces a single result.
///
/// Awaiting yields `Err(RecvError)` only if the task panicked before sending.
pub struct AsyncTask<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> AsyncTask<T>
where
    T: Send + 'static,
{
    #[inline]
    #[must_use]
    pub fn new(rx: oneshot::Receiver<T>) -> Self {
        Self { rx }
    }

    /// Spawn an async operation on the current tokio runtime.
    #[inline]
    pub fn spawn_async<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn(async move {
            let _ = tx.send(future.await);
        });
        Self::new(rx)
    }

    /// A task that is already complete.
    #[must_use]
    pub fn ready(value: T) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(value);
        Self::new(rx)
    }
}

impl<T> Future for AsyncTask<T> {
    type Output = Result<T, oneshot::error::RecvError>;

    #[inline]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx)
    }
}

// ============================================================================
// AsyncStream - Multi-result streaming operation
// ============================================================================

/// A handle to an asynchronous stream that produces multiple results.
pub struct AsyncStream<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> AsyncStream<T> {
    #[inline]
    #[must_use]
    pub fn new(rx: mpsc::UnboundedReceiver<T>) -> Self {
        Self { rx }
    }

    /// Stream the items of a vector.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        for item in items {
            if tx.send(item).is_err() {
                break;
            }
        }
        Self::new(rx)
    }
}

impl<T, E> AsyncStream<Result<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Run `future` and stream its items in order.
    ///
    /// On failure the stream yields the single error and ends.
    pub fn from_batch<F>(future: F) -> Self
    where
        F: Future<Output = Result<Vec<T>, E>> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            match future.await {
                Ok(items) => {
                    for item in items {
                        if tx.send(Ok(item)).is_err() {
                            break; // Receiver dropped
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                }
            }
        });
        Self::new(rx)
    }
}

impl<T> Stream for AsyncStream<T> {
    type Item = T;

    #[inline]
    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

// ============================================================================
// Detached side work
// ============================================================================

/// Run `work` in the background without ever joining it into a caller.
///
/// Errors and panics are logged at `warn` under `label`. Outside a tokio
/// runtime the work is dropped with a warning.
pub fn spawn_detached<F, E>(label: &'static str, work: F)
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        warn!("{label}: no async runtime available; skipped");
        return;
    };
    let task = handle.spawn(work);
    handle.spawn(async move {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("{label} failed: {e}"),
            Err(join) => warn!("{label} aborted: {join}"),
        }
    });
}
