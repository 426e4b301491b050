//! Live query handle returned by `watch_*` repository methods.

use futures_util::Stream;
use futures_util::stream;
use tokio::sync::mpsc;

use crate::db::DbResult;

/// One delivery of a live query: the full result set, or the error raised
/// while recomputing it.
pub type LiveResult<T> = DbResult<Vec<T>>;

/// A subscribed query.
///
/// The first value reflects the table state when the subscription was
/// registered. Afterwards a new value arrives after every committed write to
/// any table the query reads, even when the matching rows did not change.
/// Dropping the handle unregisters it.
pub struct LiveQuery<T> {
    rx: mpsc::UnboundedReceiver<LiveResult<T>>,
    on_cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl<T> LiveQuery<T> {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<LiveResult<T>>,
        on_cancel: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            rx,
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    /// Wait for the next result set.
    ///
    /// Returns `None` once the store has shut down.
    pub async fn next(&mut self) -> Option<LiveResult<T>> {
        self.rx.recv().await
    }

    /// Take an already delivered result without waiting.
    pub fn try_next(&mut self) -> Option<LiveResult<T>> {
        self.rx.try_recv().ok()
    }

    /// Stop observing. No further values are delivered.
    pub fn cancel(self) {}

    /// Adapt into a `Stream` of result sets.
    pub fn into_stream(self) -> impl Stream<Item = LiveResult<T>>
    where
        T: Send + 'static,
    {
        stream::unfold(self, |mut live| async move {
            let item = live.next().await?;
            Some((item, live))
        })
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(cancel) = self.on_cancel.take() {
            cancel();
        }
    }
}

impl<T> std::fmt::Debug for LiveQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveQuery").finish_non_exhaustive()
    }
}
