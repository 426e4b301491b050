//! Change tracking for live queries.
//!
//! Every live query is registered with the tables it reads. Committed writes
//! report the tables they touched; a single dispatcher task then recomputes
//! the affected queries one after another, in registration order, and sends
//! each subscriber its fresh result. Initial results are computed by the same
//! task so a subscriber never sees an older snapshot after a newer one.
//!
//! Invalidation is coarse: any write to a table reruns every query reading
//! it, whether or not the rows it returns changed.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::db::{LiveQuery, LiveResult, Table};

type Fetch<T> = Box<dyn Fn(SqlitePool) -> BoxFuture<'static, LiveResult<T>> + Send + Sync>;

/// Type-erased registry entry.
trait Subscription: Send + Sync {
    fn reads_any(&self, tables: &[Table]) -> bool;

    /// Recompute and deliver. Returns `false` once the consumer is gone.
    fn refresh<'a>(&'a self, pool: &'a SqlitePool) -> BoxFuture<'a, bool>;
}

struct Subscriber<T> {
    id: u64,
    tables: Vec<Table>,
    fetch: Fetch<T>,
    sink: mpsc::UnboundedSender<LiveResult<T>>,
}

impl<T: Send + 'static> Subscription for Subscriber<T> {
    fn reads_any(&self, tables: &[Table]) -> bool {
        self.tables.iter().any(|t| tables.contains(t))
    }

    fn refresh<'a>(&'a self, pool: &'a SqlitePool) -> BoxFuture<'a, bool> {
        async move {
            if self.sink.is_closed() {
                return false;
            }
            let result = (self.fetch)(pool.clone()).await;
            if let Err(e) = &result {
                warn!(id = self.id, error = %e, "live query failed to recompute");
            }
            self.sink.send(result).is_ok()
        }
        .boxed()
    }
}

type Registry = Arc<Mutex<BTreeMap<u64, Arc<dyn Subscription>>>>;

fn lock(registry: &Registry) -> MutexGuard<'_, BTreeMap<u64, Arc<dyn Subscription>>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

enum Signal {
    /// Deliver the initial result of a new subscription.
    Prime(u64),
    /// A transaction touching these tables committed.
    Changed(Vec<Table>),
}

/// Table-to-subscriber mapping plus the post-commit hook.
pub(crate) struct ChangeTracker {
    registry: Registry,
    next_id: AtomicU64,
    signals: mpsc::UnboundedSender<Signal>,
}

impl ChangeTracker {
    /// Create the tracker and spawn its dispatcher on the current runtime.
    ///
    /// The dispatcher stops when the tracker is dropped.
    pub(crate) fn start(pool: SqlitePool) -> Self {
        let registry: Registry = Arc::new(Mutex::new(BTreeMap::new()));
        let (signals, rx) = mpsc::unbounded_channel();
        tokio::spawn(dispatch(pool, Arc::clone(&registry), rx));
        Self {
            registry,
            next_id: AtomicU64::new(1),
            signals,
        }
    }

    /// Called after a transaction commits.
    pub(crate) fn notify(&self, tables: &[Table]) {
        if lock(&self.registry).is_empty() {
            return;
        }
        let _ = self.signals.send(Signal::Changed(tables.to_vec()));
    }

    /// Register a live query reading `tables`.
    pub(crate) fn watch<T, F, Fut>(&self, tables: &[Table], fetch: F) -> LiveQuery<T>
    where
        T: Send + 'static,
        F: Fn(SqlitePool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = LiveResult<T>> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sink, rx) = mpsc::unbounded_channel();
        let subscriber = Subscriber {
            id,
            tables: tables.to_vec(),
            fetch: Box::new(move |pool| fetch(pool).boxed()),
            sink,
        };

        lock(&self.registry).insert(id, Arc::new(subscriber));
        debug!(id, ?tables, "live query registered");
        let _ = self.signals.send(Signal::Prime(id));

        let registry = Arc::downgrade(&self.registry);
        LiveQuery::new(rx, move || {
            if let Some(registry) = registry.upgrade()
                && lock(&registry).remove(&id).is_some()
            {
                debug!(id, "live query cancelled");
            }
        })
    }

    /// Number of registered live queries.
    pub(crate) fn len(&self) -> usize {
        lock(&self.registry).len()
    }
}

async fn dispatch(pool: SqlitePool, registry: Registry, mut signals: mpsc::UnboundedReceiver<Signal>) {
    while let Some(signal) = signals.recv().await {
        let targets: Vec<(u64, Arc<dyn Subscription>)> = {
            let subscribers = lock(&registry);
            match &signal {
                Signal::Prime(id) => subscribers
                    .get(id)
                    .map(|s| (*id, Arc::clone(s)))
                    .into_iter()
                    .collect(),
                Signal::Changed(tables) => subscribers
                    .iter()
                    .filter(|(_, s)| s.reads_any(tables))
                    .map(|(id, s)| (*id, Arc::clone(s)))
                    .collect(),
            }
        };

        for (id, subscriber) in targets {
            if !subscriber.refresh(&pool).await {
                lock(&registry).remove(&id);
                debug!(id, "dropped live query without consumer");
            }
        }
    }
    debug!("change dispatcher stopped");
}
