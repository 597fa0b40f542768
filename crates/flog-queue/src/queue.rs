use flog_core::{FlogError, PendingRequest, QueueState, Result};
use std::future::Future;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::store::QueueStore;

/// Counts from one pass over the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub examined: usize,
    pub retained: usize,
    pub removed: usize,
}

/// The outstanding booking requests, persisted on every change.
///
/// Every operation holds one async lock from read to persist, so adds,
/// clears and sweeps never interleave. The lock is a `tokio::sync::Mutex`
/// because a sweep awaits remote calls while holding it.
pub struct PendingQueue {
    store: QueueStore,
    state: Mutex<QueueState>,
}

impl PendingQueue {
    /// Load the queue from `store`. Fails on a stale format version.
    pub fn open(store: QueueStore) -> Result<Self> {
        let state = store.load()?;
        info!(path = %store.path().display(), pending = state.pending.len(), "pending queue opened");
        Ok(Self {
            store,
            state: Mutex::new(state),
        })
    }

    /// Append `req` unless an equal request is already queued.
    ///
    /// If persisting fails the request stays queued in memory and the
    /// error is returned.
    #[instrument(skip(self), fields(day = %req.day, players = req.players))]
    pub async fn add(&self, req: PendingRequest) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.contains(&req) {
            return Err(FlogError::DuplicateRequest {
                day: req.day,
                players: req.players,
            });
        }
        state.pending.push(req);
        info!(pending = state.pending.len(), "reservation queued");
        self.persist(&state)
    }

    /// Drop every pending request.
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let dropped = state.pending.len();
        state.pending.clear();
        info!(dropped, "pending queue cleared");
        self.persist(&state)
    }

    pub async fn snapshot(&self) -> Vec<PendingRequest> {
        self.state.lock().await.pending.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Run `keep` over every request in order and drop those it rejects.
    ///
    /// The queue stays locked for the whole pass. The file is rewritten only
    /// when something was dropped; a failed write is returned but the
    /// in-memory queue keeps the new contents.
    pub async fn sweep<F, Fut>(&self, mut keep: F) -> Result<SweepReport>
    where
        F: FnMut(PendingRequest) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut state = self.state.lock().await;
        let examined = state.pending.len();
        let mut retained = Vec::with_capacity(examined);
        for req in &state.pending {
            if keep(req.clone()).await {
                retained.push(req.clone());
            }
        }

        let report = SweepReport {
            examined,
            retained: retained.len(),
            removed: examined - retained.len(),
        };
        if report.removed > 0 {
            state.pending = retained;
            self.persist(&state)?;
        }
        Ok(report)
    }

    fn persist(&self, state: &QueueState) -> Result<()> {
        self.store.save(state).inspect_err(|e| {
            error!(error = %e, "failed to save pending queue");
        })
    }
}
