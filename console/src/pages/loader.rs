//! Request bookkeeping for list and detail views.
//!
//! DESIGN
//! ======
//! `LatestOnly` hands out a ticket per request. Starting a newer request
//! retires every older ticket, and a retired ticket's result is dropped, so
//! a slow response for an old filter never overwrites a newer one.
//!
//! `ViewTasks` owns the tasks a view spawned. Dropping it aborts whatever is
//! still in flight.

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

/// Generation counter shared by every request one view issues.
#[derive(Clone, Debug, Default)]
pub struct LatestOnly {
    generation: Arc<AtomicU64>,
}

/// Proof of which generation a request belongs to.
#[derive(Clone, Debug)]
pub struct Ticket {
    generation: u64,
    counter: Arc<AtomicU64>,
}

impl Ticket {
    /// No newer request has started since this one.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::Acquire) == self.generation
    }
}

impl LatestOnly {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, retiring all earlier tickets.
    #[must_use]
    pub fn begin(&self) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket { generation, counter: Arc::clone(&self.generation) }
    }

    /// Run `fut` under a fresh ticket. `None` means a newer request started
    /// while this one was in flight.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let ticket = self.begin();
        let output = fut.await;
        if ticket.is_current() {
            Some(output)
        } else {
            tracing::debug!(generation = ticket.generation, "dropping stale response");
            None
        }
    }
}

/// Tasks owned by one mounted view.
#[derive(Debug, Default)]
pub struct ViewTasks {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl ViewTasks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `fut` on the current runtime, tied to this view's lifetime.
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut handles = self.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(tokio::spawn(fut));
    }

    /// Tasks that have not finished yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.lock().iter().filter(|h| !h.is_finished()).count()
    }

    /// Abort everything still running.
    pub fn abort_all(&self) {
        for handle in self.lock().drain(..) {
            handle.abort();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.handles.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Drop for ViewTasks {
    fn drop(&mut self) {
        self.abort_all();
    }
}
