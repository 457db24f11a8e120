//! Delayed loads with cancellation.
//!
//! Each `start` opens a new generation. A task finishing under an older
//! generation is dropped, so a slow response can never overwrite the state
//! of a newer request.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(T),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

type Slot<T> = (u64, LoadState<T>);

pub struct DelayedLoad<T> {
    state: Arc<watch::Sender<Slot<T>>>,
    task: Mutex<Option<JoinHandle<()>>>,
    label: &'static str,
}

impl<T> DelayedLoad<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(label: &'static str) -> Self {
        let (tx, _rx) = watch::channel((0, LoadState::Idle));
        Self {
            state: Arc::new(tx),
            task: Mutex::new(None),
            label,
        }
    }

    /// Begin a new load, superseding any in-flight one. Must be called from
    /// within a tokio runtime.
    pub fn start<F>(&self, fut: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.abort_task();
        let mut generation = 0;
        self.state.send_modify(|slot| {
            slot.0 += 1;
            slot.1 = LoadState::Loading;
            generation = slot.0;
        });
        tracing::debug!(load = self.label, generation, "load started");

        let state = Arc::clone(&self.state);
        let label = self.label;
        let handle = tokio::spawn(async move {
            let value = fut.await;
            let applied = state.send_if_modified(|slot| {
                if slot.0 != generation {
                    return false;
                }
                slot.1 = LoadState::Ready(value);
                true
            });
            if applied {
                tracing::debug!(load = label, generation, "load ready");
            } else {
                tracing::warn!(load = label, generation, "discarding stale load result");
            }
        });
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    /// Abort any in-flight load and return to `Idle`.
    pub fn cancel(&self) {
        self.abort_task();
        self.state.send_modify(|slot| {
            slot.0 += 1;
            slot.1 = LoadState::Idle;
        });
        tracing::debug!(load = self.label, "load cancelled");
    }

    pub fn snapshot(&self) -> LoadState<T> {
        self.state.borrow().1.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().0
    }

    /// Wait until the current generation settles. `None` if it was
    /// cancelled or superseded before becoming ready.
    pub async fn wait(&self) -> Option<T> {
        let mut rx = self.state.subscribe();
        let target = rx.borrow().0;
        let settled = rx
            .wait_for(|(generation, state)| *generation != target || !state.is_loading())
            .await
            .ok()?;
        match &*settled {
            (generation, LoadState::Ready(value)) if *generation == target => Some(value.clone()),
            _ => None,
        }
    }

    fn abort_task(&self) {
        if let Some(handle) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

impl<T> Drop for DelayedLoad<T> {
    fn drop(&mut self) {
        if let Some(handle) = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}
