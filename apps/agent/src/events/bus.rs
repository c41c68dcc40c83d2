use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use tracing::warn;
use uuid::Uuid;

use crate::events::AgentEvent;

pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

type Callback = Arc<dyn Fn(&AgentEvent) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

struct Inner {
    subscribers: Vec<(SubscriberId, Callback)>,
    history: VecDeque<AgentEvent>,
    next_id: u64,
}

/// Process-wide publish/subscribe channel with bounded FIFO history.
///
/// Shared between concurrent runs as an `Arc<EventBus>`; every emitted
/// event is tagged with its run's session id, so per-run observers filter
/// on that. A panicking subscriber is caught and logged — it never breaks
/// delivery to the others or aborts the emitting run.
pub struct EventBus {
    inner: Mutex<Inner>,
    max_history: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                subscribers: Vec::new(),
                history: VecDeque::new(),
                next_id: 0,
            }),
            max_history,
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&AgentEvent) + Send + Sync + 'static) -> SubscriberId {
        let mut inner = self.inner.lock().expect("event bus lock poisoned");
        let id = SubscriberId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Removes a subscriber. Returns false if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut inner = self.inner.lock().expect("event bus lock poisoned");
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() != before
    }

    /// Appends to history (evicting the oldest on overflow) and notifies
    /// every subscriber. Callbacks run outside the lock so a subscriber may
    /// itself read the bus.
    pub fn emit(&self, event: AgentEvent) {
        let callbacks: Vec<Callback> = {
            let mut inner = self.inner.lock().expect("event bus lock poisoned");
            inner.history.push_back(event.clone());
            while inner.history.len() > self.max_history {
                inner.history.pop_front();
            }
            inner.subscribers.iter().map(|(_, cb)| cb.clone()).collect()
        };

        for callback in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(&event))).is_err() {
                warn!(event_type = ?event.event_type, "event subscriber panicked; continuing delivery");
            }
        }
    }

    pub fn history(&self) -> Vec<AgentEvent> {
        let inner = self.inner.lock().expect("event bus lock poisoned");
        inner.history.iter().cloned().collect()
    }

    /// History scoped to one run, in arrival order.
    pub fn session_history(&self, session_id: Uuid) -> Vec<AgentEvent> {
        let inner = self.inner.lock().expect("event bus lock poisoned");
        inner
            .history
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn history_len(&self) -> usize {
        let inner = self.inner.lock().expect("event bus lock poisoned");
        inner.history.len()
    }

    pub fn clear_history(&self) {
        let mut inner = self.inner.lock().expect("event bus lock poisoned");
        inner.history.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
