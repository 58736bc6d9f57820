//! In-process change feed.
//!
//! Every backend owns a [`FeedHub`]. Writes publish the full new record and
//! the hub forwards it to each live [`Subscription`] for that decision.

use consensus_core::{Decision, DecisionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub record: Decision,
}

struct Subscriber {
    decision: DecisionId,
    tx: Sender<ChangeEvent>,
}

#[derive(Default)]
struct HubState {
    next_key: u64,
    subscribers: HashMap<u64, Subscriber>,
}

fn lock(state: &Mutex<HubState>) -> MutexGuard<'_, HubState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Subscriber registry shared by clones of a backend handle.
#[derive(Clone, Default)]
pub struct FeedHub {
    state: Arc<Mutex<HubState>>,
}

impl FeedHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, decision: &DecisionId) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut state = lock(&self.state);
        let key = state.next_key;
        state.next_key += 1;
        state.subscribers.insert(
            key,
            Subscriber {
                decision: decision.clone(),
                tx,
            },
        );
        tracing::debug!(decision = %decision.short(), key, "feed subscribe");
        Subscription {
            key,
            decision: decision.clone(),
            rx,
            hub: Arc::downgrade(&self.state),
        }
    }

    /// Deliver `event` to every subscriber of its decision. Returns the
    /// number of subscribers reached.
    pub fn publish(&self, event: &ChangeEvent) -> usize {
        let mut state = lock(&self.state);
        let mut dead = Vec::new();
        let mut delivered = 0;
        for (key, sub) in state.subscribers.iter() {
            if sub.decision != event.record.id {
                continue;
            }
            if sub.tx.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*key);
            }
        }
        for key in dead {
            state.subscribers.remove(&key);
        }
        delivered
    }

    /// Decisions with at least one live subscriber.
    pub fn watched(&self) -> Vec<DecisionId> {
        let state = lock(&self.state);
        let mut ids: Vec<DecisionId> = state
            .subscribers
            .values()
            .map(|s| s.decision.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }
}

/// Receiving end of a feed subscription. Dropping it unsubscribes.
pub struct Subscription {
    key: u64,
    decision: DecisionId,
    rx: Receiver<ChangeEvent>,
    hub: Weak<Mutex<HubState>>,
}

impl Subscription {
    pub fn decision(&self) -> &DecisionId {
        &self.decision
    }

    pub fn try_next(&self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    /// Take every event already delivered, in arrival order.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        self.rx.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.hub.upgrade() {
            lock(&state).subscribers.remove(&self.key);
            tracing::debug!(decision = %self.decision.short(), key = self.key, "feed unsubscribe");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("decision", &self.decision)
            .finish()
    }
}
