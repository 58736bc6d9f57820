//! In-memory backend.
//!
//! Clones share one record table and one feed, so several sessions built on
//! clones of the same `MemoryStore` behave like several connected viewers.
//! Fault injection and deferred echo delivery make race scenarios testable.

use crate::backend::{ChangeFeed, DecisionStore};
use crate::error::StoreError;
use crate::feed::{ChangeEvent, ChangeKind, FeedHub, Subscription};
use consensus_core::{Decision, DecisionDraft, DecisionId, DecisionPatch};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Order in which [`MemoryStore::flush_deferred`] releases held events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOrder {
    /// Submission order.
    Fifo,
    /// Reverse submission order.
    Lifo,
}

#[derive(Default)]
struct MemoryState {
    records: HashMap<DecisionId, Decision>,
    created: u64,
    failures_pending: usize,
    defer: bool,
    deferred: Vec<ChangeEvent>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    hub: FeedHub,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make the next `count` store calls fail with [`StoreError::Unavailable`].
    pub fn fail_next(&self, count: usize) {
        self.state().failures_pending = count;
    }

    /// Hold change events instead of publishing them immediately.
    pub fn defer_broadcasts(&self, defer: bool) {
        self.state().defer = defer;
    }

    /// Publish every held event in the given order. Returns how many were held.
    pub fn flush_deferred(&self, order: FlushOrder) -> usize {
        let mut events = std::mem::take(&mut self.state().deferred);
        if order == FlushOrder::Lifo {
            events.reverse();
        }
        for event in &events {
            self.hub.publish(event);
        }
        events.len()
    }

    pub fn len(&self) -> usize {
        self.state().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_failure(state: &mut MemoryState, op: &str) -> Result<(), StoreError> {
        if state.failures_pending > 0 {
            state.failures_pending -= 1;
            return Err(StoreError::Unavailable(format!("{} rejected", op)));
        }
        Ok(())
    }

    fn emit(&self, event: ChangeEvent) {
        let mut state = self.state();
        if state.defer {
            state.deferred.push(event);
            return;
        }
        drop(state);
        self.hub.publish(&event);
    }
}

impl DecisionStore for MemoryStore {
    fn fetch(&self, id: &DecisionId) -> Result<Decision, StoreError> {
        let mut state = self.state();
        Self::take_failure(&mut state, "fetch")?;
        state
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::DecisionNotFound(id.to_string()))
    }

    fn create(&self, draft: &DecisionDraft) -> Result<Decision, StoreError> {
        let record = {
            let mut state = self.state();
            Self::take_failure(&mut state, "create")?;
            state.created += 1;
            let seed = format!("memory\0{}\0{}", state.created, draft.title);
            let record = draft.clone().into_decision(DecisionId::generate(seed.as_bytes()));
            state.records.insert(record.id.clone(), record.clone());
            record
        };
        self.emit(ChangeEvent {
            kind: ChangeKind::Insert,
            record: record.clone(),
        });
        Ok(record)
    }

    fn update(&self, id: &DecisionId, patch: &DecisionPatch) -> Result<(), StoreError> {
        let record = {
            let mut state = self.state();
            Self::take_failure(&mut state, "update")?;
            let current = state
                .records
                .get(id)
                .ok_or_else(|| StoreError::DecisionNotFound(id.to_string()))?;
            let mut next = current.apply_patch(patch);
            next.version = current.version + 1;
            next.check_invariants()?;
            state.records.insert(id.clone(), next.clone());
            next
        };
        self.emit(ChangeEvent {
            kind: ChangeKind::Update,
            record,
        });
        Ok(())
    }
}

impl ChangeFeed for MemoryStore {
    fn subscribe(&self, id: &DecisionId) -> Subscription {
        self.hub.subscribe(id)
    }
}
