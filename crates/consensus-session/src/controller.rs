//! Decision session controller.
//!
//! The controller owns the displayed decision and mediates every edit. Edits
//! are never applied locally: each one is planned against the held snapshot,
//! sent to the store as a partial update, and becomes visible only when the
//! change feed echoes the new record back. Feed events carry the record
//! version, and anything not newer than what is displayed is dropped, so a
//! late echo cannot roll the view back.

use crate::clipboard::{Clipboard, CopyIndicator};
use crate::error::SessionError;
use crate::location::Location;
use crate::share::share_link;
use chrono::Utc;
use consensus_core::aggregate::{self, OptionTally};
use consensus_core::edit;
use consensus_core::{Decision, DecisionDraft, DecisionId, DecisionOption, DecisionPatch, OptionId};
use consensus_store::{ChangeEvent, ChangeFeed, DecisionStore, RecentsIndex, Subscription};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionFault {
    /// Loading failed; no decision is held.
    Fetch(String),
    /// A create or update failed; the last confirmed decision is still held.
    Mutation(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Ready,
    Error(SessionFault),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The update request was accepted by the store.
    Sent,
    /// Nothing to send: no editable decision, or the edit was a no-op.
    Skipped,
}

/// Read-only projection of the held decision for rendering.
#[derive(Debug)]
pub struct DecisionView<'a> {
    pub decision: &'a Decision,
    pub tally: Vec<OptionTally>,
    pub winner: Option<&'a DecisionOption>,
}

impl DecisionView<'_> {
    /// 0-based participants vetoing `option`.
    pub fn vetoes(&self, option: &DecisionOption) -> Vec<usize> {
        aggregate::vetoing_users(option, self.decision.max_score, self.decision.veto_enabled)
    }
}

pub struct SessionController<S, L> {
    store: S,
    location: L,
    recents: RecentsIndex,
    share_base_url: String,
    state: SessionState,
    decision: Option<Decision>,
    subscription: Option<Subscription>,
    applied_version: u64,
}

impl<S, L> SessionController<S, L>
where
    S: DecisionStore + ChangeFeed,
    L: Location,
{
    pub fn new(store: S, location: L, recents: RecentsIndex, share_base_url: impl Into<String>) -> Self {
        Self {
            store,
            location,
            recents,
            share_base_url: share_base_url.into(),
            state: SessionState::Idle,
            decision: None,
            subscription: None,
            applied_version: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub fn decision_id(&self) -> Option<&DecisionId> {
        self.decision.as_ref().map(|d| &d.id)
    }

    /// User-facing message for the current fault, if any.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error(SessionFault::Fetch(msg))
            | SessionState::Error(SessionFault::Mutation(msg)) => Some(msg),
            _ => None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn recents(&self) -> &RecentsIndex {
        &self.recents
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "session state");
            self.state = next;
        }
    }

    /// Drop the held decision and its feed subscription.
    fn detach(&mut self) {
        self.subscription = None;
        self.decision = None;
        self.applied_version = 0;
    }

    fn attach(&mut self, decision: Decision, subscription: Subscription) {
        self.applied_version = decision.version;
        self.decision = Some(decision);
        self.subscription = Some(subscription);
        self.transition(SessionState::Ready);
    }

    fn note_recent(&self, id: &DecisionId, title: &str) {
        if let Err(e) = self.recents.record(id, title) {
            tracing::warn!(decision = %id.short(), error = %e, "could not update recents");
        }
    }

    fn point_location_at(&mut self, id: &DecisionId) {
        let already = matches!(self.location.current(), Ok(Some(ref current)) if current == id);
        if already {
            return;
        }
        if let Err(e) = self.location.set(id) {
            tracing::warn!(decision = %id.short(), error = %e, "could not update location");
        }
    }

    /// Load a decision and start following its changes.
    pub fn open(&mut self, id: &DecisionId) -> Result<&Decision, SessionError> {
        self.detach();
        self.transition(SessionState::Loading);

        // Subscribe before fetching so no change between the two is missed.
        let subscription = self.store.subscribe(id);
        match self.store.fetch(id) {
            Ok(decision) => {
                tracing::debug!(decision = %id.short(), version = decision.version, "loaded decision");
                self.note_recent(id, &decision.title);
                self.point_location_at(id);
                self.attach(decision, subscription);
                self.decision
                    .as_ref()
                    .ok_or_else(|| SessionError::Fetch {
                        id: id.to_string(),
                        source: consensus_store::StoreError::DecisionNotFound(id.to_string()),
                    })
            }
            Err(e) => {
                drop(subscription);
                tracing::warn!(decision = %id.short(), error = %e, "failed to load decision");
                self.transition(SessionState::Error(SessionFault::Fetch(e.to_string())));
                Err(SessionError::Fetch {
                    id: id.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Create a decision with default settings and open it.
    pub fn create_decision(&mut self, title: &str) -> Result<&Decision, SessionError> {
        let draft = DecisionDraft::new(title.trim());
        let decision = match self.store.create(&draft) {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(error = %e, "failed to create decision");
                self.transition(SessionState::Error(SessionFault::Mutation(e.to_string())));
                return Err(SessionError::Mutation(e));
            }
        };

        self.detach();
        let subscription = self.store.subscribe(&decision.id);
        self.note_recent(&decision.id, &decision.title);
        self.point_location_at(&decision.id);
        let id = decision.id.clone();
        self.attach(decision, subscription);
        self.decision.as_ref().ok_or_else(|| {
            SessionError::Mutation(consensus_store::StoreError::DecisionNotFound(id.to_string()))
        })
    }

    /// Leave the decision and return to the home view.
    pub fn go_home(&mut self) -> Result<(), SessionError> {
        self.detach();
        self.transition(SessionState::Idle);
        self.location.clear().map_err(SessionError::Location)
    }

    /// Bring the session in line with the location, e.g. after back/forward.
    pub fn sync_location(&mut self) -> Result<(), SessionError> {
        let target = match self.location.current() {
            Ok(target) => target,
            Err(e) => {
                self.detach();
                self.transition(SessionState::Error(SessionFault::Fetch(e.to_string())));
                return Err(SessionError::Location(e));
            }
        };
        match target {
            None => {
                self.detach();
                self.transition(SessionState::Idle);
                Ok(())
            }
            Some(id) => {
                let loaded = self.decision_id() == Some(&id)
                    && !matches!(self.state, SessionState::Error(SessionFault::Fetch(_)));
                if loaded {
                    return Ok(());
                }
                self.open(&id).map(|_| ())
            }
        }
    }

    /// Apply pending change-feed events. Returns how many replaced the
    /// displayed decision.
    pub fn pump(&mut self) -> usize {
        let events = match &self.subscription {
            Some(subscription) => subscription.drain(),
            None => return 0,
        };
        events
            .into_iter()
            .filter(|event| self.apply_event(event))
            .count()
    }

    fn apply_event(&mut self, event: &ChangeEvent) -> bool {
        let Some(current) = &self.decision else {
            return false;
        };
        let incoming = &event.record;
        if incoming.id != current.id {
            return false;
        }
        if incoming.version <= self.applied_version {
            if incoming.version < self.applied_version {
                tracing::warn!(
                    decision = %incoming.id.short(),
                    incoming = incoming.version,
                    applied = self.applied_version,
                    "dropping stale change event"
                );
            }
            return false;
        }
        if incoming.title != current.title {
            if let Err(e) = self.recents.rename(&incoming.id, &incoming.title) {
                tracing::warn!(error = %e, "could not update recents");
            }
        }
        tracing::debug!(decision = %incoming.id.short(), version = incoming.version, "applied change event");
        self.applied_version = incoming.version;
        self.decision = Some(incoming.clone());
        true
    }

    /// The held decision, when edits are allowed.
    fn editable(&self) -> Option<&Decision> {
        match self.state {
            SessionState::Ready | SessionState::Error(SessionFault::Mutation(_)) => {
                self.decision.as_ref()
            }
            _ => None,
        }
    }

    fn mutate<F>(&mut self, what: &'static str, plan: F) -> Result<MutationOutcome, SessionError>
    where
        F: FnOnce(&Decision) -> Option<DecisionPatch>,
    {
        let Some(decision) = self.editable() else {
            tracing::debug!(op = what, state = ?self.state, "edit ignored outside ready state");
            return Ok(MutationOutcome::Skipped);
        };
        let Some(patch) = plan(decision) else {
            tracing::debug!(op = what, "edit is a no-op");
            return Ok(MutationOutcome::Skipped);
        };
        let id = decision.id.clone();
        match self.store.update(&id, &patch) {
            Ok(()) => {
                if matches!(self.state, SessionState::Error(_)) {
                    self.transition(SessionState::Ready);
                }
                Ok(MutationOutcome::Sent)
            }
            Err(e) => {
                tracing::warn!(op = what, decision = %id.short(), error = %e, "update failed");
                self.transition(SessionState::Error(SessionFault::Mutation(e.to_string())));
                Err(SessionError::Mutation(e))
            }
        }
    }

    pub fn add_option(&mut self, text: &str) -> Result<MutationOutcome, SessionError> {
        let now_ms = Utc::now().timestamp_millis();
        self.mutate("add_option", |d| edit::add_option(d, text, now_ms))
    }

    pub fn update_option_text(&mut self, id: OptionId, text: &str) -> Result<MutationOutcome, SessionError> {
        self.mutate("update_option_text", |d| edit::update_option_text(d, id, text))
    }

    /// `user_index` is 0-based. The score is clamped into `[0, max_score]`.
    pub fn update_score(
        &mut self,
        id: OptionId,
        user_index: usize,
        score: i64,
    ) -> Result<MutationOutcome, SessionError> {
        self.mutate("update_score", |d| edit::update_score(d, id, user_index, score))
    }

    pub fn delete_option(&mut self, id: OptionId) -> Result<MutationOutcome, SessionError> {
        self.mutate("delete_option", |d| edit::delete_option(d, id))
    }

    pub fn update_user_count(&mut self, count: u32) -> Result<MutationOutcome, SessionError> {
        self.mutate("update_user_count", |d| edit::update_user_count(d, count))
    }

    pub fn update_max_score(&mut self, max: u32) -> Result<MutationOutcome, SessionError> {
        self.mutate("update_max_score", |d| edit::update_max_score(d, max))
    }

    pub fn toggle_veto(&mut self) -> Result<MutationOutcome, SessionError> {
        self.mutate("toggle_veto", edit::toggle_veto)
    }

    pub fn update_title(&mut self, title: &str) -> Result<MutationOutcome, SessionError> {
        let outcome = self.mutate("update_title", |d| edit::update_title(d, title))?;
        if outcome == MutationOutcome::Sent {
            if let Some(id) = self.decision_id().cloned() {
                if let Err(e) = self.recents.rename(&id, title.trim()) {
                    tracing::warn!(error = %e, "could not update recents");
                }
            }
        }
        Ok(outcome)
    }

    pub fn share_link(&self) -> Option<String> {
        self.decision_id()
            .map(|id| share_link(&self.share_base_url, id))
    }

    /// Copy the share link. Clipboard failures are logged and otherwise ignored.
    pub fn copy_share_link<C: Clipboard>(&self, clipboard: &mut C) -> Option<CopyIndicator> {
        let link = self.share_link()?;
        match clipboard.write_text(&link) {
            Ok(()) => Some(CopyIndicator {
                copied_at: Utc::now(),
            }),
            Err(e) => {
                tracing::warn!(error = %e, "could not copy share link");
                None
            }
        }
    }

    pub fn view(&self) -> Option<DecisionView<'_>> {
        let decision = self.decision.as_ref()?;
        Some(DecisionView {
            decision,
            tally: aggregate::tally(decision),
            winner: aggregate::winning_option(&decision.options),
        })
    }
}
