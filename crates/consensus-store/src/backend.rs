use crate::error::StoreError;
use crate::feed::Subscription;
use consensus_core::{Decision, DecisionDraft, DecisionId, DecisionPatch};

/// Record-level access to decisions.
///
/// `update` reports only success or failure. The resulting record reaches
/// subscribers, the writer included, through the [`ChangeFeed`].
pub trait DecisionStore {
    fn fetch(&self, id: &DecisionId) -> Result<Decision, StoreError>;

    /// Create a record from `draft`; the store assigns the id.
    fn create(&self, draft: &DecisionDraft) -> Result<Decision, StoreError>;

    fn update(&self, id: &DecisionId, patch: &DecisionPatch) -> Result<(), StoreError>;
}

/// Push channel delivering full-record replacements for one decision.
pub trait ChangeFeed {
    /// Dropping the returned subscription unsubscribes.
    fn subscribe(&self, id: &DecisionId) -> Subscription;
}
