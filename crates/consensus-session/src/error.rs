use consensus_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The decision could not be loaded. Blocks the view.
    #[error("could not load decision {id}: {source}")]
    Fetch {
        id: String,
        #[source]
        source: StoreError,
    },

    /// A create or update request failed. The held decision is kept.
    #[error("update failed: {0}")]
    Mutation(#[source] StoreError),

    #[error("location error: {0}")]
    Location(#[source] StoreError),
}
