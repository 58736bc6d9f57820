//! Data model and pure logic for collaborative resistance-scored decisions.
//!
//! Nothing in this crate performs I/O: stores, change feeds and sessions live
//! in `consensus-store` and `consensus-session`.

pub mod aggregate;
pub mod decision;
pub mod edit;
pub mod error;
pub mod id;

pub use decision::{Decision, DecisionDraft, DecisionOption, DecisionPatch};
pub use error::CoreError;
pub use id::{DecisionId, OptionId};
