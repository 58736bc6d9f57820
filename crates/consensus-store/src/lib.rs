//! Persistence and change notification for decisions.
//!
//! [`DecisionStore`] and [`ChangeFeed`] are the contracts the session layer
//! depends on. [`MemoryStore`] and [`FileStore`] implement both.

pub mod backend;
pub mod config;
pub mod error;
pub mod feed;
pub mod file;
pub mod location;
pub mod lockfile;
pub mod memory;
pub mod recents;

pub use backend::{ChangeFeed, DecisionStore};
pub use config::StoreConfig;
pub use error::StoreError;
pub use feed::{ChangeEvent, ChangeKind, FeedHub, Subscription};
pub use file::FileStore;
pub use location::LocationFile;
pub use memory::{FlushOrder, MemoryStore};
pub use recents::{RecentEntry, RecentsIndex};
