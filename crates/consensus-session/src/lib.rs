//! Decision session: the controller that sits between presentation code
//! and a decision store, plus the context it is given (location, clipboard).

pub mod clipboard;
pub mod controller;
pub mod error;
pub mod location;
pub mod share;

pub use clipboard::{Clipboard, ClipboardError, CopyIndicator};
pub use controller::{DecisionView, MutationOutcome, SessionController, SessionFault, SessionState};
pub use error::SessionError;
pub use location::{Location, MemoryLocation};
pub use share::{parse_share_link, share_link};
