use chrono::{DateTime, Utc};
use thiserror::Error;

/// How long the "link copied" confirmation stays up.
pub const COPY_INDICATOR_MS: i64 = 2_000;

#[derive(Debug, Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Confirmation shown after a successful copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyIndicator {
    pub copied_at: DateTime<Utc>,
}

impl CopyIndicator {
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        let elapsed = (now - self.copied_at).num_milliseconds();
        (0..COPY_INDICATOR_MS).contains(&elapsed)
    }
}
