use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of digest bytes kept in a decision id (32 hex chars).
const DECISION_ID_BYTES: usize = 16;

/// Store-assigned decision identifier, 32 lowercase hex chars.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct DecisionId(String);

impl DecisionId {
    /// Derive an id from arbitrary seed bytes.
    pub fn generate(seed: &[u8]) -> Self {
        let digest = Sha256::digest(seed);
        Self(hex::encode(&digest[..DECISION_ID_BYTES]))
    }

    /// Parse a full 32-char hex string into a DecisionId.
    pub fn parse(hex_str: &str) -> Result<Self, crate::error::CoreError> {
        let hex_str = hex_str.trim();
        if hex_str.len() != DECISION_ID_BYTES * 2 || !hex_str.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(crate::error::CoreError::InvalidDecisionId(
                hex_str.to_string(),
            ));
        }
        Ok(Self(hex_str.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 chars, used for display.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl TryFrom<String> for DecisionId {
    type Error = crate::error::CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DecisionId> for String {
    fn from(id: DecisionId) -> Self {
        id.0
    }
}

impl fmt::Debug for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecisionId({})", self.short())
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Option identifier, unique within one decision's option list.
///
/// Derived from a millisecond timestamp, so it is not monotonic across
/// clock adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub i64);

impl OptionId {
    /// Pick an id for a new option: `now_ms`, unless that collides with an
    /// existing id, in which case one past the largest existing id.
    pub fn fresh(existing: &[OptionId], now_ms: i64) -> Self {
        if !existing.contains(&OptionId(now_ms)) {
            return Self(now_ms);
        }
        let max = existing.iter().map(|id| id.0).max().unwrap_or(now_ms);
        Self(max.saturating_add(1))
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OptionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(OptionId)
    }
}
