use crate::error::CoreError;
use crate::id::{DecisionId, OptionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_USER_COUNT: u32 = 1;
pub const DEFAULT_MAX_SCORE: u32 = 10;

/// A candidate option and the resistance each participant assigned to it.
///
/// `scores[i]` is the resistance of participant `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub id: OptionId,
    pub text: String,
    pub scores: Vec<u32>,
}

/// A full decision record as held by the store and broadcast by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: DecisionId,
    pub title: String,
    #[serde(default)]
    pub options: Vec<DecisionOption>,
    pub user_count: u32,
    pub max_score: u32,
    #[serde(default)]
    pub veto_enabled: bool,
    /// Store-maintained revision; 1 on creation, bumped on every update.
    #[serde(default)]
    pub version: u64,
}

/// Fields sent to the store when creating a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDraft {
    pub title: String,
    pub user_count: u32,
    pub max_score: u32,
    pub veto_enabled: bool,
}

impl DecisionDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            user_count: DEFAULT_USER_COUNT,
            max_score: DEFAULT_MAX_SCORE,
            veto_enabled: false,
        }
    }

    /// Materialize the draft into a record with a store-assigned id.
    pub fn into_decision(self, id: DecisionId) -> Decision {
        Decision {
            id,
            title: self.title,
            options: Vec::new(),
            user_count: self.user_count,
            max_score: self.max_score,
            veto_enabled: self.veto_enabled,
            version: 1,
        }
    }
}

/// Partial update keyed by decision id. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<DecisionOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veto_enabled: Option<bool>,
}

impl DecisionPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.options.is_none()
            && self.user_count.is_none()
            && self.max_score.is_none()
            && self.veto_enabled.is_none()
    }

    /// Names of the fields this patch carries, in store field order.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.options.is_some() {
            fields.push("options");
        }
        if self.user_count.is_some() {
            fields.push("user_count");
        }
        if self.max_score.is_some() {
            fields.push("max_score");
        }
        if self.veto_enabled.is_some() {
            fields.push("veto_enabled");
        }
        fields
    }
}

impl Decision {
    /// Build the record that results from applying `patch`.
    ///
    /// The version is left as-is; bumping it is the store's job.
    pub fn apply_patch(&self, patch: &DecisionPatch) -> Decision {
        Decision {
            id: self.id.clone(),
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            options: patch
                .options
                .clone()
                .unwrap_or_else(|| self.options.clone()),
            user_count: patch.user_count.unwrap_or(self.user_count),
            max_score: patch.max_score.unwrap_or(self.max_score),
            veto_enabled: patch.veto_enabled.unwrap_or(self.veto_enabled),
            version: self.version,
        }
    }

    pub fn option(&self, id: OptionId) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn option_ids(&self) -> Vec<OptionId> {
        self.options.iter().map(|o| o.id).collect()
    }

    /// Check the structural invariants every stored record must satisfy.
    pub fn check_invariants(&self) -> Result<(), CoreError> {
        if self.user_count < 1 {
            return Err(CoreError::InvariantViolation(
                "user_count must be at least 1".into(),
            ));
        }
        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.id) {
                return Err(CoreError::InvariantViolation(format!(
                    "duplicate option id {}",
                    option.id
                )));
            }
            if option.scores.len() != self.user_count as usize {
                return Err(CoreError::InvariantViolation(format!(
                    "option {} has {} scores, expected {}",
                    option.id,
                    option.scores.len(),
                    self.user_count
                )));
            }
            if let Some(score) = option.scores.iter().find(|&&s| s > self.max_score) {
                return Err(CoreError::InvariantViolation(format!(
                    "option {} has score {} above max_score {}",
                    option.id, score, self.max_score
                )));
            }
        }
        Ok(())
    }
}
