//! Mutation planners.
//!
//! Each function reads the currently held decision and returns the partial
//! update that performs the edit, or `None` when the edit is a no-op. The
//! input record is never modified; option lists in a patch are fresh copies.

use crate::decision::{Decision, DecisionOption, DecisionPatch};
use crate::id::OptionId;

pub fn add_option(decision: &Decision, text: &str, now_ms: i64) -> Option<DecisionPatch> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let id = OptionId::fresh(&decision.option_ids(), now_ms);
    let mut options = decision.options.clone();
    options.push(DecisionOption {
        id,
        text: text.to_string(),
        scores: vec![0; decision.user_count as usize],
    });
    Some(DecisionPatch {
        options: Some(options),
        ..Default::default()
    })
}

pub fn update_option_text(decision: &Decision, id: OptionId, text: &str) -> Option<DecisionPatch> {
    let text = text.trim();
    let current = decision.option(id)?;
    if text.is_empty() || current.text == text {
        return None;
    }
    let options = decision
        .options
        .iter()
        .map(|o| {
            if o.id == id {
                DecisionOption {
                    text: text.to_string(),
                    ..o.clone()
                }
            } else {
                o.clone()
            }
        })
        .collect();
    Some(DecisionPatch {
        options: Some(options),
        ..Default::default()
    })
}

/// Set one participant's score, clamped into `[0, max_score]`.
pub fn update_score(
    decision: &Decision,
    id: OptionId,
    user_index: usize,
    score: i64,
) -> Option<DecisionPatch> {
    if user_index >= decision.user_count as usize {
        return None;
    }
    decision.option(id)?;
    let score = score.clamp(0, i64::from(decision.max_score)) as u32;
    let options = decision
        .options
        .iter()
        .map(|o| {
            if o.id != id {
                return o.clone();
            }
            let scores = o
                .scores
                .iter()
                .enumerate()
                .map(|(i, &s)| if i == user_index { score } else { s })
                .collect();
            DecisionOption {
                scores,
                ..o.clone()
            }
        })
        .collect();
    Some(DecisionPatch {
        options: Some(options),
        ..Default::default()
    })
}

pub fn delete_option(decision: &Decision, id: OptionId) -> Option<DecisionPatch> {
    decision.option(id)?;
    let options = decision
        .options
        .iter()
        .filter(|o| o.id != id)
        .cloned()
        .collect();
    Some(DecisionPatch {
        options: Some(options),
        ..Default::default()
    })
}

/// Resize every option's scores to `new_count`, zero-filling new slots.
///
/// A count below 1 is rejected.
pub fn update_user_count(decision: &Decision, new_count: u32) -> Option<DecisionPatch> {
    if new_count < 1 {
        return None;
    }
    let len = new_count as usize;
    let options = decision
        .options
        .iter()
        .map(|o| DecisionOption {
            scores: (0..len)
                .map(|i| o.scores.get(i).copied().unwrap_or(0))
                .collect(),
            ..o.clone()
        })
        .collect();
    Some(DecisionPatch {
        options: Some(options),
        user_count: Some(new_count),
        ..Default::default()
    })
}

/// Lower or raise the score ceiling. Scores above it are clamped down.
pub fn update_max_score(decision: &Decision, new_max: u32) -> Option<DecisionPatch> {
    let options = decision
        .options
        .iter()
        .map(|o| DecisionOption {
            scores: o.scores.iter().map(|&s| s.min(new_max)).collect(),
            ..o.clone()
        })
        .collect();
    Some(DecisionPatch {
        options: Some(options),
        max_score: Some(new_max),
        ..Default::default()
    })
}

pub fn toggle_veto(decision: &Decision) -> Option<DecisionPatch> {
    Some(DecisionPatch {
        veto_enabled: Some(!decision.veto_enabled),
        ..Default::default()
    })
}

pub fn update_title(decision: &Decision, title: &str) -> Option<DecisionPatch> {
    let title = title.trim();
    if title.is_empty() || decision.title == title {
        return None;
    }
    Some(DecisionPatch {
        title: Some(title.to_string()),
        ..Default::default()
    })
}
