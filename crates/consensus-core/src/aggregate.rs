//! Resistance aggregation: per-option totals, the winner, and veto flags.
//!
//! A veto is a highlight only. A vetoed option still takes part in winner
//! selection.

use crate::decision::{Decision, DecisionOption};
use crate::id::OptionId;
use serde::Serialize;

/// Sum of all scores; 0 for an empty list.
pub fn total_resistance(scores: &[u32]) -> u64 {
    scores.iter().map(|&s| u64::from(s)).sum()
}

/// The option with the lowest total resistance.
///
/// Ties go to the first option in stored order.
pub fn winning_option(options: &[DecisionOption]) -> Option<&DecisionOption> {
    let mut best: Option<(&DecisionOption, u64)> = None;
    for option in options {
        let total = total_resistance(&option.scores);
        match best {
            Some((_, min)) if total >= min => {}
            _ => best = Some((option, total)),
        }
    }
    best.map(|(option, _)| option)
}

pub fn is_vetoed(option: &DecisionOption, max_score: u32, veto_enabled: bool) -> bool {
    veto_enabled && option.scores.iter().any(|&s| s == max_score)
}

/// 0-based indices of the participants whose score is a veto.
pub fn vetoing_users(option: &DecisionOption, max_score: u32, veto_enabled: bool) -> Vec<usize> {
    if !veto_enabled {
        return Vec::new();
    }
    option
        .scores
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == max_score)
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionTally {
    pub id: OptionId,
    pub text: String,
    pub total: u64,
    pub vetoed: bool,
    pub is_winner: bool,
}

pub fn tally(decision: &Decision) -> Vec<OptionTally> {
    let winner = winning_option(&decision.options).map(|o| o.id);
    decision
        .options
        .iter()
        .map(|option| OptionTally {
            id: option.id,
            text: option.text.clone(),
            total: total_resistance(&option.scores),
            vetoed: is_vetoed(option, decision.max_score, decision.veto_enabled),
            is_winner: winner == Some(option.id),
        })
        .collect()
}
