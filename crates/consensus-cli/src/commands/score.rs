use super::{finish_edit, held_option, ready_session};
use anyhow::{bail, Result};

pub fn run(option: String, user: usize, score: i64, json: bool) -> Result<()> {
    let mut session = ready_session()?;
    let id = held_option(&session, &option)?;
    let user_count = session.decision().map(|d| d.user_count as usize).unwrap_or(0);
    if user == 0 || user > user_count {
        bail!("user must be between 1 and {}", user_count);
    }
    let outcome = session.update_score(id, user - 1, score)?;
    finish_edit(&mut session, outcome, json)
}
