use super::{finish_edit, ready_session};
use anyhow::{bail, Result};

pub fn users(count: u32, json: bool) -> Result<()> {
    if count < 1 {
        bail!("number of users must be at least 1");
    }
    let mut session = ready_session()?;
    let outcome = session.update_user_count(count)?;
    finish_edit(&mut session, outcome, json)
}

pub fn max_score(max: u32, json: bool) -> Result<()> {
    let mut session = ready_session()?;
    let outcome = session.update_max_score(max)?;
    finish_edit(&mut session, outcome, json)
}

pub fn veto(json: bool) -> Result<()> {
    let mut session = ready_session()?;
    let outcome = session.toggle_veto()?;
    finish_edit(&mut session, outcome, json)
}

pub fn title(title: String, json: bool) -> Result<()> {
    let mut session = ready_session()?;
    let outcome = session.update_title(&title)?;
    finish_edit(&mut session, outcome, json)
}
