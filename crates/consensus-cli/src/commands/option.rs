use super::{finish_edit, held_option, ready_session};
use anyhow::Result;

pub fn add(text: String, json: bool) -> Result<()> {
    let mut session = ready_session()?;
    let outcome = session.add_option(&text)?;
    finish_edit(&mut session, outcome, json)
}

pub fn edit(option: String, text: String, json: bool) -> Result<()> {
    let mut session = ready_session()?;
    let id = held_option(&session, &option)?;
    let outcome = session.update_option_text(id, &text)?;
    finish_edit(&mut session, outcome, json)
}

pub fn remove(option: String, json: bool) -> Result<()> {
    let mut session = ready_session()?;
    let id = held_option(&session, &option)?;
    let outcome = session.delete_option(id)?;
    finish_edit(&mut session, outcome, json)
}
