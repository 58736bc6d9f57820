use super::{open_session, recents};
use anyhow::Result;

pub fn run(json: bool) -> Result<()> {
    let mut session = open_session()?;
    session.go_home()?;
    if json {
        return recents::print_entries(&session.recents().list(), true);
    }
    println!("No decision open.");
    recents::print_entries(&session.recents().list(), false)
}
