use super::open_session;
use anyhow::{bail, Result};

pub fn run(title: String, json: bool) -> Result<()> {
    if title.trim().is_empty() {
        bail!("decision title cannot be empty");
    }
    let mut session = open_session()?;
    let id = session.create_decision(&title)?.id.clone();

    if json {
        return super::show::print_decision(&session, true);
    }
    println!("Created decision {}", id);
    if let Some(link) = session.share_link() {
        println!("Share: {}", link);
    }
    Ok(())
}
