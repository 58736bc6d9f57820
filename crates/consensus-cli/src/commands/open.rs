use super::{load_location, open_session, show};
use anyhow::{bail, Result};
use consensus_session::parse_share_link;

pub fn run(target: String, json: bool) -> Result<()> {
    let Some(id) = parse_share_link(&target) else {
        bail!("'{}' is not a decision id or share link", target);
    };
    let mut session = open_session()?;
    session.location_mut().set(&id)?;
    load_location(&mut session)?;
    show::print_decision(&session, json)
}
