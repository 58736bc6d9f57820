pub mod home;
pub mod init;
pub mod list;
pub mod new;
pub mod open;
pub mod option;
pub mod recents;
pub mod score;
pub mod settings;
pub mod share;
pub mod show;
pub mod watch;

use anyhow::{bail, Context, Result};
use consensus_core::{Decision, OptionId};
use consensus_session::{MutationOutcome, SessionController, SessionError};
use consensus_store::{FileStore, LocationFile};
use std::env;

pub type Session = SessionController<FileStore, LocationFile>;

pub fn discover_store() -> Result<FileStore> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    FileStore::discover(&cwd).context("not a consensus store (run `consensus init`)")
}

/// A session over the store found from the current directory, not yet loaded.
pub fn open_session() -> Result<Session> {
    let store = discover_store()?;
    let location = store.location();
    let recents = store.recents();
    let base = store.config().share_base_url.clone();
    Ok(SessionController::new(store, location, recents, base))
}

/// A session with the decision named by the location loaded.
pub fn ready_session() -> Result<Session> {
    let mut session = open_session()?;
    load_location(&mut session)?;
    if session.decision().is_none() {
        bail!("no decision is open (use `consensus new` or `consensus open`)");
    }
    Ok(session)
}

pub fn load_location(session: &mut Session) -> Result<()> {
    match session.sync_location() {
        Ok(()) => Ok(()),
        Err(e @ SessionError::Fetch { .. }) | Err(e @ SessionError::Location(_)) => {
            bail!("{}\nrun `consensus home` to return to the start", e)
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolve an option argument: a raw option id, or `#N` for the N-th option.
pub fn resolve_option(decision: &Decision, arg: &str) -> Result<OptionId> {
    let arg = arg.trim();
    if let Some(position) = arg.strip_prefix('#') {
        let n: usize = position
            .parse()
            .with_context(|| format!("invalid option position '{}'", arg))?;
        return match n.checked_sub(1).and_then(|i| decision.options.get(i)) {
            Some(option) => Ok(option.id),
            None => bail!("no option at position {}", n),
        };
    }
    arg.parse()
        .with_context(|| format!("invalid option id '{}'", arg))
}

/// Wait for the store's echo of an edit, then print the refreshed decision.
pub fn finish_edit(session: &mut Session, outcome: MutationOutcome, json: bool) -> Result<()> {
    session.pump();
    if outcome == MutationOutcome::Skipped && !json {
        println!("Nothing changed.");
        println!();
    }
    show::print_decision(session, json)
}

/// Resolve an option argument against the held decision.
pub fn held_option(session: &Session, arg: &str) -> Result<OptionId> {
    let decision = session.decision().context("no decision is open")?;
    resolve_option(decision, arg)
}
