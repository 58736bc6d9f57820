use super::{ready_session, show};
use anyhow::Result;
use std::thread;
use std::time::Duration;

pub fn run(iterations: Option<usize>, json: bool) -> Result<()> {
    let mut session = ready_session()?;
    let interval = Duration::from_millis(session.store().config().poll_interval_ms);
    show::print_decision(&session, json)?;

    let mut polls = 0;
    while iterations.map_or(true, |limit| polls < limit) {
        thread::sleep(interval);
        polls += 1;
        session.store().poll()?;
        if session.pump() > 0 {
            tracing::debug!(polls, "decision changed");
            if !json {
                println!();
                println!("---");
            }
            show::print_decision(&session, json)?;
        }
    }
    Ok(())
}
