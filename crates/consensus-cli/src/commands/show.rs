use super::{load_location, open_session, recents, Session};
use anyhow::Result;

pub fn run(json: bool) -> Result<()> {
    let mut session = open_session()?;
    load_location(&mut session)?;
    if session.decision().is_none() {
        if json {
            println!("null");
            return Ok(());
        }
        println!("No decision open. Create one with `consensus new <title>`.");
        return recents::print_entries(&session.recents().list(), false);
    }
    print_decision(&session, json)
}

pub fn print_decision(session: &Session, json: bool) -> Result<()> {
    let Some(view) = session.view() else {
        if json {
            println!("null");
        } else {
            println!("No decision open.");
        }
        return Ok(());
    };
    let decision = view.decision;

    if json {
        let value = serde_json::json!({
            "decision": decision,
            "tally": view.tally,
            "winner": view.winner.map(|o| o.id),
            "share_link": session.share_link(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("decision {}", decision.id);
    println!("Title:     {}", decision.title);
    println!("Users:     {}", decision.user_count);
    println!("Max score: {}", decision.max_score);
    println!("Veto:      {}", if decision.veto_enabled { "on" } else { "off" });
    println!("Version:   {}", decision.version);

    if let Some(message) = session.error_message() {
        println!();
        println!("! {}", message);
    }

    if decision.options.is_empty() {
        println!();
        println!("No options yet. Add one with `consensus option add <text>`.");
        return Ok(());
    }

    for (position, (option, row)) in decision.options.iter().zip(&view.tally).enumerate() {
        println!();
        println!("#{} {} [{}]", position + 1, option.text, option.id);
        let vetoes = view.vetoes(option);
        for (user, score) in option.scores.iter().enumerate() {
            let marker = if vetoes.contains(&user) { " (VETO)" } else { "" };
            println!("    User {} resistance: {}{}", user + 1, score, marker);
        }
        println!("    Total resistance: {}", row.total);
    }

    if let Some(winner) = view.winner {
        let total = view
            .tally
            .iter()
            .find(|row| row.id == winner.id)
            .map(|row| row.total)
            .unwrap_or_default();
        println!();
        println!("Winning option: {} (total resistance {})", winner.text, total);
    }

    Ok(())
}
