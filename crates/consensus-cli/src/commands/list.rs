use super::discover_store;
use anyhow::{Context, Result};

pub fn run(json: bool) -> Result<()> {
    let store = discover_store()?;
    let decisions = store.list().context("failed to list decisions")?;

    if json {
        let entries: Vec<_> = decisions
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "title": d.title,
                    "options": d.options.len(),
                    "version": d.version,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if decisions.is_empty() {
        println!("No decisions in this store.");
        return Ok(());
    }
    for d in &decisions {
        let noun = if d.options.len() == 1 { "option" } else { "options" };
        println!("{}  {}  ({} {})", d.id.short(), d.title, d.options.len(), noun);
    }
    Ok(())
}
