use super::discover_store;
use anyhow::{Context, Result};
use consensus_core::DecisionId;
use consensus_store::RecentEntry;

pub fn list(json: bool) -> Result<()> {
    let store = discover_store()?;
    print_entries(&store.recents().list(), json)
}

pub fn remove(id: String) -> Result<()> {
    let store = discover_store()?;
    let id = DecisionId::parse(id.trim()).context("invalid decision id")?;
    if store.recents().remove(&id)? {
        println!("Removed {} from recent decisions.", id.short());
    } else {
        println!("{} is not in recent decisions.", id.short());
    }
    Ok(())
}

pub fn clear() -> Result<()> {
    let store = discover_store()?;
    store.recents().clear()?;
    println!("Cleared recent decisions.");
    Ok(())
}

pub fn print_entries(entries: &[RecentEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No previous decisions.");
        return Ok(());
    }
    println!("Previous decisions:");
    for entry in entries {
        println!(
            "  {}  {}  (Created on {})",
            entry.id,
            entry.title,
            entry.created_at.format("%b %-d, %Y")
        );
    }
    Ok(())
}
