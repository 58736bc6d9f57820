use anyhow::{Context, Result};
use consensus_store::FileStore;
use std::env;

pub fn run() -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    let store = FileStore::init(&cwd).context("failed to initialize store")?;
    println!("Initialized empty consensus store in {}", store.dir().display());
    Ok(())
}
