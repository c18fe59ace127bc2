//! Clear-cache command - prune build caches under a workspace root.

use std::path::PathBuf;

use anyhow::{bail, Result};
use portscope_core::PortScopeEngine;

use super::confirm;

pub async fn run(path: Option<PathBuf>, assume_yes: bool) -> Result<()> {
    let root = match path {
        Some(p) => p,
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        bail!("workspace root {} does not exist", root.display());
    }

    let prompt = format!(
        "Clear cache directories (.turbo, .next, node_modules/.cache, ...) under {}?",
        root.display()
    );
    if !confirm(&prompt, assume_yes) {
        println!("Aborted.");
        return Ok(());
    }

    let engine = PortScopeEngine::new();
    if engine.clear_cache(&root).await {
        println!("Cache cleared");
    } else {
        eprintln!("Failed to clear cache");
        std::process::exit(1);
    }
    Ok(())
}
