//! Start command - launch the workspace dev script with PORT bound.
//!
//! This is a convenience around the inventory, not part of the engine: it
//! sniffs the workspace manifest for a runnable script and execs it through
//! the detected package manager.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tokio::process::Command;

use crate::workspace::{runnable_script, PackageManager};

pub async fn run(port: u16, path: Option<PathBuf>) -> Result<()> {
    let root = match path {
        Some(p) => p,
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        bail!("workspace root {} does not exist", root.display());
    }

    let script = runnable_script(&root)?;
    let manager = PackageManager::detect(&root);

    println!(
        "Starting `{} run {}` on port {}...",
        manager.command(),
        script,
        port
    );

    let status = Command::new(manager.command())
        .args(["run", &script])
        .current_dir(&root)
        .env("PORT", port.to_string())
        .status()
        .await
        .with_context(|| format!("failed to launch {}", manager.command()))?;

    if !status.success() {
        bail!("{} run {} exited with {}", manager.command(), script, status);
    }
    Ok(())
}
