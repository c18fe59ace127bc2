//! Kill commands - single pid, zombies, and stop-all.

use anyhow::Result;
use portscope_core::PortScopeEngine;

use super::confirm;

/// Kill one process by pid.
pub async fn run(pid: u32) -> Result<()> {
    let engine = PortScopeEngine::new();

    if engine.kill_process(pid).await {
        println!("Process {} killed", pid);
    } else {
        // The process may already be gone, or we lack permission; either
        // way nothing changed
        eprintln!("Failed to kill process {}", pid);
        std::process::exit(1);
    }
    Ok(())
}

/// Detect and kill every zombie process.
pub async fn run_zombies() -> Result<()> {
    let engine = PortScopeEngine::new();
    let killed = engine.kill_zombies().await;
    println!("Killed {} zombie process(es)", killed);
    Ok(())
}

/// Kill every process in the inventory, gated behind a confirmation.
pub async fn run_stop_all(assume_yes: bool) -> Result<()> {
    let engine = PortScopeEngine::new();

    let snapshot = engine.refresh().await;
    if snapshot.is_empty() {
        println!("No listening ports found.");
        return Ok(());
    }

    let prompt = format!(
        "Stop all {} process(es)? This is irreversible.",
        snapshot.len()
    );
    if !confirm(&prompt, assume_yes) {
        println!("Aborted.");
        return Ok(());
    }

    let killed = engine.stop_all().await;
    println!("Stopped {} process(es)", killed);
    Ok(())
}
