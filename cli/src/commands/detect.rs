//! Detect command - the expensive path: conflicts plus zombie detection.

use anyhow::Result;
use portscope_core::{PortScopeEngine, Snapshot};
use serde::Serialize;

use super::print_table;

/// JSON payload for `detect`: the records plus the zombie count that the
/// table output reports as a trailing line.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectReport<'a> {
    processes: &'a Snapshot,
    zombie_count: usize,
}

pub async fn run(json: bool) -> Result<()> {
    let engine = PortScopeEngine::new();
    let (snapshot, zombies) = engine.detect_all().await;

    if json {
        let report = DetectReport {
            processes: &snapshot,
            zombie_count: zombies,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_table(&snapshot);
    if zombies > 0 {
        println!("Found {} zombie process(es)", zombies);
    }
    Ok(())
}
