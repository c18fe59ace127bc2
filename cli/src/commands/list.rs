//! List command - the cheap inventory path (conflict detection only).

use anyhow::Result;
use portscope_core::{PortScopeEngine, Snapshot};

use super::print_table;

pub async fn run(port_filter: Option<u16>, name_filter: Option<String>, json: bool) -> Result<()> {
    let engine = PortScopeEngine::new();
    let snapshot = engine.refresh().await;

    let mut records = snapshot.into_records();
    if let Some(p) = port_filter {
        records.retain(|r| r.port == p);
    }
    if let Some(ref name) = name_filter {
        let name_lower = name.to_lowercase();
        records.retain(|r| {
            r.process_name.to_lowercase().contains(&name_lower)
                || r.friendly_name.to_lowercase().contains(&name_lower)
        });
    }

    let snapshot = Snapshot::from_records(records);

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_table(&snapshot);
    Ok(())
}
