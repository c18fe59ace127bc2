//! Example: run a full detection pass and print the classified inventory.
//!
//! Run with: `cargo run --example scan_ports`

use portscope_core::PortScopeEngine;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let engine = PortScopeEngine::new();
    let (snapshot, zombies) = engine.detect_all().await;

    for record in snapshot.iter() {
        println!(
            "{:<6} {:<8} {:<10} {}",
            record.port, record.pid, record.status, record.friendly_name
        );
    }

    println!("\n{} records, {} zombies", snapshot.len(), zombies);
}
