//! CLI subcommand implementations.

pub mod cache;
pub mod detect;
pub mod kill;
pub mod list;
pub mod start;

use portscope_core::Snapshot;

/// Render a snapshot as the standard inventory table.
pub fn print_table(snapshot: &Snapshot) {
    if snapshot.is_empty() {
        println!("No listening ports found.");
        return;
    }

    println!(
        "{:<6} {:<8} {:<6} {:<24} {:<16} {:<10} COMMAND",
        "PORT", "PID", "PROTO", "PROCESS", "ADDRESS", "STATUS"
    );
    println!("{}", "-".repeat(100));

    for record in snapshot.iter() {
        println!(
            "{:<6} {:<8} {:<6} {:<24} {:<16} {:<10} {}",
            record.port,
            record.pid,
            record.protocol.to_string(),
            truncate(&record.friendly_name, 24),
            truncate(&record.address, 16),
            record.status.to_string(),
            truncate(&record.command, 40),
        );
    }

    println!("\nTotal: {} ports", snapshot.len());
}

/// Truncate a string for column display, on a char boundary.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}\u{2026}", cut)
    }
}

/// Ask for a y/N confirmation on stdin unless `assume_yes` is set.
pub fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }

    use std::io::Write;
    print!("{} [y/N] ", prompt);
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
