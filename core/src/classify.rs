//! Classification passes: port conflicts and zombie processes.
//!
//! Both passes annotate a snapshot in place, are idempotent given an
//! unchanged snapshot, and are independent of each other. When both run,
//! zombie detection goes first so that a record qualifying for both ends
//! up conflicted.

use std::collections::HashMap;

use tracing::debug;

use crate::models::PortStatus;
use crate::snapshot::Snapshot;

/// Mark every record that shares its port with another record as
/// conflicted. Records with a unique port are left untouched.
pub fn mark_conflicts(snapshot: &mut Snapshot) {
    let mut counts: HashMap<u16, usize> = HashMap::new();
    for record in snapshot.records() {
        *counts.entry(record.port).or_default() += 1;
    }

    for record in snapshot.records_mut() {
        if counts[&record.port] > 1 {
            record.status = PortStatus::Conflict;
        }
    }
}

/// Mark records whose working directory no longer exists on disk, returning
/// how many were marked.
///
/// The existence check is a point-in-time filesystem probe with no caching;
/// the filesystem may change between this check and any follow-up action,
/// and repeated calls may yield different results. Records without a
/// working path are never marked.
pub fn mark_zombies(snapshot: &mut Snapshot) -> usize {
    let mut marked = 0;

    for record in snapshot.records_mut() {
        let Some(path) = &record.working_path else {
            continue;
        };

        let dir = path.parent().unwrap_or(path);
        if !dir.exists() {
            debug!(pid = record.pid, path = %path.display(), "working directory missing");
            record.status = PortStatus::Zombie;
            marked += 1;
        }
    }

    marked
}

/// Pids of every zombie-classified record, in snapshot order. This is the
/// kill-selection rule for a zombie sweep: it reads the status the zombie
/// pass wrote, so it must run before any conflict relabeling.
pub fn zombie_pids(snapshot: &Snapshot) -> Vec<u32> {
    snapshot
        .iter()
        .filter(|r| r.status == PortStatus::Zombie)
        .map(|r| r.pid)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProcessRecord, Protocol};
    use std::path::PathBuf;

    fn record(pid: u32, port: u16, working_path: Option<PathBuf>) -> ProcessRecord {
        ProcessRecord {
            pid,
            port,
            protocol: Protocol::Tcp,
            address: "127.0.0.1".to_string(),
            process_name: "node".to_string(),
            friendly_name: "node".to_string(),
            command: "node server.js".to_string(),
            working_path,
            status: PortStatus::Active,
        }
    }

    #[test]
    fn test_conflict_marks_all_sharers() {
        let mut snapshot = Snapshot::from_records(vec![
            record(100, 3000, None),
            record(200, 3000, None),
            record(300, 8080, None),
        ]);

        mark_conflicts(&mut snapshot);

        assert_eq!(snapshot.records()[0].status, PortStatus::Conflict);
        assert_eq!(snapshot.records()[1].status, PortStatus::Conflict);
        // Unique port is unaffected
        assert_eq!(snapshot.records()[2].status, PortStatus::Active);
    }

    #[test]
    fn test_conflict_pass_is_idempotent() {
        let mut snapshot =
            Snapshot::from_records(vec![record(100, 3000, None), record(200, 3000, None)]);

        mark_conflicts(&mut snapshot);
        let first = snapshot.records().to_vec();
        mark_conflicts(&mut snapshot);
        assert_eq!(snapshot.records(), first.as_slice());
    }

    #[test]
    fn test_zombie_requires_working_path() {
        let mut snapshot = Snapshot::from_records(vec![record(100, 3000, None)]);
        assert_eq!(mark_zombies(&mut snapshot), 0);
        assert_eq!(snapshot.records()[0].status, PortStatus::Active);
    }

    #[test]
    fn test_existing_directory_is_not_zombie() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server");

        let mut snapshot = Snapshot::from_records(vec![record(100, 3000, Some(path))]);
        assert_eq!(mark_zombies(&mut snapshot), 0);
        assert_eq!(snapshot.records()[0].status, PortStatus::Active);
    }

    #[test]
    fn test_deleted_directory_is_zombie() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project").join("server");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        let mut snapshot = Snapshot::from_records(vec![record(300, 5173, Some(path))]);

        // Delete after the "scan": time-of-check semantics still classify it
        drop(dir);
        assert_eq!(mark_zombies(&mut snapshot), 1);
        assert_eq!(snapshot.records()[0].status, PortStatus::Zombie);
    }

    #[test]
    fn test_zombie_pids_reads_marked_records() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone").join("server");
        std::fs::create_dir_all(gone.parent().unwrap()).unwrap();
        std::fs::remove_dir_all(gone.parent().unwrap()).unwrap();

        let mut snapshot = Snapshot::from_records(vec![
            record(100, 3000, Some(gone)),
            record(200, 8080, None),
        ]);

        mark_zombies(&mut snapshot);
        assert_eq!(zombie_pids(&snapshot), vec![100]);
    }

    #[test]
    fn test_zombie_on_shared_port_is_still_selected() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone").join("server");
        std::fs::create_dir_all(gone.parent().unwrap()).unwrap();
        std::fs::remove_dir_all(gone.parent().unwrap()).unwrap();

        // Two listeners on the same port, one of them stale: the sweep
        // skips the conflict pass, so the stale one is selected for the
        // kill even though detect-all would relabel it as conflicted.
        let mut snapshot = Snapshot::from_records(vec![
            record(100, 3000, Some(gone)),
            record(200, 3000, None),
        ]);

        mark_zombies(&mut snapshot);
        assert_eq!(zombie_pids(&snapshot), vec![100]);
    }

    #[test]
    fn test_conflict_overwrites_zombie_when_both_apply() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone").join("server");
        std::fs::create_dir_all(gone.parent().unwrap()).unwrap();
        std::fs::remove_dir_all(gone.parent().unwrap()).unwrap();

        let mut snapshot = Snapshot::from_records(vec![
            record(100, 3000, Some(gone)),
            record(200, 3000, None),
        ]);

        // detect-all ordering: zombies first, then conflicts win
        let zombies = mark_zombies(&mut snapshot);
        mark_conflicts(&mut snapshot);

        assert_eq!(zombies, 1);
        assert_eq!(snapshot.records()[0].status, PortStatus::Conflict);
        assert_eq!(snapshot.records()[1].status, PortStatus::Conflict);
    }
}
