//! Portscope engine - the inventory command set behind one facade.
//!
//! The engine wires the platform probe, normalizer, classifier, and action
//! executor together. It holds no state between calls: every request
//! rebuilds its snapshot from a fresh scan, and destructive operations
//! mutate real OS/filesystem state non-transactionally, so callers re-scan
//! afterwards to observe the true result.

use std::path::Path;

use crate::cache::CacheCleaner;
use crate::classify;
use crate::killer::ProcessKiller;
use crate::models::FriendlyRules;
use crate::scanner::PortScanner;
use crate::snapshot::Snapshot;

/// The main portscope engine.
///
/// Construction freezes the friendly-name rule table; everything else is
/// per-call. No call returns an error: discovery failures degrade to an
/// empty snapshot and action failures surface as boolean/count results.
pub struct PortScopeEngine {
    scanner: PortScanner,
    killer: ProcessKiller,
    cleaner: CacheCleaner,
    rules: FriendlyRules,
}

impl PortScopeEngine {
    /// Create an engine with the built-in friendly-name rules.
    pub fn new() -> Self {
        Self::with_rules(FriendlyRules::builtin())
    }

    /// Create an engine with a custom rule table.
    pub fn with_rules(rules: FriendlyRules) -> Self {
        Self {
            scanner: PortScanner::new(),
            killer: ProcessKiller::new(),
            cleaner: CacheCleaner::new(),
            rules,
        }
    }

    /// Cheap path: scan and apply conflict detection only.
    pub async fn refresh(&self) -> Snapshot {
        let mut snapshot = self.scanner.snapshot(&self.rules).await;
        classify::mark_conflicts(&mut snapshot);
        snapshot
    }

    /// Expensive path: scan, then zombie detection, then conflict
    /// detection. Conflict wins when a record qualifies for both, but the
    /// returned count still reflects every record the zombie pass marked.
    pub async fn detect_all(&self) -> (Snapshot, usize) {
        let mut snapshot = self.scanner.snapshot(&self.rules).await;
        let zombies = classify::mark_zombies(&mut snapshot);
        classify::mark_conflicts(&mut snapshot);
        (snapshot, zombies)
    }

    /// Forcefully terminate one process. The pid usually comes from an
    /// earlier snapshot and may be stale; `false` means nothing changed.
    /// Callers are expected to re-refresh on success.
    pub async fn kill_process(&self, pid: u32) -> bool {
        self.killer.kill(pid).await
    }

    /// Detect and terminate every zombie process, returning the number
    /// actually killed.
    ///
    /// Selection runs the zombie pass only: a zombie on a conflicted port
    /// is still killed, so the conflict relabeling that `detect_all`
    /// presents never shields a stale process.
    pub async fn kill_zombies(&self) -> usize {
        let mut snapshot = self.scanner.snapshot(&self.rules).await;
        classify::mark_zombies(&mut snapshot);

        let mut killed = 0;
        for pid in classify::zombie_pids(&snapshot) {
            if self.killer.kill(pid).await {
                killed += 1;
            }
        }
        killed
    }

    /// Terminate every process in a fresh snapshot, returning the number
    /// killed. Destructive and irreversible; callers must gate this behind
    /// an explicit confirmation step.
    pub async fn stop_all(&self) -> usize {
        let snapshot = self.refresh().await;

        let mut killed = 0;
        for record in snapshot.iter() {
            if self.killer.kill(record.pid).await {
                killed += 1;
            }
        }
        killed
    }

    /// Prune known build-cache directories under `root`.
    pub async fn clear_cache(&self, root: &Path) -> bool {
        self.cleaner.clear(root).await
    }
}

impl Default for PortScopeEngine {
    fn default() -> Self {
        Self::new()
    }
}
